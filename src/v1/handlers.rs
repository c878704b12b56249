//! Handlers for the `/api/v1` group.

use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;

use crate::http::error::ApiError;
use crate::v1::auth::CurrentUser;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// Return the user resolved by [`crate::v1::auth::require_user`].
pub async fn current_user(Extension(user): Extension<CurrentUser>) -> Json<CurrentUser> {
    Json(user)
}

/// v1-scoped fallback (typos under /api/v1/*).
pub async fn not_found() -> impl IntoResponse {
    ApiError::NotFound("Unknown v1 endpoint.".to_string())
}
