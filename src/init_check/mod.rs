//! Deployment init-check probes (`/api/_init`).
//!
//! Diagnostic endpoints run once after standing up an environment to
//! verify the backing services: split MySQL connectivity, replication
//! lag, and object-storage credentials.

use axum::response::IntoResponse;

use crate::http::error::ApiError;

pub mod mysql;
pub mod storage;

/// init-scoped fallback (typos under /api/_init/*).
pub async fn not_found() -> impl IntoResponse {
    ApiError::NotFound("Unknown _init endpoint.".to_string())
}
