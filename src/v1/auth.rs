//! Bearer-token authentication for the v1 surface.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;
use sqlx::Row;

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Context attached to authenticated requests.
#[derive(Clone, Debug, Serialize)]
pub struct CurrentUser {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Resolve `Authorization: Bearer <token>` against the users table and
/// attach the matching [`CurrentUser`] as a request extension. Missing or
/// unknown tokens answer 401 without reaching the handler.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let row = sqlx::query("SELECT id, name, email FROM users WHERE api_token = ?")
        .bind(token)
        .fetch_optional(&state.db.read)
        .await?;

    let Some(row) = row else {
        return Err(ApiError::Unauthorized);
    };

    let user = CurrentUser {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    };
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
