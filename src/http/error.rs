//! API error envelope.
//!
//! Every error leaves the service as `{ "error": <label>, "message":
//! <detail> }` so clients can branch on the fields programmatically. The
//! field names are part of the API contract.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// JSON body shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthenticated.")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Request body exceeds the configured size limit")]
    PayloadTooLarge,

    #[error("Object storage is not configured")]
    StorageDisabled,

    #[error("database query failed")]
    Database(#[from] sqlx::Error),

    #[error("object storage request failed")]
    Storage(#[from] StorageError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::StorageDisabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::NotFound(_) => "Not Found",
            ApiError::Unprocessable(_) => "Unprocessable Entity",
            ApiError::PayloadTooLarge => "Payload Too Large",
            ApiError::StorageDisabled => "Service Unavailable",
            ApiError::Database(_) | ApiError::Storage(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Server-side failures carry detail in the logs, not the response.
        match &self {
            ApiError::Database(e) => tracing::error!(error = %e, "Database error"),
            ApiError::Storage(e) => tracing::error!(error = %e, "Object storage error"),
            _ => {}
        }

        let body = ErrorBody::new(self.label(), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
