//! JSON admission middleware.
//!
//! Transport adapter around [`crate::security::admission`]: buffers the
//! body where the policy demands inspection, translates the pure decision
//! into either a pass-through or the error envelope.

use axum::body::Body;
use axum::extract::{OriginalUri, State};
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http::error::{ApiError, ErrorBody};
use crate::http::server::AppState;
use crate::security::{GateDecision, Rejection};

pub async fn ensure_json_middleware(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = uri.path();

    // 1. Fast path: read/delete methods and excepted paths are never
    //    body-checked, so skip the buffering entirely.
    if !state.policy.requires_inspection(req.method(), path) {
        return next.run(req).await;
    }

    // 2. Buffer the body so it can be both inspected and replayed.
    let method = req.method().clone();
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, state.config.security.max_body_size).await {
        Ok(bytes) => bytes,
        Err(_) => return ApiError::PayloadTooLarge.into_response(),
    };

    // 3. Evaluate and either replay the request or short-circuit.
    match state
        .policy
        .evaluate(&method, path, content_type.as_deref(), &bytes)
    {
        GateDecision::Forward => {
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        GateDecision::Reject(rejection) => reject(&rejection),
    }
}

fn reject(rejection: &Rejection) -> Response {
    let body = ErrorBody::new(rejection.label(), rejection.message());
    (rejection.status(), Json(body)).into_response()
}
