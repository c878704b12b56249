//! Pin the negotiated response format to JSON.
//!
//! The API never serves content-negotiated HTML; overwriting the Accept
//! header up front keeps every downstream renderer and fallback on the
//! JSON path regardless of what the client sent.

use axum::body::Body;
use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

pub async fn force_json_middleware(mut req: Request<Body>, next: Next) -> Response {
    req.headers_mut().insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );
    next.run(req).await
}
