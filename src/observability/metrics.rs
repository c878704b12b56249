//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_requests_total` (counter): total requests by method, route, status
//! - `api_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Labels use the matched route template, not the raw path, to keep
//!   cardinality bounded
//! - The Prometheus exporter listens on its own address so the scrape
//!   port never shares the API listener

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Route-level middleware recording one observation per request.
pub async fn track_requests(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    record_request(&method, response.status().as_u16(), &route, start);
    response
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(
        "api_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    metrics::histogram!(
        "api_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
    )
    .record(elapsed);
}
