//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, admission gate)
//! - Nest the `/api/v1` and `/api/_init` groups with their fallbacks
//! - Bind the server to a listener and serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::db::DbPools;
use crate::http::middleware::{ensure_json_middleware, force_json_middleware};
use crate::init_check;
use crate::observability::metrics;
use crate::security::JsonPolicy;
use crate::storage::ObjectStorage;
use crate::v1;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub policy: Arc<JsonPolicy>,
    pub db: DbPools,
    pub storage: Option<ObjectStorage>,
}

/// HTTP server for the console API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Database pools are created lazily; the object storage client is
    /// only built when the subsystem is enabled.
    pub async fn new(config: ApiConfig) -> Result<Self, sqlx::Error> {
        let db = DbPools::connect_lazy(&config.database)?;

        let storage = if config.storage.enabled {
            Some(ObjectStorage::from_config(&config.storage).await)
        } else {
            None
        };

        let state = AppState {
            policy: Arc::new(JsonPolicy::new(config.gate.except_paths.clone())),
            config: Arc::new(config),
            db,
            storage,
        };

        let router = Self::build_router(state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let v1_routes = Router::new()
            .route("/health", get(v1::handlers::health))
            .route(
                "/user",
                get(v1::handlers::current_user).layer(middleware::from_fn_with_state(
                    state.clone(),
                    v1::auth::require_user,
                )),
            )
            .fallback(v1::handlers::not_found);

        let init_routes = Router::new()
            .route("/mysql/hosts", get(init_check::mysql::hosts))
            .route("/mysql/write", post(init_check::mysql::write))
            .route("/mysql/read/{id}", get(init_check::mysql::read))
            .route("/mysql/lag", get(init_check::mysql::lag))
            .route(
                "/s3/test-s3",
                get(init_check::storage::upload_form).post(init_check::storage::upload),
            )
            .fallback(init_check::not_found);

        // Everything under /api is format-pinned and passes the JSON
        // admission gate before any handler runs.
        let api = Router::new()
            .nest("/v1", v1_routes)
            .nest("/_init", init_routes)
            .route("/", get(api_root))
            .fallback(api_not_found)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                ensure_json_middleware,
            ))
            .layer(middleware::from_fn(force_json_middleware));

        let timeout = Duration::from_secs(state.config.timeouts.request_secs);
        let max_body_size = state.config.security.max_body_size;

        Router::new()
            .nest("/api", api)
            .route("/up", get(up))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .fallback(not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(max_body_size))
            .layer(TimeoutLayer::new(timeout))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener, until
    /// Ctrl+C or a message on the shutdown channel.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested via channel");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness probe, outside the /api group.
async fn up() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// Explicit handler for /api and /api/.
async fn api_root() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "API version required",
            "message": "Please use /api/v1/...",
        })),
    )
}

/// Catch-all for anything else under /api/*.
async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

/// Catch-all outside the API group.
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
