//! Web Console Backend API (v1)
//!
//! An API scaffold built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 CONSOLE API                  │
//!                      │                                              │
//!   Client Request     │  ┌─────────┐   ┌────────────┐   ┌─────────┐ │
//!   ───────────────────┼─▶│  http   │──▶│ admission  │──▶│ v1 /    │ │
//!                      │  │ server  │   │   gate     │   │ _init   │ │
//!                      │  └─────────┘   └────────────┘   └────┬────┘ │
//!                      │                                      │      │
//!                      │                          ┌───────────┴────┐ │
//!                      │                          ▼                ▼ │
//!                      │                   ┌────────────┐  ┌───────┐ │
//!                      │                   │ db (MySQL  │  │ s3 /  │ │
//!                      │                   │ read+write)│  │  r2   │ │
//!                      │                   └────────────┘  └───────┘ │
//!                      │                                              │
//!                      │  Cross-cutting: config · observability ·     │
//!                      │  lifecycle                                   │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::Path;

use tokio::net::TcpListener;

use console_api::config::{loader, ApiConfig};
use console_api::http::HttpServer;
use console_api::lifecycle::Shutdown;
use console_api::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // A missing config file is fine for local development; defaults apply.
    let config = if Path::new(&config_path).exists() {
        loader::load_config(Path::new(&config_path))?
    } else {
        ApiConfig::default()
    };

    logging::init(&config.observability.log_level);

    tracing::info!("console-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        storage_enabled = config.storage.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Create and run HTTP server
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).await?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
