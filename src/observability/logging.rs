//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber. RUST_LOG takes precedence over the
/// configured level.
pub fn init(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("console_api={level},tower_http={level}"))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
