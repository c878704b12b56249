//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and required fields per enabled subsystem
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ApiConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ApiConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn error(field: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field,
        message: message.into(),
    }
}

/// Validate a parsed configuration, collecting every failure.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(error(
            "listener.bind_address",
            format!("not a valid socket address: {:?}", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(error("timeouts.request_secs", "must be greater than zero"));
    }

    for (field, url) in [
        ("database.write_url", &config.database.write_url),
        ("database.read_url", &config.database.read_url),
    ] {
        if !url.starts_with("mysql://") {
            errors.push(error(field, format!("must be a mysql:// URL, got {url:?}")));
        }
    }
    if config.database.max_connections == 0 {
        errors.push(error("database.max_connections", "must be greater than zero"));
    }

    if config.storage.enabled {
        if config.storage.bucket.is_empty() {
            errors.push(error("storage.bucket", "required when storage is enabled"));
        }
        if config.storage.presign_expiry_secs == 0 {
            errors.push(error("storage.presign_expiry_secs", "must be greater than zero"));
        }
        if config.storage.max_upload_bytes > config.security.max_body_size {
            errors.push(error(
                "storage.max_upload_bytes",
                "exceeds security.max_body_size; uploads would be cut off early",
            ));
        }
    }

    if config.gate.except_paths.iter().any(|p| p.trim().is_empty()) {
        errors.push(error("gate.except_paths", "patterns must be non-empty"));
    }

    if config.security.max_body_size == 0 {
        errors.push(error("security.max_body_size", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(error(
            "observability.metrics_address",
            format!(
                "not a valid socket address: {:?}",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
