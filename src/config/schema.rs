//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the API
//! service. All types derive Serde traits for deserialization from config
//! files, and every section has defaults so a minimal config is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the API service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request timeout settings.
    pub timeouts: TimeoutConfig,

    /// Split read/write MySQL connection settings.
    pub database: DatabaseConfig,

    /// Object storage (S3 / R2) settings.
    pub storage: StorageConfig,

    /// JSON admission gate settings.
    pub gate: GateConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Split read/write database configuration.
///
/// The write URL should point at the primary; the read URL at a replica
/// (or the primary again in single-node setups).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL for the write (primary) pool.
    pub write_url: String,

    /// Connection URL for the read (replica) pool.
    pub read_url: String,

    /// Maximum connections per pool.
    pub max_connections: u32,

    /// How long to wait for a connection from the pool, in seconds.
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            write_url: "mysql://root@127.0.0.1:3306/console".to_string(),
            read_url: "mysql://root@127.0.0.1:3306/console".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

/// Object storage configuration. Compatible with S3, Cloudflare R2 and
/// MinIO (set `endpoint_url` and path-style addressing for the latter two).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Enable the storage subsystem. When disabled, upload probe routes
    /// answer 503.
    pub enabled: bool,

    /// Region name. R2 uses "auto".
    pub region: String,

    /// Target bucket.
    pub bucket: String,

    /// Custom endpoint URL for S3-compatible services.
    pub endpoint_url: Option<String>,

    /// Force path-style addressing (required by MinIO).
    pub force_path_style: bool,

    /// Key prefix for upload probes.
    pub key_prefix: String,

    /// Lifetime of presigned download URLs, in seconds.
    pub presign_expiry_secs: u64,

    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            region: "auto".to_string(),
            bucket: String::new(),
            endpoint_url: None,
            force_path_style: false,
            key_prefix: "test-uploads".to_string(),
            presign_expiry_secs: 15 * 60,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// JSON admission gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Paths exempt from JSON enforcement (glob patterns, matched against
    /// the request path without its leading slash). Uploads and webhooks
    /// carry non-JSON bodies.
    pub except_paths: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            except_paths: vec![
                "api/v1/files/*".to_string(),
                "api/v1/webhooks/*".to_string(),
                "api/_init/s3/*".to_string(),
            ],
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes. Must leave room for the
    /// largest accepted upload plus multipart framing.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 16 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). RUST_LOG overrides.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let config: ApiConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(!config.storage.enabled);
        assert_eq!(config.gate.except_paths.len(), 3);
    }

    #[test]
    fn sections_can_be_overridden_independently() {
        let config: ApiConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [database]
            write_url = "mysql://app@db-primary/console"
            read_url = "mysql://app@db-replica/console"

            [gate]
            except_paths = ["api/v1/uploads/*"]
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.database.write_url, "mysql://app@db-primary/console");
        assert_eq!(config.database.read_url, "mysql://app@db-replica/console");
        assert_eq!(config.gate.except_paths, vec!["api/v1/uploads/*"]);
        // untouched sections keep defaults
        assert_eq!(config.security.max_body_size, 16 * 1024 * 1024);
    }
}
