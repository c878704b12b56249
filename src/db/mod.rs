//! Split read/write MySQL pools.
//!
//! # Design Decisions
//! - Two pools, one per role: writes go to the primary, reads to the
//!   replica endpoint (which may be the primary in single-node setups)
//! - Pools are created lazily: no connection is opened at startup, so a
//!   dead database surfaces per-request in the init-check probes instead
//!   of blocking boot

use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Row;

use crate::config::DatabaseConfig;

/// The pair of connection pools handlers query against.
#[derive(Clone)]
pub struct DbPools {
    pub write: MySqlPool,
    pub read: MySqlPool,
}

impl DbPools {
    /// Build both pools from config without opening any connections.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let write = pool_options(config).connect_lazy(&config.write_url)?;
        let read = pool_options(config).connect_lazy(&config.read_url)?;
        Ok(Self { write, read })
    }
}

fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

/// Report which server a pool is actually talking to.
pub async fn hostname(pool: &MySqlPool) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query("SELECT @@hostname AS h").fetch_one(pool).await?;
    row.try_get("h")
}
