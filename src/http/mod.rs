//! HTTP surface of the service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, route tree, lifecycle)
//!     → middleware/ (request ID, format pin, JSON admission gate)
//!     → v1 / init_check handlers
//!     → error.rs (uniform JSON error envelope)
//! ```

pub mod error;
pub mod middleware;
pub mod server;

pub use server::{AppState, HttpServer};
