//! Web Console Backend API Library

pub mod config;
pub mod db;
pub mod http;
pub mod init_check;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod storage;
pub mod v1;

pub use config::ApiConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
