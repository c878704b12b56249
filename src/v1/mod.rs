//! Versioned API surface (`/api/v1`).

pub mod auth;
pub mod handlers;

pub use auth::CurrentUser;
