//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming write request:
//!     → admission.rs (JSON content-type + body well-formedness policy)
//!     → Pass to handler, or short-circuit with a typed rejection
//! ```
//!
//! # Design Decisions
//! - Decision logic is framework-free; the transport adapter lives in
//!   `http::middleware`
//! - Fail closed: a write request that cannot prove a valid JSON body
//!   never reaches business logic

pub mod admission;

pub use admission::{GateDecision, JsonPolicy, Rejection};
