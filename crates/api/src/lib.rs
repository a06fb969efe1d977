//! dubsite function handlers.
//!
//! Exposes the invocation contract, the three function handlers (news,
//! videos, upload) and the axum host that serves them, so integration tests
//! and the binary entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod invocation;
pub mod router;
pub mod routes;
pub mod state;
