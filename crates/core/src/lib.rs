//! Domain building blocks shared by the dubsite handlers.
//!
//! Nothing in here touches the network or the database: error types, id and
//! timestamp aliases, the admin [`auth::Authorizer`] seam, and the pure
//! upload payload transformations.

pub mod auth;
pub mod error;
pub mod types;
pub mod upload;
