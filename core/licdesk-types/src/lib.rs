//! Core type definitions for the licdesk admin console.
//!
//! This crate defines the plain data shared by the gateway and the console
//! controller:
//! - Operator credentials (transient, redacted in debug output)
//! - User identifiers and the user records served by the license service
//! - The View / Overlay axes of the console screen
//! - Wire DTOs for the JSON endpoints the console consumes
//!
//! Nothing here performs I/O.

mod credentials;
mod ids;
mod user;
mod view;
pub mod wire;

pub use credentials::Credentials;
pub use ids::UserId;
pub use user::User;
pub use view::{Overlay, View};
pub use wire::{ErrorBody, RegisterRequest, RegisterResponse, TokenResponse, UsersResponse};

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid user id: {0}")]
    InvalidUserId(String),
}
