//! Error types for the console crate.

use thiserror::Error;

/// Result type for console setup operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Errors raised while configuring or wiring up the console.
///
/// Failures of individual operations at runtime are not errors at this
/// level: they end the operation and surface as a [`crate::Notice`].
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
