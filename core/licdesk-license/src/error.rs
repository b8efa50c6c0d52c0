//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Key string is empty or malformed.
    #[error("invalid license key: {0}")]
    InvalidKey(String),

    /// No usable filename could be derived.
    #[error("invalid license filename: {0}")]
    InvalidFilename(String),

    /// Writing the license file failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
