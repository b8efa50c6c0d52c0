//! Gateway error types.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur talking to the license service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure: connection refused, reset, DNS, TLS.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service rejected the operator credentials (401).
    #[error("invalid login or password")]
    Unauthorized,

    /// The download endpoint answered 500: nothing has been generated yet.
    #[error("no license has been generated for {username}")]
    LicenseNotGenerated { username: String },

    /// Any other non-2xx response.
    #[error("server returned {status} {status_text}")]
    Server {
        status: u16,
        status_text: String,
        detail: Option<String>,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GatewayError {
    /// Returns true for failures that never reached the service.
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Network(_) | GatewayError::Timeout)
    }

    /// The service-provided `detail`, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            GatewayError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// The service detail when present, otherwise the HTTP status text.
    pub fn detail_or_status(&self) -> String {
        match self {
            GatewayError::Server {
                status,
                status_text,
                detail,
            } => match detail {
                Some(detail) => detail.clone(),
                None if !status_text.is_empty() => status_text.clone(),
                None => status.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Network(e.to_string())
        }
    }
}
