//! Remote Gateway: the console's view of the license service.
//!
//! [`RemoteGateway`] is the seam between the console controller and the
//! network. [`HttpGateway`] implements it over reqwest against the service's
//! JSON/file endpoints:
//!
//! | Operation | Endpoint |
//! |---|---|
//! | authenticate | `POST /token` (form) |
//! | register user | `POST /register` |
//! | list users | `GET /users` |
//! | generate license | `POST /licenses/generate` |
//! | download license | `GET /licenses/download?username=` |
//! | activate license | `POST /licenses/activation-key` |
//!
//! Calls are single-shot: no retries, no de-duplication. Every request is
//! bounded by the configured timeout.

mod error;
mod http;

pub use error::{GatewayError, GatewayResult};
pub use http::{GatewayConfig, HttpGateway, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

use async_trait::async_trait;
use licdesk_license::{ActivationRequest, LicenseFile, LicenseRecord};
use licdesk_types::{Credentials, RegisterRequest, RegisterResponse, User};

/// Operations the console issues against the license service.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Exchanges operator credentials for a session token kept by the gateway.
    async fn authenticate(&self, credentials: &Credentials) -> GatewayResult<()>;

    /// Registers a new user.
    async fn register_user(&self, request: &RegisterRequest) -> GatewayResult<RegisterResponse>;

    /// Fetches the full user list, in service order.
    async fn list_users(&self) -> GatewayResult<Vec<User>>;

    /// Asks the service to generate a license from a seed string.
    async fn generate_license(&self, seed: &str) -> GatewayResult<LicenseRecord>;

    /// Downloads the license file issued for `username`.
    async fn download_license(&self, username: &str) -> GatewayResult<LicenseFile>;

    /// Activates a previously generated key.
    async fn activate_license(&self, request: &ActivationRequest) -> GatewayResult<LicenseRecord>;
}
