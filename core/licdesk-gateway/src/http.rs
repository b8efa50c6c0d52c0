//! reqwest-backed gateway.

use crate::error::{GatewayError, GatewayResult};
use crate::RemoteGateway;
use async_trait::async_trait;
use licdesk_license::{ActivationRequest, LicenseFile, LicenseRecord};
use licdesk_types::{
    Credentials, ErrorBody, RegisterRequest, RegisterResponse, TokenResponse, User, UsersResponse,
};
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Base URL of a license service running locally.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the license service (e.g. `http://127.0.0.1:8000`).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Gateway to the license service over HTTP.
pub struct HttpGateway {
    base_url: String,
    client: Client,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpGateway {
    /// Creates a gateway for the configured service.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the base URL does not parse or the
    /// HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::Config(format!("base url {:?}: {e}", config.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::Config(format!(
                "base url {:?} must be http or https",
                config.base_url
            )));
        }
        if config.timeout_secs == 0 {
            return Err(GatewayError::Config("timeout must be positive".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sets an existing session token (e.g., one obtained out of band).
    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    /// Forgets the session token.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the session token, if any, and sends the request.
    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let request = match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Maps a non-2xx response to [`GatewayError::Server`], extracting the
    /// service's `detail` when the body carries one.
    async fn check_status(response: Response) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let detail = ErrorBody::from_slice(&body).and_then(|b| b.detail_text());
        warn!("License service answered {} (detail: {:?})", status, detail);

        Err(GatewayError::Server {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            detail,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn authenticate(&self, credentials: &Credentials) -> GatewayResult<()> {
        debug!("Authenticating operator {}", credentials.login);

        let response = self
            .send(self.client.post(self.url("/token")).form(&[
                ("username", credentials.login.as_str()),
                ("password", credentials.password.as_str()),
            ]))
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        let response = Self::check_status(response).await?;
        let token: TokenResponse = Self::json(response).await?;

        *self.token.write().await = Some(token.access_token);
        info!("Operator {} authenticated", credentials.login);
        Ok(())
    }

    async fn register_user(&self, request: &RegisterRequest) -> GatewayResult<RegisterResponse> {
        let response = self
            .send(self.client.post(self.url("/register")).json(request))
            .await?;
        let response = Self::check_status(response).await?;

        // Only the status matters; an unreadable body still means success.
        let body = response.bytes().await?;
        let parsed = serde_json::from_slice(&body).unwrap_or_else(|e| {
            debug!("Ignoring unparseable register response body: {e}");
            RegisterResponse::default()
        });

        info!("Registered user {}", request.username);
        Ok(parsed)
    }

    async fn list_users(&self) -> GatewayResult<Vec<User>> {
        let response = self.send(self.client.get(self.url("/users"))).await?;
        let response = Self::check_status(response).await?;
        let list: UsersResponse = Self::json(response).await?;

        debug!("Fetched {} users", list.users.len());
        Ok(list.users)
    }

    async fn generate_license(&self, seed: &str) -> GatewayResult<LicenseRecord> {
        // The body is the seed itself, encoded as a JSON string.
        let response = self
            .send(
                self.client
                    .post(self.url("/licenses/generate"))
                    .header(ACCEPT, "application/json")
                    .json(seed),
            )
            .await?;
        let response = Self::check_status(response).await?;
        let record: LicenseRecord = Self::json(response).await?;

        info!("Generated license {:?}", record.id);
        Ok(record)
    }

    async fn download_license(&self, username: &str) -> GatewayResult<LicenseFile> {
        let response = self
            .send(
                self.client
                    .get(self.url("/licenses/download"))
                    .query(&[("username", username)]),
            )
            .await?;

        if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(GatewayError::LicenseNotGenerated {
                username: username.to_string(),
            });
        }
        let response = Self::check_status(response).await?;

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            // Servers send UTF-8 filenames as raw header bytes.
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
        let bytes = response.bytes().await?;

        let file = LicenseFile::from_download(username, disposition.as_deref(), bytes.to_vec());
        debug!("Downloaded {} ({} bytes)", file.filename(), file.len());
        Ok(file)
    }

    async fn activate_license(&self, request: &ActivationRequest) -> GatewayResult<LicenseRecord> {
        let response = self
            .send(
                self.client
                    .post(self.url("/licenses/activation-key"))
                    .json(request),
            )
            .await?;
        let response = Self::check_status(response).await?;
        let record: LicenseRecord = Self::json(response).await?;

        info!("Activated license for {}", request.username);
        Ok(record)
    }
}
