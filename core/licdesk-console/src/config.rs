//! Console configuration.

use crate::error::{ConsoleError, ConsoleResult};
use crate::gate::{LoginGate, OperatorAccount, DEFAULT_MAX_LOGIN_ATTEMPTS};
use licdesk_gateway::{GatewayConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How operators are authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AuthConfig {
    /// The license service checks credentials (`POST /token`).
    #[default]
    Remote,
    /// A single local account; only the password's SHA-256 is stored.
    Operator {
        login: String,
        password_sha256: String,
    },
}

/// Console configuration, loadable from JSON.
///
/// Missing fields take their defaults, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the license service.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Where downloaded licenses are written. `None` means the user's
    /// download directory, or the current directory if there is none.
    pub download_dir: Option<PathBuf>,
    /// Consecutive failed logins before the gate locks.
    pub max_login_attempts: u32,
    pub auth: AuthConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            download_dir: None,
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
            auth: AuthConfig::Remote,
        }
    }
}

impl ConsoleConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> ConsoleResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: &Path) -> ConsoleResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks the values that cannot be caught by deserialization.
    pub fn validate(&self) -> ConsoleResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConsoleError::Config("base_url is empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConsoleError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.max_login_attempts == 0 {
            return Err(ConsoleError::Config(
                "max_login_attempts must be positive".to_string(),
            ));
        }
        self.login_gate().map(|_| ())
    }

    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }

    /// The directory downloaded licenses are saved in.
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Builds the login gate described by [`ConsoleConfig::auth`].
    pub fn login_gate(&self) -> ConsoleResult<LoginGate> {
        match &self.auth {
            AuthConfig::Remote => Ok(LoginGate::Remote),
            AuthConfig::Operator {
                login,
                password_sha256,
            } => Ok(LoginGate::Operator(OperatorAccount::from_digest(
                login.clone(),
                password_sha256,
            )?)),
        }
    }
}
