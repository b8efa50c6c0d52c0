//! The login gate in front of the dashboard.
//!
//! Two modes:
//! - [`LoginGate::Operator`]: a locally configured operator account. Only a
//!   SHA-256 digest of the password is kept; the check makes no network call.
//! - [`LoginGate::Remote`]: the license service decides via `POST /token`.
//!
//! Either way, consecutive failures are counted and the gate locks once the
//! configured limit is reached.

use crate::error::{ConsoleError, ConsoleResult};
use licdesk_types::Credentials;
use sha2::{Digest, Sha256};
use std::fmt;

/// Default number of consecutive failed logins before the gate locks.
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Hex-encoded SHA-256 of a password, as stored in the configuration.
#[must_use]
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// A locally configured operator account.
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorAccount {
    login: String,
    password_sha256: [u8; 32],
}

impl OperatorAccount {
    /// Builds an account from a plaintext password (hashed immediately).
    #[must_use]
    pub fn new(login: impl Into<String>, password: &str) -> Self {
        Self {
            login: login.into(),
            password_sha256: Sha256::digest(password.as_bytes()).into(),
        }
    }

    /// Builds an account from a hex-encoded SHA-256 digest.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Config`] if the login is empty or the digest
    /// is not 32 hex-encoded bytes.
    pub fn from_digest(login: impl Into<String>, password_sha256: &str) -> ConsoleResult<Self> {
        let login = login.into();
        if login.is_empty() {
            return Err(ConsoleError::Config("operator login is empty".to_string()));
        }
        let bytes = hex::decode(password_sha256.trim())
            .map_err(|e| ConsoleError::Config(format!("operator password digest: {e}")))?;
        let password_sha256: [u8; 32] = bytes.try_into().map_err(|_| {
            ConsoleError::Config("operator password digest must be 32 bytes".to_string())
        })?;
        Ok(Self {
            login,
            password_sha256,
        })
    }

    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Checks submitted credentials against this account.
    #[must_use]
    pub fn matches(&self, credentials: &Credentials) -> bool {
        let digest: [u8; 32] = Sha256::digest(credentials.password.as_bytes()).into();
        // Compare every byte so timing does not depend on the mismatch position.
        let password_ok = digest
            .iter()
            .zip(self.password_sha256.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0;
        password_ok && credentials.login == self.login
    }
}

impl fmt::Debug for OperatorAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorAccount")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

/// Who decides whether a login succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginGate {
    /// Local check against a configured account.
    Operator(OperatorAccount),
    /// Delegated to the license service.
    Remote,
}

impl LoginGate {
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote)
    }
}
