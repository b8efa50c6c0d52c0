//! Activation keys and license records.
//!
//! Keys are opaque to the console: the service generates them (a UUID in
//! practice) and the console only displays them and sends them back for
//! activation. Keys coming from the service are kept verbatim in
//! [`LicenseRecord`]; [`LicenseKey`] validates what the operator types.

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An activation key entered by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Validates a key string. Surrounding whitespace is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or contains whitespace.
    pub fn parse(key: &str) -> LicenseResult<Self> {
        let key = key.trim();
        if key.is_empty() {
            return Err(LicenseError::InvalidKey("key is empty".to_string()));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(LicenseError::InvalidKey(
                "key must not contain whitespace".to_string(),
            ));
        }
        Ok(Self(key.to_string()))
    }

    /// Returns the raw key string.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LicenseKey {
    type Error = LicenseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LicenseKey> for String {
    fn from(key: LicenseKey) -> Self {
        key.0
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Activation state of a license record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// Key issued but not yet bound to a user.
    NotActivated,
    /// Key activated and bound.
    Active,
}

/// A license record as returned by generation and activation.
///
/// Only `key` is guaranteed; the remaining fields are present when the
/// service returns its full record. The key is shown as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl LicenseRecord {
    /// Creates a bare record carrying only a key.
    #[must_use]
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            id: None,
            is_active: false,
            user_id: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> LicenseStatus {
        if self.is_active {
            LicenseStatus::Active
        } else {
            LicenseStatus::NotActivated
        }
    }
}

/// Body of `POST /licenses/activation-key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRequest {
    pub key: LicenseKey,
    pub username: String,
}
