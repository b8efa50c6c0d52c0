//! Identifier types used throughout the console.
//!
//! User ids are assigned by the license service (integer primary keys); the
//! console never mints them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Identifier of a user registered with the license service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw service id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw service id.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Parses a user id from a decimal string.
    pub fn parse(s: &str) -> Result<Self, Error> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| Error::InvalidUserId(format!("{s:?}: {e}")))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for UserId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}
