//! The two independent axes of the console screen.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level page section currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Login form. The console starts here.
    #[default]
    Auth,
    /// User registration and listing.
    Dashboard,
    /// License generation, download and activation.
    License,
}

impl View {
    /// Returns true once the operator has passed the login gate.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Dashboard | Self::License)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auth => "auth",
            Self::Dashboard => "dashboard",
            Self::License => "license",
        };
        f.write_str(name)
    }
}

/// Modal dialog layered on top of the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    #[default]
    None,
    RegisterModal,
    ActivateModal,
}

impl Overlay {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::RegisterModal => "register",
            Self::ActivateModal => "activate",
        };
        f.write_str(name)
    }
}
