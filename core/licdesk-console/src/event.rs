//! Inputs to and outputs from the dispatch function.

use crate::state::Field;
use licdesk_gateway::{GatewayError, GatewayResult};
use licdesk_license::{ActivationRequest, LicenseFile, LicenseRecord, LicenseResult};
use licdesk_types::{Credentials, Overlay, RegisterRequest, RegisterResponse, User};
use std::fmt;
use std::path::PathBuf;

/// Something that happened: operator input, or a completed remote call.
#[derive(Debug)]
pub enum Event {
    // ── operator input ──
    SubmitLogin(Credentials),
    OpenLicensePage,
    CloseLicensePage,
    OpenOverlay(Overlay),
    CloseOverlay,
    BackdropClicked,
    Input { field: Field, value: String },
    SubmitRegistration,
    ReloadUsers,
    SubmitGenerateLicense,
    SubmitDownloadLicense,
    SubmitActivateLicense,

    // ── completions ──
    LoginCompleted(GatewayResult<()>),
    RegistrationCompleted {
        username: String,
        result: GatewayResult<RegisterResponse>,
    },
    UsersLoaded(GatewayResult<Vec<User>>),
    LicenseGenerated(GatewayResult<LicenseRecord>),
    LicenseDownloaded {
        username: String,
        result: GatewayResult<LicenseFile>,
    },
    LicenseSaved(LicenseResult<PathBuf>),
    LicenseActivated {
        username: String,
        result: GatewayResult<LicenseRecord>,
    },
}

/// A side effect requested by the dispatch function.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Authenticate(Credentials),
    RegisterUser(RegisterRequest),
    ListUsers,
    GenerateLicense { seed: String },
    DownloadLicense { username: String },
    ActivateLicense(ActivationRequest),
    /// Write a downloaded license to the download directory.
    SaveLicense(LicenseFile),
    /// Re-render both user list views from the cache.
    RenderUsers,
    /// Show a message to the operator.
    Notify(Notice),
    /// Log to the diagnostic channel only; the operator sees nothing.
    Diagnostic(String),
}

impl Command {
    /// Returns true for commands that go to the license service.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Command::Authenticate(_)
                | Command::RegisterUser(_)
                | Command::ListUsers
                | Command::GenerateLicense { .. }
                | Command::DownloadLicense { .. }
                | Command::ActivateLicense(_)
        )
    }
}

/// Category of an operator-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Confirmation of a successful operation.
    Info,
    /// A required field was empty; nothing was sent.
    Validation,
    /// Bad credentials or a locked login gate.
    Auth,
    /// The service could not be reached.
    Network,
    /// The service answered with an error.
    Server,
    /// Download attempted before any license was generated.
    LicenseNotGenerated,
    /// The downloaded file could not be written.
    Storage,
}

impl NoticeKind {
    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self, NoticeKind::Info)
    }
}

/// A message for the operator (the console's equivalent of an alert box).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Validation, message)
    }

    /// Category a gateway failure falls into.
    #[must_use]
    pub fn kind_of(err: &GatewayError) -> NoticeKind {
        match err {
            GatewayError::Network(_) | GatewayError::Timeout => NoticeKind::Network,
            GatewayError::Unauthorized => NoticeKind::Auth,
            GatewayError::LicenseNotGenerated { .. } => NoticeKind::LicenseNotGenerated,
            GatewayError::Server { .. } | GatewayError::Decode(_) | GatewayError::Config(_) => {
                NoticeKind::Server
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
