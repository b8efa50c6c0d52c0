//! Console state: the explicit struct the dispatch function reads and
//! updates.

use crate::gate::{LoginGate, DEFAULT_MAX_LOGIN_ATTEMPTS};
use licdesk_types::{Overlay, User, View};

/// Editable text fields of the console's forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    RegisterUsername,
    RegisterPassword,
    LicenseSeed,
    DownloadUsername,
    ActivateUsername,
    ActivateKey,
}

/// Contents of the console's forms.
///
/// Fields are cleared only after the service confirms the operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forms {
    pub register_username: String,
    pub register_password: String,
    pub license_seed: String,
    pub download_username: String,
    pub activate_username: String,
    pub activate_key: String,
}

impl Forms {
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::RegisterUsername => &self.register_username,
            Field::RegisterPassword => &self.register_password,
            Field::LicenseSeed => &self.license_seed,
            Field::DownloadUsername => &self.download_username,
            Field::ActivateUsername => &self.activate_username,
            Field::ActivateKey => &self.activate_key,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        *self.slot(field) = value;
    }

    pub fn clear(&mut self, field: Field) {
        self.slot(field).clear();
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::RegisterUsername => &mut self.register_username,
            Field::RegisterPassword => &mut self.register_password,
            Field::LicenseSeed => &mut self.license_seed,
            Field::DownloadUsername => &mut self.download_username,
            Field::ActivateUsername => &mut self.activate_username,
            Field::ActivateKey => &mut self.activate_key,
        }
    }
}

/// Everything the console controller knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleState {
    pub(crate) view: View,
    pub(crate) overlay: Overlay,
    pub(crate) users: Vec<User>,
    pub(crate) forms: Forms,
    pub(crate) gate: LoginGate,
    pub(crate) failed_logins: u32,
    pub(crate) max_login_attempts: u32,
    pub(crate) login_in_flight: bool,
}

impl ConsoleState {
    /// Creates the initial state: Auth view, no overlay, empty cache.
    #[must_use]
    pub fn new(gate: LoginGate) -> Self {
        Self {
            view: View::Auth,
            overlay: Overlay::None,
            users: Vec::new(),
            forms: Forms::default(),
            gate,
            failed_logins: 0,
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
            login_in_flight: false,
        }
    }

    /// Sets the number of consecutive failures that locks the login gate.
    /// Zero is treated as one.
    #[must_use]
    pub fn with_max_login_attempts(mut self, max: u32) -> Self {
        self.max_login_attempts = max.max(1);
        self
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    /// The cached user list, in service order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn forms(&self) -> &Forms {
        &self.forms
    }

    #[must_use]
    pub fn gate(&self) -> &LoginGate {
        &self.gate
    }

    #[must_use]
    pub fn failed_logins(&self) -> u32 {
        self.failed_logins
    }

    /// Returns true once the failure limit has been reached.
    #[must_use]
    pub fn is_locked_out(&self) -> bool {
        self.failed_logins >= self.max_login_attempts
    }

    /// Returns true while a remote login is awaiting the service.
    #[must_use]
    pub fn login_in_flight(&self) -> bool {
        self.login_in_flight
    }
}
