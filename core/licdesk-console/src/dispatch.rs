//! The console state machine.
//!
//! [`dispatch`] maps `(state, event)` to an updated state plus the commands
//! the runtime must execute. It performs no I/O, so every transition can be
//! exercised without a network or a screen.

use crate::event::{Command, Event, Notice, NoticeKind};
use crate::gate::LoginGate;
use crate::state::{ConsoleState, Field};
use licdesk_gateway::{GatewayError, GatewayResult};
use licdesk_license::{ActivationRequest, LicenseFile, LicenseKey, LicenseRecord, LicenseResult};
use licdesk_types::{Credentials, Overlay, RegisterRequest, RegisterResponse, User, View};
use std::path::PathBuf;
use tracing::debug;

pub const MSG_INVALID_LOGIN: &str = "Invalid login or password";
pub const MSG_LOCKED_OUT: &str = "Too many failed login attempts; restart the console to try again";
pub const MSG_LOGIN_REQUIRED: &str = "Please enter login and password";
pub const MSG_REGISTER_FIELDS: &str = "Please fill in both fields";
pub const MSG_REGISTERED: &str = "User registered successfully";
pub const MSG_REGISTER_FAILED: &str = "Failed to register user";
pub const MSG_SEED_REQUIRED: &str = "Enter a string before sending the request";
pub const MSG_DOWNLOAD_USERNAME_REQUIRED: &str = "Enter a username before downloading the license";
pub const MSG_GENERATE_FIRST: &str = "Please generate a license first";
pub const MSG_ACTIVATE_USERNAME_REQUIRED: &str = "Please enter a username";
pub const MSG_ACTIVATE_KEY_REQUIRED: &str = "Please enter a license key";

/// Applies one event to the state and returns the commands it triggers.
pub fn dispatch(state: &mut ConsoleState, event: Event) -> Vec<Command> {
    match event {
        Event::SubmitLogin(credentials) => submit_login(state, credentials),
        Event::OpenLicensePage => {
            if state.view == View::Dashboard {
                state.view = View::License;
            }
            Vec::new()
        }
        Event::CloseLicensePage => {
            if state.view == View::License {
                state.view = View::Dashboard;
            }
            Vec::new()
        }
        Event::OpenOverlay(overlay) => {
            state.overlay = overlay;
            Vec::new()
        }
        Event::CloseOverlay | Event::BackdropClicked => {
            state.overlay = Overlay::None;
            Vec::new()
        }
        Event::Input { field, value } => {
            state.forms.set(field, value);
            Vec::new()
        }
        Event::SubmitRegistration => guarded(state, "registration", submit_registration),
        Event::ReloadUsers => guarded(state, "user reload", |_| vec![Command::ListUsers]),
        Event::SubmitGenerateLicense => guarded(state, "license generation", submit_generate),
        Event::SubmitDownloadLicense => guarded(state, "license download", submit_download),
        Event::SubmitActivateLicense => guarded(state, "license activation", submit_activate),

        Event::LoginCompleted(result) => login_completed(state, result),
        Event::RegistrationCompleted { username, result } => {
            registration_completed(state, &username, result)
        }
        Event::UsersLoaded(result) => users_loaded(state, result),
        Event::LicenseGenerated(result) => license_generated(result),
        Event::LicenseDownloaded { username, result } => license_downloaded(&username, result),
        Event::LicenseSaved(result) => license_saved(result),
        Event::LicenseActivated { username, result } => {
            license_activated(state, &username, result)
        }
    }
}

/// Runs `f` only once the operator is past the login gate.
fn guarded(
    state: &mut ConsoleState,
    what: &str,
    f: impl FnOnce(&mut ConsoleState) -> Vec<Command>,
) -> Vec<Command> {
    if !state.view.is_authenticated() {
        debug!("Ignoring {what} before login");
        return Vec::new();
    }
    f(state)
}

fn notify(kind: NoticeKind, message: impl Into<String>) -> Command {
    Command::Notify(Notice::new(kind, message))
}

fn enter_dashboard(state: &mut ConsoleState) -> Vec<Command> {
    state.view = View::Dashboard;
    state.failed_logins = 0;
    vec![Command::ListUsers]
}

fn record_failed_login(state: &mut ConsoleState) -> Vec<Command> {
    state.failed_logins = state.failed_logins.saturating_add(1);
    debug!(
        "Failed login {}/{}",
        state.failed_logins, state.max_login_attempts
    );
    vec![notify(NoticeKind::Auth, MSG_INVALID_LOGIN)]
}

// ── login ─────────────────────────────────────────────────────────

fn submit_login(state: &mut ConsoleState, credentials: Credentials) -> Vec<Command> {
    if state.view != View::Auth {
        debug!("Ignoring login submission outside the auth view");
        return Vec::new();
    }
    if state.is_locked_out() {
        return vec![notify(NoticeKind::Auth, MSG_LOCKED_OUT)];
    }
    if credentials.is_incomplete() {
        return vec![Command::Notify(Notice::validation(MSG_LOGIN_REQUIRED))];
    }

    match &state.gate {
        LoginGate::Operator(account) => {
            if account.matches(&credentials) {
                enter_dashboard(state)
            } else {
                record_failed_login(state)
            }
        }
        LoginGate::Remote => {
            if state.login_in_flight {
                debug!("Login already in flight");
                return Vec::new();
            }
            state.login_in_flight = true;
            vec![Command::Authenticate(credentials)]
        }
    }
}

fn login_completed(state: &mut ConsoleState, result: GatewayResult<()>) -> Vec<Command> {
    state.login_in_flight = false;
    if state.view != View::Auth {
        return Vec::new();
    }
    match result {
        Ok(()) => enter_dashboard(state),
        Err(GatewayError::Unauthorized) => record_failed_login(state),
        Err(err) => vec![notify(Notice::kind_of(&err), format!("Login failed: {err}"))],
    }
}

// ── users ─────────────────────────────────────────────────────────

fn submit_registration(state: &mut ConsoleState) -> Vec<Command> {
    let username = state.forms.register_username.clone();
    let password = state.forms.register_password.clone();
    if username.is_empty() || password.is_empty() {
        return vec![Command::Notify(Notice::validation(MSG_REGISTER_FIELDS))];
    }
    vec![Command::RegisterUser(RegisterRequest { username, password })]
}

fn registration_completed(
    state: &mut ConsoleState,
    username: &str,
    result: GatewayResult<RegisterResponse>,
) -> Vec<Command> {
    match result {
        Ok(_) => {
            debug!("Registration of {username} confirmed");
            state.forms.clear(Field::RegisterUsername);
            state.forms.clear(Field::RegisterPassword);
            vec![Command::Notify(Notice::info(MSG_REGISTERED)), Command::ListUsers]
        }
        Err(err) if err.is_transport() => {
            vec![notify(NoticeKind::Network, format!("Error: {err}"))]
        }
        Err(err) => {
            let message = err
                .detail()
                .map_or_else(|| MSG_REGISTER_FAILED.to_string(), |d| format!("Error: {d}"));
            vec![notify(Notice::kind_of(&err), message)]
        }
    }
}

fn users_loaded(state: &mut ConsoleState, result: GatewayResult<Vec<User>>) -> Vec<Command> {
    match result {
        Ok(users) => {
            state.users = users;
            vec![Command::RenderUsers]
        }
        Err(err) => vec![Command::Diagnostic(format!("Error loading users: {err}"))],
    }
}

// ── licenses ──────────────────────────────────────────────────────

fn submit_generate(state: &mut ConsoleState) -> Vec<Command> {
    let seed = state.forms.license_seed.clone();
    if seed.is_empty() {
        return vec![Command::Notify(Notice::validation(MSG_SEED_REQUIRED))];
    }
    vec![Command::GenerateLicense { seed }]
}

fn license_generated(result: GatewayResult<LicenseRecord>) -> Vec<Command> {
    match result {
        Ok(record) => vec![Command::Notify(Notice::info(format!(
            "License key generated: {}",
            record.key
        )))],
        Err(err) if err.is_transport() => vec![notify(
            NoticeKind::Network,
            "Could not generate the license. Check the server settings.",
        )],
        Err(err) => vec![notify(
            Notice::kind_of(&err),
            format!("License generation failed: {}", err.detail_or_status()),
        )],
    }
}

fn submit_download(state: &mut ConsoleState) -> Vec<Command> {
    let username = state.forms.download_username.clone();
    if username.is_empty() {
        return vec![Command::Notify(Notice::validation(
            MSG_DOWNLOAD_USERNAME_REQUIRED,
        ))];
    }
    vec![Command::DownloadLicense { username }]
}

fn license_downloaded(username: &str, result: GatewayResult<LicenseFile>) -> Vec<Command> {
    match result {
        Ok(file) => {
            debug!("License for {username} received as {}", file.filename());
            vec![Command::SaveLicense(file)]
        }
        Err(GatewayError::LicenseNotGenerated { .. }) => {
            vec![notify(NoticeKind::LicenseNotGenerated, MSG_GENERATE_FIRST)]
        }
        Err(err) if err.is_transport() => vec![notify(
            NoticeKind::Network,
            "Could not download the license. Check the server settings.",
        )],
        Err(GatewayError::Server {
            status,
            status_text,
            ..
        }) => {
            let status_text = if status_text.is_empty() {
                status.to_string()
            } else {
                status_text
            };
            vec![notify(
                NoticeKind::Server,
                format!("License download failed: {status_text}"),
            )]
        }
        Err(err) => vec![notify(
            Notice::kind_of(&err),
            format!("License download failed: {err}"),
        )],
    }
}

fn license_saved(result: LicenseResult<PathBuf>) -> Vec<Command> {
    match result {
        Ok(path) => vec![Command::Notify(Notice::info(format!(
            "License saved to {}",
            path.display()
        )))],
        Err(err) => vec![notify(
            NoticeKind::Storage,
            format!("Could not save the license: {err}"),
        )],
    }
}

fn submit_activate(state: &mut ConsoleState) -> Vec<Command> {
    let username = state.forms.activate_username.clone();
    if username.is_empty() {
        return vec![Command::Notify(Notice::validation(
            MSG_ACTIVATE_USERNAME_REQUIRED,
        ))];
    }
    let Ok(key) = LicenseKey::parse(&state.forms.activate_key) else {
        return vec![Command::Notify(Notice::validation(MSG_ACTIVATE_KEY_REQUIRED))];
    };
    vec![Command::ActivateLicense(ActivationRequest { key, username })]
}

fn license_activated(
    state: &mut ConsoleState,
    username: &str,
    result: GatewayResult<LicenseRecord>,
) -> Vec<Command> {
    match result {
        Ok(_) => {
            state.forms.clear(Field::ActivateUsername);
            state.forms.clear(Field::ActivateKey);
            vec![Command::Notify(Notice::info(format!(
                "License activated for {username}"
            )))]
        }
        Err(err) if err.is_transport() => vec![notify(
            NoticeKind::Network,
            "Could not activate the license. Check the server settings.",
        )],
        Err(err) => vec![notify(
            Notice::kind_of(&err),
            format!("License activation failed: {}", err.detail_or_status()),
        )],
    }
}
