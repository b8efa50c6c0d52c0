//! Line-oriented terminal frontend for the licdesk console.
//!
//! Each input line is parsed into one [`Action`]; most actions become a short
//! sequence of console events (fill fields, then submit).

use anyhow::{anyhow, bail, Result};
use licdesk_console::{Event, Field, Frontend, Notice, UserViews};
use licdesk_types::{Credentials, Overlay, View};
use std::io::Write;
use tracing::debug;

pub const HELP: &str = "\
Commands:
  login <login> <password>       sign in
  register <username> <password> register a user
  users                          reload the user list
  license | back                 open / close the license page
  generate <seed>                generate a license from a seed string
  download <username>            download a user's license
  activate <username> <key>      activate a license key for a user
  open register|activate         open a modal
  close                          close the open modal
  backdrop                       click outside the open modal
  set <field> <value>            edit a form field
  status                         show the current view
  help                           show this help
  quit                           exit";

/// What one input line asks for.
#[derive(Debug)]
pub enum Action {
    /// Feed these events to the console, in order.
    Events(Vec<Event>),
    Status,
    Help,
    Quit,
    /// Blank line.
    Nothing,
}

/// Parses a form field name such as `register-username`.
pub fn parse_field(name: &str) -> Option<Field> {
    let field = match name {
        "register-username" => Field::RegisterUsername,
        "register-password" => Field::RegisterPassword,
        "seed" => Field::LicenseSeed,
        "download-username" => Field::DownloadUsername,
        "activate-username" => Field::ActivateUsername,
        "activate-key" => Field::ActivateKey,
        _ => return None,
    };
    Some(field)
}

fn input(field: Field, value: &str) -> Event {
    Event::Input {
        field,
        value: value.to_string(),
    }
}

fn args<const N: usize>(command: &str, rest: &[&str]) -> Result<[String; N]> {
    if rest.len() != N {
        bail!("usage error: '{command}' takes {N} argument(s); type 'help'");
    }
    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, arg) in out.iter_mut().zip(rest) {
        *slot = (*arg).to_string();
    }
    Ok(out)
}

/// Parses one input line.
pub fn parse_line(line: &str) -> Result<Action> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, rest)) = words.split_first() else {
        return Ok(Action::Nothing);
    };

    let events = match command {
        "quit" | "exit" => return Ok(Action::Quit),
        "help" | "?" => return Ok(Action::Help),
        "status" => return Ok(Action::Status),
        "login" => {
            let [login, password] = args::<2>(command, rest)?;
            vec![Event::SubmitLogin(Credentials::new(login, password))]
        }
        "register" => {
            let [username, password] = args::<2>(command, rest)?;
            vec![
                input(Field::RegisterUsername, &username),
                input(Field::RegisterPassword, &password),
                Event::SubmitRegistration,
            ]
        }
        "users" => vec![Event::ReloadUsers],
        "license" => vec![Event::OpenLicensePage],
        "back" => vec![Event::CloseLicensePage],
        "generate" => {
            // The seed may contain spaces.
            let seed = rest.join(" ");
            vec![input(Field::LicenseSeed, &seed), Event::SubmitGenerateLicense]
        }
        "download" => {
            let [username] = args::<1>(command, rest)?;
            vec![
                input(Field::DownloadUsername, &username),
                Event::SubmitDownloadLicense,
            ]
        }
        "activate" => {
            let [username, key] = args::<2>(command, rest)?;
            vec![
                input(Field::ActivateUsername, &username),
                input(Field::ActivateKey, &key),
                Event::SubmitActivateLicense,
            ]
        }
        "open" => {
            let [which] = args::<1>(command, rest)?;
            let overlay = match which.as_str() {
                "register" => Overlay::RegisterModal,
                "activate" => Overlay::ActivateModal,
                other => bail!("unknown modal '{other}'"),
            };
            vec![Event::OpenOverlay(overlay)]
        }
        "close" => vec![Event::CloseOverlay],
        "backdrop" => vec![Event::BackdropClicked],
        "set" => {
            let Some((&name, value)) = rest.split_first() else {
                bail!("usage error: 'set' takes a field and a value; type 'help'");
            };
            let field = parse_field(name).ok_or_else(|| anyhow!("unknown field '{name}'"))?;
            vec![input(field, &value.join(" "))]
        }
        other => bail!("unknown command '{other}'; type 'help'"),
    };
    Ok(Action::Events(events))
}

/// Writes console output as plain text lines.
pub struct TerminalFrontend<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalFrontend<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            debug!("Terminal write failed: {e}");
        }
    }
}

impl<W: Write + Send> Frontend for TerminalFrontend<W> {
    fn notify(&mut self, notice: &Notice) {
        let text = if notice.kind.is_error() {
            format!("! {}", notice.message)
        } else {
            format!("* {}", notice.message)
        };
        self.line(&text);
    }

    fn render_users(&mut self, views: &UserViews) {
        let text = views.to_text();
        self.line(text.trim_end());
    }

    fn show(&mut self, view: View, overlay: Overlay) {
        let text = if overlay.is_open() {
            format!("[{view} | {overlay}]")
        } else {
            format!("[{view}]")
        };
        self.line(&text);
    }
}
