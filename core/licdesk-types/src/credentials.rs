use std::fmt;

/// A login/password pair captured from the login form.
///
/// Transient: carried by the login event, never stored in console state.
/// The password is redacted from `Debug` output so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Returns true if either field is empty.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.login.is_empty() || self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}
