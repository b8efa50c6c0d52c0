//! Projection of the cached users into the two dashboard lists.
//!
//! Both lists are rebuilt from scratch on every render, in the order the
//! service returned the users.

use licdesk_types::User;
use std::fmt::Write as _;

/// Heading shown above the inline username list.
pub const USERS_HEADING: &str = "Registered users:";

/// A link to a user's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLink {
    pub href: String,
    pub label: String,
}

/// The rendered user lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserViews {
    /// Usernames for the inline display list.
    pub display: Vec<String>,
    /// One link per user, labeled with the username.
    pub links: Vec<UserLink>,
}

impl UserViews {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    /// Plain-text rendering: the heading, the usernames, then the links.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::from(USERS_HEADING);
        out.push('\n');
        for name in &self.display {
            let _ = writeln!(out, "  {name}");
        }
        if !self.links.is_empty() {
            out.push('\n');
            for link in &self.links {
                let _ = writeln!(out, "  {} -> {}", link.label, link.href);
            }
        }
        out
    }
}

/// Projects `users` into both views.
#[must_use]
pub fn project(users: &[User]) -> UserViews {
    UserViews {
        display: users.iter().map(|u| u.username.clone()).collect(),
        links: users
            .iter()
            .map(|u| UserLink {
                href: u.page_path(),
                label: u.username.clone(),
            })
            .collect(),
    }
}
