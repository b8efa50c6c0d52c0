use serde::{Deserialize, Serialize};

use crate::UserId;

/// A user as listed by the license service.
///
/// The console holds these as a read-only cache that is replaced wholesale on
/// every reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    #[must_use]
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }

    /// Path of this user's page on the service (`/user/{id}`).
    #[must_use]
    pub fn page_path(&self) -> String {
        format!("/user/{}", self.id)
    }
}
