//! Authenticated user entity.

use serde::{Deserialize, Serialize};

/// Provider-issued unique user identifier (`uid`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates id from provider value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identity observed from the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    uid: UserId,
    email: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(uid: impl Into<UserId>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
        }
    }

    #[must_use]
    pub const fn uid(&self) -> &UserId {
        &self.uid
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the email when known, the uid otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or_else(|| self.uid.as_str())
    }
}
