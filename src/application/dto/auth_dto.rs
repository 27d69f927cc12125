//! Authentication DTOs.

use crate::domain::entities::{Credentials, User};

/// Where the credentials of a sign-in came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Command line or environment variables.
    CommandLine,
    /// System keyring (stored refresh token).
    Keyring,
    /// Entered on the sign-in screen.
    UserInput,
}

impl CredentialSource {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::CommandLine => "command line / environment",
            Self::Keyring => "system keyring",
            Self::UserInput => "user input",
        }
    }
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Sign-in request data.
#[derive(Debug, Clone)]
pub struct SignInRequest {
    pub credentials: Credentials,
    pub source: CredentialSource,
    /// Whether to keep the session for the next run.
    pub remember: bool,
}

impl SignInRequest {
    #[must_use]
    pub fn new(credentials: Credentials, source: CredentialSource) -> Self {
        Self {
            credentials,
            source,
            remember: true,
        }
    }

    /// Disables session persistence.
    #[must_use]
    pub fn without_persistence(mut self) -> Self {
        self.remember = false;
        self
    }
}

/// Sign-in response data.
#[derive(Debug, Clone)]
pub struct SignInResponse {
    pub user: User,
    pub source: CredentialSource,
    pub session_persisted: bool,
}

impl SignInResponse {
    #[must_use]
    pub const fn new(user: User, source: CredentialSource, session_persisted: bool) -> Self {
        Self {
            user,
            source,
            session_persisted,
        }
    }
}
