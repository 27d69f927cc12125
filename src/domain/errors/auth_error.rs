//! Authentication error types.

use thiserror::Error;

/// Authentication error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum AuthError {
    #[error("invalid credentials: {reason}")]
    InvalidCredentials { reason: String },

    #[error("session rejected by auth provider: {message}")]
    SessionRejected { message: String },

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("failed to read stored session: {message}")]
    SessionRetrievalFailed { message: String },

    #[error("failed to store session: {message}")]
    SessionStorageFailed { message: String },

    #[error("network error during authentication: {message}")]
    NetworkError { message: String },

    #[error("rate limited by auth provider")]
    RateLimited,

    #[error("unexpected authentication error: {message}")]
    Unexpected { message: String },
}

impl AuthError {
    /// Creates invalid credentials error.
    #[must_use]
    pub fn invalid_credentials(reason: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            reason: reason.into(),
        }
    }

    /// Creates session rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::SessionRejected {
            message: message.into(),
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn retrieval_failed(message: impl Into<String>) -> Self {
        Self::SessionRetrievalFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn storage_failed(message: impl Into<String>) -> Self {
        Self::SessionStorageFailed {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether the user can fix this by trying again.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. }
                | Self::RateLimited
                | Self::InvalidCredentials { .. }
                | Self::SessionRejected { .. }
                | Self::NotSignedIn
        )
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::RateLimited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_classification() {
        assert!(AuthError::network("timeout").is_network_error());
        assert!(AuthError::RateLimited.is_network_error());
        assert!(!AuthError::NotSignedIn.is_network_error());
    }

    #[test]
    fn test_storage_failure_not_recoverable() {
        assert!(!AuthError::storage_failed("locked").is_recoverable());
        assert!(AuthError::invalid_credentials("bad password").is_recoverable());
    }
}
