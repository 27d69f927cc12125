//! Document store error types.

use thiserror::Error;

/// Failures reported by the remote document store.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("document not found: {path}")]
    NotFound { path: String },

    #[error("network error talking to document store: {message}")]
    NetworkError { message: String },

    #[error("rate limited by document store")]
    RateLimited,

    #[error("malformed document {name}: {reason}")]
    MalformedDocument { name: String, reason: String },

    #[error("unexpected document store error: {message}")]
    Unexpected { message: String },
}

impl StoreError {
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::RateLimited)
    }
}
