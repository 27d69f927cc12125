//! Errors surfaced by to-do list operations.

use thiserror::Error;

use super::{AuthError, StoreError};

#[derive(Debug, Error)]
pub enum TodoError {
    /// Add or delete attempted without a signed-in user.
    #[error("user not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl TodoError {
    #[must_use]
    pub const fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }
}
