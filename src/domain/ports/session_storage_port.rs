//! Session persistence port definition.

use async_trait::async_trait;

use crate::domain::entities::RefreshToken;
use crate::domain::errors::AuthError;

/// Port for persisting the refresh token between runs.
#[async_trait]
pub trait SessionStoragePort: Send + Sync {
    /// Retrieves stored refresh token.
    async fn get_refresh_token(&self) -> Result<Option<RefreshToken>, AuthError>;

    /// Stores refresh token securely.
    async fn store_refresh_token(&self, token: &RefreshToken) -> Result<(), AuthError>;

    /// Deletes stored refresh token.
    async fn delete_refresh_token(&self) -> Result<(), AuthError>;

    /// Checks if a token exists.
    async fn has_refresh_token(&self) -> Result<bool, AuthError> {
        Ok(self.get_refresh_token().await?.is_some())
    }
}
