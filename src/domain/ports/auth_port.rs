//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::auth_state::AuthSubscription;
use crate::domain::entities::{Credentials, IdToken, RefreshToken, User};
use crate::domain::errors::AuthError;

/// Port for the hosted identity provider.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Opens a subscription to auth-state changes.
    fn subscribe(&self) -> AuthSubscription;

    /// Returns the signed-in user, if any.
    fn current_user(&self) -> Option<User>;

    /// Returns the refresh token of the current session.
    fn refresh_token(&self) -> Option<RefreshToken>;

    /// Signs in with email and password and publishes the new user.
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError>;

    /// Re-establishes a session from a stored refresh token.
    async fn restore(&self, refresh_token: &RefreshToken) -> Result<User, AuthError>;

    /// Drops the session and publishes the signed-out state.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Returns a valid id token, refreshing it when close to expiry.
    async fn id_token(&self) -> Result<IdToken, AuthError>;
}
