//! Sign-in and sign-out use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{SignInRequest, SignInResponse};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, SessionStoragePort};

/// Handles the email/password sign-in workflow.
#[derive(Clone)]
pub struct SignInUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn SessionStoragePort>,
}

impl SignInUseCase {
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        storage_port: Arc<dyn SessionStoragePort>,
    ) -> Self {
        Self {
            auth_port,
            storage_port,
        }
    }

    /// Executes sign-in with provided request.
    ///
    /// # Errors
    /// Returns error if credentials are incomplete or rejected.
    pub async fn execute(&self, request: SignInRequest) -> Result<SignInResponse, AuthError> {
        debug!(source = %request.source, "Attempting sign-in");

        if !request.credentials.is_complete() {
            warn!("Incomplete credentials provided");
            return Err(AuthError::invalid_credentials(
                "email and password are required",
            ));
        }

        let user = self
            .auth_port
            .sign_in(&request.credentials)
            .await
            .map_err(|e| {
                warn!(error = %e, "Sign-in failed");
                e
            })?;

        info!(uid = %user.uid(), user = %user.display_name(), "Successfully signed in");

        let session_persisted = if request.remember {
            self.persist_session().await
        } else {
            debug!("Session persistence disabled, skipping storage");
            false
        };

        Ok(SignInResponse::new(user, request.source, session_persisted))
    }

    /// Signs out and forgets the stored session.
    ///
    /// # Errors
    /// Returns error if the provider or the keyring fails.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        debug!("Signing out");
        self.auth_port.sign_out().await?;

        match self.storage_port.delete_refresh_token().await {
            Ok(()) => {
                info!("Signed out and removed stored session");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to delete stored session");
                Err(e)
            }
        }
    }

    async fn persist_session(&self) -> bool {
        let Some(refresh_token) = self.auth_port.refresh_token() else {
            warn!("Provider returned no refresh token, session not persisted");
            return false;
        };

        match self.storage_port.store_refresh_token(&refresh_token).await {
            Ok(()) => {
                info!("Session persisted to secure storage");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist session to secure storage");
                false
            }
        }
    }
}
