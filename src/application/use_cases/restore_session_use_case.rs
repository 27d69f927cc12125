//! Session restore use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::User;
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, SessionStoragePort};

/// Re-establishes the previous session from the keyring at startup.
#[derive(Clone)]
pub struct RestoreSessionUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn SessionStoragePort>,
}

impl RestoreSessionUseCase {
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

    /// Restores the stored session, if any.
    ///
    /// A stored token the provider rejects is deleted and `Ok(None)` returned.
    ///
    /// # Errors
    /// Returns error on network failure while exchanging the token.
    pub async fn execute(&self) -> Result<Option<User>, AuthError> {
        debug!("Checking keyring for stored session");
        let token = match self.storage_port.get_refresh_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No stored session found");
                return Ok(None);
            }
            Err(e) => {
                debug!(error = %e, "Failed to check keyring");
                return Ok(None);
            }
        };

        match self.auth_port.restore(&token).await {
            Ok(user) => {
                info!(uid = %user.uid(), "Restored session from system keyring");
                Ok(Some(user))
            }
            Err(e) if e.is_network_error() => Err(e),
            Err(e) => {
                warn!(error = %e, "Stored session rejected, discarding it");
                if let Err(e) = self.storage_port.delete_refresh_token().await {
                    warn!(error = %e, "Failed to discard stored session");
                }
                Ok(None)
            }
        }
    }
}
