//! Keyring-based session storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::RefreshToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::SessionStoragePort;

const KEYRING_SERVICE: &str = "oxitodo";
const KEYRING_USER: &str = "refresh-token";

/// System keyring adapter holding the Firebase refresh token.
pub struct KeyringSessionStorage {
    service: String,
    user: String,
}

impl KeyringSessionStorage {
    /// Creates storage scoped to one Firebase project.
    #[must_use]
    pub fn for_project(project_id: &str) -> Self {
        Self {
            service: format!("{KEYRING_SERVICE}:{project_id}"),
            user: KEYRING_USER.to_string(),
        }
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, AuthError> {
        Entry::new(&self.service, &self.user)
            .map_err(|e| AuthError::retrieval_failed(format!("failed to access keyring: {e}")))
    }
}

#[async_trait]
impl SessionStoragePort for KeyringSessionStorage {
    async fn get_refresh_token(&self) -> Result<Option<RefreshToken>, AuthError> {
        debug!(service = %self.service, "Retrieving session from keyring");

        let entry = self.entry()?;

        match entry.get_password() {
            Ok(secret) => {
                debug!("Session found in keyring");
                Ok(RefreshToken::new(secret))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No session stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve session from keyring");
                Err(AuthError::retrieval_failed(e.to_string()))
            }
        }
    }

    async fn store_refresh_token(&self, token: &RefreshToken) -> Result<(), AuthError> {
        debug!(service = %self.service, "Storing session in keyring");

        self.entry()?.set_password(token.as_str()).map_err(|e| {
            warn!(error = %e, "Failed to store session in keyring");
            AuthError::storage_failed(e.to_string())
        })
    }

    async fn delete_refresh_token(&self) -> Result<(), AuthError> {
        debug!(service = %self.service, "Deleting session from keyring");

        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Failed to delete session from keyring");
                Err(AuthError::storage_failed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_is_scoped_to_project() {
        let storage = KeyringSessionStorage::for_project("todo-demo");
        assert_eq!(storage.service, "oxitodo:todo-demo");
        assert_eq!(storage.user, "refresh-token");
    }

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_and_retrieve_session() {
        let storage = KeyringSessionStorage::with_names("oxitodo-test", "test-session");
        let token = RefreshToken::new_unchecked("AMf-vBx-test-refresh-token");

        storage.store_refresh_token(&token).await.unwrap();

        let retrieved = storage.get_refresh_token().await.unwrap();
        assert_eq!(retrieved.map(|t| t.as_str().to_string()), Some(token.as_str().to_string()));

        storage.delete_refresh_token().await.unwrap();
        assert!(!storage.has_refresh_token().await.unwrap());
    }
}
