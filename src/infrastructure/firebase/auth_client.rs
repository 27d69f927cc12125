//! Firebase Authentication REST client.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::dto::{
    ErrorResponse, LookupRequest, LookupResponse, RefreshTokenResponse,
    SignInWithPasswordRequest, SignInWithPasswordResponse, parse_expires_in,
};
use crate::domain::auth_state::{AuthStateHub, AuthSubscription};
use crate::domain::entities::{Credentials, IdToken, RefreshToken, Session, User};
use crate::domain::errors::AuthError;
use crate::domain::ports::AuthPort;
use crate::infrastructure::config::FirebaseConfig;

fn transport_error(e: &reqwest::Error) -> AuthError {
    if e.is_timeout() {
        AuthError::network("request timed out")
    } else if e.is_connect() {
        AuthError::network("failed to connect to auth provider")
    } else {
        AuthError::network(e.to_string())
    }
}

/// Maps an Identity Toolkit / Secure Token error to an auth error.
fn classify_error(status: StatusCode, message: &str) -> AuthError {
    // Messages look like `INVALID_PASSWORD` or `TOO_MANY_ATTEMPTS_TRY_LATER : detail`.
    let code = message.split([' ', ':']).next().unwrap_or_default();

    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL"
        | "MISSING_PASSWORD" => AuthError::invalid_credentials("invalid email or password"),
        "USER_DISABLED" => AuthError::invalid_credentials("account disabled"),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" | "INVALID_ID_TOKEN" => {
            AuthError::rejected("session expired, please sign in again")
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::RateLimited,
        _ => match status {
            StatusCode::TOO_MANY_REQUESTS => AuthError::RateLimited,
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                AuthError::network("auth provider is temporarily unavailable")
            }
            _ => AuthError::unexpected(format!("unexpected response: {status} - {message}")),
        },
    }
}

/// Firebase email/password auth over the Identity Toolkit REST API.
pub struct FirebaseAuthClient {
    client: Client,
    api_key: String,
    auth_base_url: String,
    token_base_url: String,
    hub: AuthStateHub,
    session: RwLock<Option<Session>>,
}

impl FirebaseAuthClient {
    /// Creates client for the configured project.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: &FirebaseConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .user_agent(concat!("oxitodo/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AuthError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            auth_base_url: config.auth_endpoint.trim_end_matches('/').to_string(),
            token_base_url: config.token_endpoint.trim_end_matches('/').to_string(),
            hub: AuthStateHub::new(),
            session: RwLock::new(None),
        })
    }

    fn accounts_url(&self, method: &str) -> String {
        format!("{}/accounts:{method}?key={}", self.auth_base_url, self.api_key)
    }

    fn token_url(&self) -> String {
        format!("{}/token?key={}", self.token_base_url, self.api_key)
    }

    async fn read_error(response: reqwest::Response) -> AuthError {
        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(error) => error.error.message,
            Err(_) => format!("HTTP {status}"),
        };
        warn!(status = %status, message = %message, "Auth provider returned an error");
        classify_error(status, &message)
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<RefreshTokenResponse, AuthError> {
        debug!("Exchanging refresh token");

        let response = self
            .client
            .post(self.token_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse token response");
            AuthError::unexpected(format!("failed to parse response: {e}"))
        })
    }

    async fn lookup_email(&self, id_token: &IdToken) -> Option<String> {
        let response = self
            .client
            .post(self.accounts_url("lookup"))
            .json(&LookupRequest {
                id_token: id_token.as_str(),
            })
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Account lookup failed");
            return None;
        }

        let lookup: LookupResponse = response.json().await.ok()?;
        lookup.users.into_iter().next().and_then(|user| user.email)
    }

    fn store_session(&self, session: Session) {
        *self.session.write() = Some(session);
    }

    /// Swaps the session issued from `used` for `next`.
    ///
    /// Returns false, leaving the slot alone, when the session was cleared or
    /// replaced while the refresh was in flight.
    fn replace_refreshed(&self, used: &RefreshToken, next: Option<Session>) -> bool {
        let mut guard = self.session.write();
        match guard.as_ref() {
            Some(current) if current.refresh_token.as_str() == used.as_str() => {
                *guard = next;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl AuthPort for FirebaseAuthClient {
    fn subscribe(&self) -> AuthSubscription {
        self.hub.subscribe()
    }

    fn current_user(&self) -> Option<User> {
        self.hub.current()
    }

    fn refresh_token(&self) -> Option<RefreshToken> {
        self.session
            .read()
            .as_ref()
            .map(|session| session.refresh_token.clone())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        debug!(email = %credentials.email(), "Signing in with password");

        let response = self
            .client
            .post(self.accounts_url("signInWithPassword"))
            .json(&SignInWithPasswordRequest {
                email: credentials.email(),
                password: credentials.password(),
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach auth provider");
                transport_error(&e)
            })?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let body: SignInWithPasswordResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse sign-in response");
            AuthError::unexpected(format!("failed to parse response: {e}"))
        })?;

        self.store_session(Session::new(
            IdToken::new_unchecked(body.id_token),
            RefreshToken::new_unchecked(body.refresh_token),
            parse_expires_in(&body.expires_in),
        ));

        let user = User::new(body.local_id, body.email);
        debug!(uid = %user.uid(), "Sign-in accepted");
        self.hub.publish(Some(user.clone()));
        Ok(user)
    }

    async fn restore(&self, refresh_token: &RefreshToken) -> Result<User, AuthError> {
        let body = self.exchange_refresh_token(refresh_token).await?;

        let id_token = IdToken::new_unchecked(body.id_token);
        let email = self.lookup_email(&id_token).await;

        self.store_session(Session::new(
            id_token,
            RefreshToken::new_unchecked(body.refresh_token),
            parse_expires_in(&body.expires_in),
        ));

        let user = User::new(body.user_id, email);
        self.hub.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write() = None;
        self.hub.publish(None);
        debug!("Session cleared");
        Ok(())
    }

    async fn id_token(&self) -> Result<IdToken, AuthError> {
        let (token, refresh) = {
            let guard = self.session.read();
            let session = guard.as_ref().ok_or(AuthError::NotSignedIn)?;
            if !session.needs_refresh(Utc::now()) {
                return Ok(session.id_token.clone());
            }
            (session.id_token.clone(), session.refresh_token.clone())
        };

        debug!(token = %token, "Id token near expiry, refreshing");
        let body = match self.exchange_refresh_token(&refresh).await {
            Ok(body) => body,
            Err(e @ AuthError::SessionRejected { .. }) => {
                warn!("Refresh token rejected, signing out");
                if self.replace_refreshed(&refresh, None) {
                    self.hub.publish(None);
                }
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let id_token = IdToken::new_unchecked(body.id_token);
        let refreshed = Session::new(
            id_token.clone(),
            RefreshToken::new_unchecked(body.refresh_token),
            parse_expires_in(&body.expires_in),
        );
        if !self.replace_refreshed(&refresh, Some(refreshed)) {
            debug!("Session changed during refresh, discarding new token");
            return Err(AuthError::NotSignedIn);
        }
        Ok(id_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FirebaseConfig {
        FirebaseConfig {
            api_key: "test-key".to_string(),
            project_id: "demo".to_string(),
            ..FirebaseConfig::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = FirebaseAuthClient::new(&config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_urls_carry_api_key() {
        let client = FirebaseAuthClient::new(&config()).unwrap();
        assert_eq!(
            client.accounts_url("signInWithPassword"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=test-key"
        );
        assert_eq!(
            client.token_url(),
            "https://securetoken.googleapis.com/v1/token?key=test-key"
        );
    }

    #[test]
    fn test_classify_error_messages() {
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, "INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials { .. }
        ));
        assert!(matches!(
            classify_error(
                StatusCode::BAD_REQUEST,
                "TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"
            ),
            AuthError::RateLimited
        ));
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, "TOKEN_EXPIRED"),
            AuthError::SessionRejected { .. }
        ));
        assert!(matches!(
            classify_error(StatusCode::SERVICE_UNAVAILABLE, "HTTP 503"),
            AuthError::NetworkError { .. }
        ));
    }

    #[tokio::test]
    async fn test_signed_out_client_has_no_id_token() {
        let client = FirebaseAuthClient::new(&config()).unwrap();
        assert!(matches!(
            client.id_token().await,
            Err(AuthError::NotSignedIn)
        ));
        assert!(client.refresh_token().is_none());
    }

    fn session(refresh: &str) -> Session {
        Session::new(
            IdToken::new_unchecked("id-token"),
            RefreshToken::new_unchecked(refresh),
            3600,
        )
    }

    #[tokio::test]
    async fn test_refresh_after_sign_out_is_discarded() {
        let client = FirebaseAuthClient::new(&config()).unwrap();
        client.store_session(session("refresh-1"));
        let used = RefreshToken::new_unchecked("refresh-1");

        client.sign_out().await.unwrap();

        assert!(!client.replace_refreshed(&used, Some(session("refresh-2"))));
        assert!(client.refresh_token().is_none());
        assert!(matches!(
            client.id_token().await,
            Err(AuthError::NotSignedIn)
        ));
    }

    #[test]
    fn test_refresh_replaces_only_its_own_session() {
        let client = FirebaseAuthClient::new(&config()).unwrap();
        client.store_session(session("refresh-new"));

        let stale = RefreshToken::new_unchecked("refresh-old");
        assert!(!client.replace_refreshed(&stale, None));
        assert!(client.refresh_token().is_some());

        let current = RefreshToken::new_unchecked("refresh-new");
        assert!(client.replace_refreshed(&current, Some(session("refresh-next"))));
        assert_eq!(
            client.refresh_token().map(|token| token.as_str().to_string()),
            Some("refresh-next".to_string())
        );
    }

    #[tokio::test]
    async fn test_sign_out_publishes_signed_out() {
        let client = FirebaseAuthClient::new(&config()).unwrap();
        client.hub.publish(Some(User::new("u1", None)));
        let mut subscription = client.subscribe();
        assert!(matches!(subscription.next().await, Some(Some(_))));

        client.sign_out().await.unwrap();

        assert_eq!(subscription.next().await, Some(None));
        assert!(client.current_user().is_none());
    }
}
