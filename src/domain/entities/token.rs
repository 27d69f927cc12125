//! Session token value objects.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

fn mask(value: &str) -> String {
    if value.len() <= 10 {
        return "*".repeat(value.len());
    }

    let visible_prefix = &value[..4];
    let visible_suffix = &value[value.len() - 4..];
    format!("{visible_prefix}...{visible_suffix}")
}

macro_rules! secret_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
        pub struct $name {
            value: String,
        }

        impl $name {
            /// Creates token, rejecting blank values.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into().trim().to_string();
                if value.is_empty() {
                    return None;
                }
                Some(Self { value })
            }

            /// Creates token without validation.
            #[must_use]
            pub fn new_unchecked(value: impl Into<String>) -> Self {
                Self {
                    value: value.into(),
                }
            }

            /// Returns token as string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.value
            }

            /// Returns masked token for display.
            #[must_use]
            pub fn masked(&self) -> String {
                mask(&self.value)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("value", &self.masked())
                    .finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.masked())
            }
        }
    };
}

secret_token!(
    /// Short-lived bearer token sent to the document store.
    IdToken
);

secret_token!(
    /// Long-lived token exchanged for fresh id tokens.
    RefreshToken
);

/// Email/password pair for sign-in.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Both fields present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Signed-in session held by the auth adapter.
#[derive(Debug, Clone)]
pub struct Session {
    pub id_token: IdToken,
    pub refresh_token: RefreshToken,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    const EXPIRY_SKEW_SECS: i64 = 60;

    #[must_use]
    pub fn new(id_token: IdToken, refresh_token: RefreshToken, expires_in_secs: i64) -> Self {
        Self {
            id_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    /// True when the id token expires within the refresh skew.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(Self::EXPIRY_SKEW_SECS) >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_TOKEN: &str = "eyJhbGciOiJSUzI1NiIsImtpZCI6IjEifQ.payload.signature";

    #[test]
    fn test_blank_token_rejected() {
        assert!(IdToken::new("   ").is_none());
        assert!(RefreshToken::new("").is_none());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = IdToken::new_unchecked(LONG_TOKEN);
        let debug_output = format!("{token:?}");

        assert!(debug_output.contains("..."));
        assert!(!debug_output.contains(LONG_TOKEN));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new(" ada@example.com ", "hunter2");
        assert_eq!(credentials.email(), "ada@example.com");
        assert!(!format!("{credentials:?}").contains("hunter2"));
        assert!(credentials.is_complete());
        assert!(!Credentials::new("ada@example.com", "").is_complete());
    }

    #[test]
    fn test_session_refresh_window() {
        let session = Session::new(
            IdToken::new_unchecked(LONG_TOKEN),
            RefreshToken::new_unchecked("refresh"),
            3600,
        );
        assert!(!session.needs_refresh(Utc::now()));
        assert!(session.needs_refresh(Utc::now() + Duration::seconds(3590)));
    }
}
