//! Observable auth state.
//!
//! The auth adapter owns an [`AuthStateHub`] and publishes every sign-in and
//! sign-out through it. Views hold an [`AuthSubscription`] for as long as they
//! are mounted. A subscription first yields the state current at subscribe
//! time, then each later change. Changes published faster than a subscriber
//! reads them are coalesced to the latest state.
//!
//! Once [`AuthSubscription::unsubscribe`] returns, [`AuthSubscription::next`]
//! yields `None` forever.

use tokio::sync::watch;

use crate::domain::entities::User;

/// Publisher side of the auth state.
#[derive(Debug)]
pub struct AuthStateHub {
    tx: watch::Sender<Option<User>>,
}

impl AuthStateHub {
    /// Creates hub in the signed-out state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Publishes a new auth state to every subscriber.
    pub fn publish(&self, user: Option<User>) {
        self.tx.send_replace(user);
    }

    /// Returns the last published state.
    #[must_use]
    pub fn current(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription::new(self.tx.subscribe())
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AuthStateHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber side of the auth state.
#[derive(Debug)]
pub struct AuthSubscription {
    rx: Option<watch::Receiver<Option<User>>>,
}

impl AuthSubscription {
    fn new(mut rx: watch::Receiver<Option<User>>) -> Self {
        rx.mark_changed();
        Self { rx: Some(rx) }
    }

    /// Waits for the next auth state.
    ///
    /// Returns `None` once unsubscribed or when the publisher is gone.
    pub async fn next(&mut self) -> Option<Option<User>> {
        let rx = self.rx.as_mut()?;
        if rx.changed().await.is_err() {
            self.rx = None;
            return None;
        }
        Some(rx.borrow_and_update().clone())
    }

    /// Stops delivery. Idempotent.
    pub fn unsubscribe(&mut self) {
        self.rx = None;
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.rx.is_some()
    }
}
