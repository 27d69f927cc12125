//! Route handling for the terminal front end.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::ports::{LANDING_ROUTE, NavigatorPort, TODOS_ROUTE};

/// Screens the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Sign-in screen.
    Landing,
    /// To-do list screen.
    Todos,
}

impl Route {
    /// Unknown paths fall back to the landing screen.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path {
            TODOS_ROUTE => Self::Todos,
            LANDING_ROUTE => Self::Landing,
            other => {
                warn!(path = other, "Unknown route, showing landing screen");
                Self::Landing
            }
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => LANDING_ROUTE,
            Self::Todos => TODOS_ROUTE,
        }
    }
}

/// Navigator that forwards route requests to the event loop.
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NavigatorPort for ChannelNavigator {
    fn navigate(&self, path: &str) {
        let route = Route::from_path(path);
        debug!(path, ?route, "Navigating");
        if self.tx.send(route).is_err() {
            debug!("Event loop gone, dropping navigation");
        }
    }
}
