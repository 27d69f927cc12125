//! Navigation port definition.

/// Route shown to signed-out users.
pub const LANDING_ROUTE: &str = "/";

/// Route of the to-do list view.
pub const TODOS_ROUTE: &str = "/todos";

/// Port for switching the visible route.
#[cfg_attr(test, mockall::automock)]
pub trait NavigatorPort: Send + Sync {
    /// Requests navigation to `path`.
    fn navigate(&self, path: &str);
}
