//! Domain layer with core entities, the auth-state observable and port definitions.

/// Observable auth state.
pub mod auth_state;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use auth_state::{AuthStateHub, AuthSubscription};
pub use entities::{TodoItem, User};
pub use errors::{AuthError, StoreError, TodoError};
pub use ports::{AuthPort, NavigatorPort, SessionStoragePort, TodoStorePort};
