//! Domain error types.

mod auth_error;
mod store_error;
mod todo_error;

pub use auth_error::AuthError;
pub use store_error::StoreError;
pub use todo_error::TodoError;
