mod auth_port;
mod navigator_port;
mod session_storage_port;
mod todo_store_port;

pub use auth_port::AuthPort;
pub use navigator_port::{LANDING_ROUTE, NavigatorPort, TODOS_ROUTE};
pub use session_storage_port::SessionStoragePort;
pub use todo_store_port::{TodoStorePort, collection_path};

#[cfg(test)]
pub mod mocks {
    pub use super::auth_port::mock::MockAuthPort;
    pub use super::navigator_port::MockNavigatorPort;
    pub use super::session_storage_port::mock::MockSessionStorage;
    pub use super::todo_store_port::mock::MockTodoStore;
}
