//! Firebase REST adapters.

mod auth_client;
mod dto;
mod firestore;

pub use auth_client::FirebaseAuthClient;
pub use firestore::FirestoreTodoStore;
