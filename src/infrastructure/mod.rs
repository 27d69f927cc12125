//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Firebase REST clients.
pub mod firebase;
/// Session storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, ConfigFile, FirebaseConfig, LogLevel};
pub use firebase::{FirebaseAuthClient, FirestoreTodoStore};
pub use storage::KeyringSessionStorage;
