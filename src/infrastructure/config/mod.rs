//! Application configuration.

pub mod app_config;
pub mod args;
pub mod file;

pub use app_config::{AppConfig, FirebaseConfig, LogLevel, SessionConfig};
pub use args::CliArgs;
pub use file::{ConfigError, ConfigFile};
