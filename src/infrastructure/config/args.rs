use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "oxitodo",
    version,
    about = "A lightweight terminal to-do list backed by Firebase",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Firebase web API key.
    #[arg(long, env = "OXITODO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Firebase project id.
    #[arg(long, env = "OXITODO_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Firestore database id.
    #[arg(long)]
    pub database_id: Option<String>,

    /// Auth emulator address, e.g. `127.0.0.1:9099`.
    #[arg(long, env = "FIREBASE_AUTH_EMULATOR_HOST", value_name = "HOST:PORT")]
    pub auth_emulator_host: Option<String>,

    /// Firestore emulator address, e.g. `127.0.0.1:8080`.
    #[arg(long, env = "FIRESTORE_EMULATOR_HOST", value_name = "HOST:PORT")]
    pub firestore_emulator_host: Option<String>,

    /// Email for automatic sign-in.
    #[arg(long, env = "OXITODO_EMAIL")]
    pub email: Option<String>,

    /// Password for automatic sign-in.
    #[arg(long, env = "OXITODO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Keep the session in the system keyring.
    #[arg(long)]
    pub remember: Option<bool>,
}
