//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub(crate) const APP_NAME: &str = "oxitodo";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

const DEFAULT_AUTH_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_TOKEN_ENDPOINT: &str = "https://securetoken.googleapis.com/v1";
const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_DATABASE_ID: &str = "(default)";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Firebase project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Web API key of the project.
    #[serde(default)]
    pub api_key: String,

    /// Project id (`projects/{project_id}`).
    #[serde(default)]
    pub project_id: String,

    /// Firestore database id.
    #[serde(default = "default_database_id")]
    pub database_id: String,

    /// Identity Toolkit base URL. Point at the emulator for local runs.
    #[serde(default = "default_auth_endpoint")]
    pub auth_endpoint: String,

    /// Secure Token base URL.
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,

    /// Firestore base URL.
    #[serde(default = "default_firestore_endpoint")]
    pub firestore_endpoint: String,
}

impl FirebaseConfig {
    /// Both the API key and the project id are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.project_id.trim().is_empty()
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            database_id: default_database_id(),
            auth_endpoint: default_auth_endpoint(),
            token_endpoint: default_token_endpoint(),
            firestore_endpoint: default_firestore_endpoint(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Default for the "remember me" toggle on the sign-in screen.
    #[serde(default = "default_true")]
    pub remember: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { remember: true }
    }
}

/// Application configuration, from the config file merged with CLI arguments.
#[derive(Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Email used for automatic sign-in.
    #[serde(skip)]
    pub email: Option<String>,

    /// Password used for automatic sign-in.
    #[serde(skip)]
    pub password: Option<String>,

    /// Firebase project settings.
    #[serde(default)]
    pub firebase: FirebaseConfig,

    /// Session settings.
    #[serde(default)]
    pub session: SessionConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("config", &self.config)
            .field("log_path", &self.log_path)
            .field("log_level", &self.log_level)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("firebase", &self.firebase)
            .field("session", &self.session)
            .finish()
    }
}

fn default_database_id() -> String {
    DEFAULT_DATABASE_ID.to_string()
}

fn default_auth_endpoint() -> String {
    DEFAULT_AUTH_ENDPOINT.to_string()
}

fn default_token_endpoint() -> String {
    DEFAULT_TOKEN_ENDPOINT.to_string()
}

fn default_firestore_endpoint() -> String {
    DEFAULT_FIRESTORE_ENDPOINT.to_string()
}

fn default_true() -> bool {
    true
}

fn emulator_base(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_key) = args.api_key {
            self.firebase.api_key = api_key;
        }
        if let Some(project_id) = args.project_id {
            self.firebase.project_id = project_id;
        }
        if let Some(database_id) = args.database_id {
            self.firebase.database_id = database_id;
        }
        if let Some(host) = args.auth_emulator_host {
            let base = emulator_base(&host);
            self.firebase.auth_endpoint = format!("{base}/identitytoolkit.googleapis.com/v1");
            self.firebase.token_endpoint = format!("{base}/securetoken.googleapis.com/v1");
        }
        if let Some(host) = args.firestore_emulator_host {
            self.firebase.firestore_endpoint = format!("{}/v1", emulator_base(&host));
        }
        if args.email.is_some() {
            self.email = args.email;
        }
        if args.password.is_some() {
            self.password = args.password;
        }
        if let Some(remember) = args.remember {
            self.session.remember = remember;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("oxitodo.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}
