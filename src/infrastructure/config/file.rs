//! On-disk `config.toml`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::AppConfig;

const FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no platform config directory; pass --config")]
    NoConfigDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode default config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Location of the config file, chosen once at startup.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Uses `path_override` when given, else `config.toml` in the platform config dir.
    ///
    /// # Errors
    ///
    /// Returns `NoConfigDir` when there is no override and no home directory.
    pub fn locate(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path_override {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(FILE_NAME),
        };
        Ok(Self { path })
    }

    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config. A missing file is created with defaults; an
    /// unparsable one is left alone and defaults are used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default cannot be written.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.path.exists() {
            return self.write_default();
        }

        let content = fs::read_to_string(&self.path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => {
                debug!(path = %self.path.display(), "Loaded config");
                Ok(config)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unparsable config, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    fn write_default(&self) -> Result<AppConfig, ConfigError> {
        info!(path = %self.path.display(), "Writing default config");
        let config = AppConfig::default();
        let parent = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(toml::to_string_pretty(&config)?.as_bytes())?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_override_wins_over_platform_dir() {
        let file = ConfigFile::locate(Some(Path::new("/tmp/todo.toml"))).unwrap();
        assert_eq!(file.path(), Path::new("/tmp/todo.toml"));
    }

    #[test]
    fn test_first_run_writes_defaults_without_secrets() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::at(dir.path().join("nested").join(FILE_NAME));

        let config = file.load().unwrap();
        assert!(config.session.remember);

        let written = fs::read_to_string(file.path()).unwrap();
        assert!(written.contains("[firebase]"));
        assert!(!written.contains("password"));
    }

    #[test]
    fn test_unparsable_file_is_kept() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::at(dir.path().join(FILE_NAME));
        fs::write(file.path(), "invalid_toml = [").unwrap();

        let config = file.load().unwrap();
        assert!(config.session.remember);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "invalid_toml = [");
    }

    #[test]
    fn test_reads_project_settings() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::at(dir.path().join("custom.toml"));
        fs::write(file.path(), "[firebase]\nproject_id = \"todo-demo\"\n").unwrap();

        let config = file.load().unwrap();
        assert_eq!(config.firebase.project_id, "todo-demo");
    }
}
