//! Configuration loader for pushcast
//!
//! This module provides the `ConfigLoader` struct that reads the JSON settings
//! file and pairs it with the process environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::resolver::{SettingsResolver, env_snapshot};
use crate::config::settings::NotificationSettings;

/// Environment variable for the settings file path
pub const CONFIG_FILE_ENV: &str = "PUSHCAST_CONFIG";

/// Default settings file path
pub const DEFAULT_CONFIG_FILE: &str = "config/notification.json";

/// Loads the settings file and builds a [`SettingsResolver`]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_file: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the file named by `PUSHCAST_CONFIG`, or the default path
    pub fn new() -> Self {
        let config_file = std::env::var(CONFIG_FILE_ENV)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self { config_file }
    }

    /// Create a loader for a specific file
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file: path.into(),
        }
    }

    /// Get the settings file path
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Parse the settings file
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not valid JSON.
    pub fn read_file(&self) -> Result<Option<Config>, ConfigError> {
        if !self.config_file.exists() {
            return Ok(None);
        }

        let path = self
            .config_file
            .to_str()
            .ok_or_else(|| ConfigError::NonUtf8Path {
                path: self.config_file.clone(),
            })?;

        let config = Config::builder()
            .add_source(File::new(path, FileFormat::Json).required(false))
            .build()?;

        Ok(Some(config))
    }

    /// Build a resolver over the settings file and the given environment
    ///
    /// A malformed file is logged and ignored; resolution then falls back to
    /// environment variables and defaults.
    pub fn resolver_with_env(&self, env: HashMap<String, String>) -> SettingsResolver {
        let file = match self.read_file() {
            Ok(Some(config)) => {
                tracing::debug!(path = %self.config_file.display(), "Loaded notification settings file");
                Some(config)
            }
            Ok(None) => {
                tracing::debug!(
                    path = %self.config_file.display(),
                    "Notification settings file not found, using environment"
                );
                None
            }
            Err(e) => {
                tracing::error!(
                    path = %self.config_file.display(),
                    error = %e,
                    "Notification settings file is malformed, ignoring it"
                );
                None
            }
        };

        SettingsResolver::new(file, env)
    }

    /// Build a resolver over the settings file and the process environment
    pub fn resolver(&self) -> SettingsResolver {
        self.resolver_with_env(env_snapshot())
    }

    /// Resolve all provider settings
    pub fn load(&self) -> NotificationSettings {
        NotificationSettings::resolve(&self.resolver())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
