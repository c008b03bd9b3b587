//! Settings file error types

use std::path::PathBuf;
use thiserror::Error;

/// Problems reading the notification settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The path cannot be handed to the `config` crate
    #[error("Settings path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    /// The file exists but is not valid JSON
    #[error("Failed to read settings file: {0}")]
    Malformed(#[from] config::ConfigError),
}
