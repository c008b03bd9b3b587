//! CLI argument validation functions
//!
//! Custom value parsers for arguments clap cannot check on its own.

use std::path::PathBuf;

/// Longest per-request timeout accepted, in seconds
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Validate a settings file path
///
/// A missing file is accepted; the loader then falls back to the environment.
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    if path_str.trim().is_empty() {
        return Err("Settings file path cannot be empty".to_string());
    }
    Ok(PathBuf::from(path_str))
}

/// Validate a per-request timeout in whole seconds
pub fn validate_timeout(secs_str: &str) -> Result<u64, String> {
    let secs: u64 = secs_str
        .parse()
        .map_err(|_| format!("Timeout must be a whole number of seconds, got: '{}'", secs_str))?;

    if secs == 0 {
        return Err("Timeout must be greater than 0".to_string());
    }

    if secs > MAX_TIMEOUT_SECS {
        return Err(format!("Timeout cannot exceed {} seconds", MAX_TIMEOUT_SECS));
    }

    Ok(secs)
}

pub fn validate_not_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("Value cannot be empty".to_string());
    }
    Ok(value.to_string())
}
