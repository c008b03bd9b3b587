//! Per-key setting resolution with fixed precedence
//!
//! `SettingsResolver` holds the parsed settings file (if any) and a snapshot of
//! the environment. Every lookup walks file, then environment, then default.

use std::collections::HashMap;
use std::ffi::OsString;

use config::Config;

/// Snapshot of the process environment
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn env_snapshot() -> HashMap<String, String> {
    utf8_entries(std::env::vars_os())
}

fn utf8_entries(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| {
            let name = key.to_string_lossy().into_owned();
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                _ => {
                    tracing::debug!(variable = %name, "Skipping environment variable that is not valid UTF-8");
                    None
                }
            }
        })
        .collect()
}

/// A resolved setting value
///
/// The kind of the default decides the kind of the result: a `Flag` default
/// coerces whatever string was found into a boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Flag(bool),
}

impl SettingValue {
    /// Returns the flag value, or `None` for text
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SettingValue::Flag(value) => Some(*value),
            SettingValue::Text(_) => None,
        }
    }
}

/// Resolves settings from file > environment > default
#[derive(Debug, Default)]
pub struct SettingsResolver {
    file: Option<Config>,
    env: HashMap<String, String>,
}

impl SettingsResolver {
    /// Creates a resolver over an optional parsed file and an environment snapshot
    pub fn new(file: Option<Config>, env: HashMap<String, String>) -> Self {
        Self { file, env }
    }

    /// Creates a resolver with no file, reading the current process environment
    pub fn from_env() -> Self {
        Self::new(None, env_snapshot())
    }

    /// Resolve one setting
    ///
    /// # Arguments
    /// * `provider` - The provider block in the settings file (e.g. `bark`)
    /// * `key` - The setting name inside that block (e.g. `push`)
    /// * `env_var` - Environment variable consulted when the file has no value
    /// * `default` - Returned when neither source has a non-blank value
    pub fn resolve(
        &self,
        provider: &str,
        key: &str,
        env_var: &str,
        default: SettingValue,
    ) -> SettingValue {
        let found = self
            .file_value(provider, key)
            .or_else(|| self.env_value(env_var));

        match (found, default) {
            (Some(value), SettingValue::Flag(_)) => {
                SettingValue::Flag(value.eq_ignore_ascii_case("true"))
            }
            (Some(value), SettingValue::Text(_)) => SettingValue::Text(value),
            (None, default) => default,
        }
    }

    /// Resolve a text setting whose default is empty; empty means `None`
    pub fn text(&self, provider: &str, key: &str, env_var: &str) -> Option<String> {
        let value = self.text_or(provider, key, env_var, "");
        (!value.is_empty()).then_some(value)
    }

    /// Resolve a text setting with a non-empty default
    pub fn text_or(
        &self,
        provider: &str,
        key: &str,
        env_var: &str,
        default: &str,
    ) -> String {
        self.file_value(provider, key)
            .or_else(|| self.env_value(env_var))
            .unwrap_or_else(|| default.to_string())
    }

    /// Resolve a boolean setting
    pub fn flag(&self, provider: &str, key: &str, env_var: &str, default: bool) -> bool {
        self.resolve(provider, key, env_var, SettingValue::Flag(default))
            .as_flag()
            .unwrap_or(default)
    }

    fn file_value(&self, provider: &str, key: &str) -> Option<String> {
        let file = self.file.as_ref()?;
        // Tables, arrays and nulls are not settings; treat them as absent
        file.get_string(&format!("{provider}.{key}"))
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn env_value(&self, env_var: &str) -> Option<String> {
        self.env
            .get(env_var)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}
