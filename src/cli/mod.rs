//! CLI module for pushcast
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Argument validation
//! - Command execution

pub mod executor;
pub mod parser;
pub mod validation;

pub use executor::execute_command;
pub use parser::{Cli, Commands};

use crate::config::ConfigLoader;
use crate::logger::{FileConfig, LoggerConfig};

/// Logger configuration from the global flags
pub fn logger_config(cli: &Cli) -> LoggerConfig {
    let mut config = LoggerConfig {
        level: cli.log_level().to_string(),
        ..Default::default()
    };

    if let Some(path) = &cli.log_file {
        config.file = FileConfig::at(path, cli.log_format);
    }

    config
}

/// Settings loader honouring --config, then PUSHCAST_CONFIG
pub fn config_loader(cli: &Cli) -> ConfigLoader {
    match &cli.config {
        Some(path) => ConfigLoader::with_file(path),
        None => ConfigLoader::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogFormat;
    use clap::Parser;

    #[test]
    fn test_logger_config_from_flags() {
        let cli = Cli::try_parse_from(["pushcast", "-q", "providers"]).unwrap();
        let config = logger_config(&cli);
        assert_eq!(config.level, "error");
        assert!(!config.file.enabled);

        let cli = Cli::try_parse_from([
            "pushcast",
            "--log-file",
            "logs/p.log",
            "--log-format",
            "compact",
            "providers",
        ])
        .unwrap();
        let config = logger_config(&cli);
        assert!(config.file.enabled);
        assert!(config.file.append);
        assert_eq!(config.file.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_loader_prefers_flag() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["pushcast", "--config", path, "providers"]).unwrap();
        assert_eq!(config_loader(&cli).config_file(), file.path());
    }
}
