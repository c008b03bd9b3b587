//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use crate::logger::LogFormat;
use crate::services::notifications::{Level, Sound};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::build;

/// Multi-provider push notification dispatcher
#[derive(Parser, Debug)]
#[command(name = "pushcast")]
#[command(about = "Send one notification to every configured push channel")]
#[command(long_about = "
pushcast delivers a title/content message to every push channel whose
settings are complete: Bark, ServerChan, CoolPush, Qmsg, Telegram, Feishu,
DingTalk, WeCom, PushPlus, PushDeer, Gotify and ntfy.

Settings come from a JSON file (config/notification.json by default),
then from environment variables such as BARK_PUSH or TG_BOT_TOKEN.

EXAMPLES:
    # See which channels are configured
    pushcast providers

    # Send a message to all configured channels
    pushcast send --title \"Backup\" --content \"Nightly backup finished\"

    # Time-sensitive Bark push with a custom sound
    pushcast send -t \"Disk\" -c \"95% used\" --level time-sensitive --sound alarm

    # Use a custom settings file and log to a JSON file
    pushcast --config /etc/pushcast.json --log-file logs/pushcast.log --log-format json send -t T -c C

    # Run the two-message self test
    pushcast test
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file path
    ///
    /// JSON file with one object per provider, e.g. {"bark": {"push": "KEY"}}.
    /// Overrides PUSHCAST_CONFIG. A missing file is treated as empty.
    ///
    /// Example: --config /etc/pushcast/notification.json
    #[arg(long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    ///
    /// Raises log output to debug level, including providers that are skipped.
    /// Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only.
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write logs to this file (appending)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Format of the log file
    #[arg(long, value_enum, default_value_t = LogFormat::Full, requires = "log_file")]
    pub log_format: LogFormat,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a notification to every configured provider
    ///
    /// Examples:
    ///   pushcast send -t "Title" -c "Body"
    ///   pushcast send -t "Title" -c "Body" --group backups --url https://example.com
    ///   pushcast send -t "Title" -c "Body" --timeout 30
    Send {
        /// Message title
        #[arg(short, long, value_parser = super::validation::validate_not_blank)]
        title: String,

        /// Message body
        #[arg(short, long)]
        content: String,

        /// Interruption level (Bark only)
        #[arg(long, value_enum)]
        level: Option<Level>,

        /// Notification sound (Bark only)
        #[arg(long, value_enum)]
        sound: Option<Sound>,

        /// Notification group (Bark only)
        #[arg(long)]
        group: Option<String>,

        /// URL opened when the notification is tapped (Bark only)
        #[arg(long)]
        url: Option<String>,

        /// Timeout in seconds for each provider request
        ///
        /// Must be between 1 and 300.
        #[arg(long, value_name = "SECS", default_value_t = 10, value_parser = super::validation::validate_timeout)]
        timeout: u64,
    },

    /// List every provider and whether it is configured
    Providers,

    /// Send the two self-test messages
    ///
    /// First a plain message, then a time-sensitive one with the alarm sound.
    Test {
        /// Timeout in seconds for each provider request
        #[arg(long, value_name = "SECS", default_value_t = 10, value_parser = super::validation::validate_timeout)]
        timeout: u64,
    },
}

impl Cli {
    /// Log filter derived from --verbose/--quiet
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}
