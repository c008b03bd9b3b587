//! Command executor for dispatching CLI commands
//!
//! This module runs a parsed command against the resolved notification
//! settings and prints one line per provider outcome.

use super::parser::{Cli, Commands};
use crate::config::NotificationSettings;
use crate::error::{AppError, AppResult};
use crate::services::notifications::{
    Level, NotificationMessage, NotificationResult, NotificationService, Sound,
};
use std::time::Duration;

/// Execute a CLI command with the given settings
///
/// # Errors
/// `send` and `test` fail when no provider is configured. Individual
/// provider failures are printed, never returned.
pub async fn execute_command(cli: &Cli, settings: &NotificationSettings) -> AppResult<()> {
    match &cli.command {
        Commands::Send {
            title,
            content,
            level,
            sound,
            group,
            url,
            timeout,
        } => {
            let service = service_for(settings, *timeout)?;

            let mut message = NotificationMessage::new(title, content);
            message.level = *level;
            message.sound = *sound;
            message.group = group.clone();
            message.url = url.clone();

            print_results(&service.send_all(&message).await);
            Ok(())
        }
        Commands::Providers => {
            let service = NotificationService::from_settings(settings);
            for provider in service.providers() {
                println!("{}", provider_line(provider.name(), provider.is_enabled()));
            }
            Ok(())
        }
        Commands::Test { timeout } => {
            let service = service_for(settings, *timeout)?;

            for (step, message) in self_test_messages().iter().enumerate() {
                println!("Test {}: {}", step + 1, message.title);
                print_results(&service.send_all(message).await);
            }
            Ok(())
        }
    }
}

/// Builds the dispatcher, refusing to run with nothing configured
fn service_for(settings: &NotificationSettings, timeout_secs: u64) -> AppResult<NotificationService> {
    let service = NotificationService::from_settings(settings)
        .with_timeout(Duration::from_secs(timeout_secs));

    if service.enabled_providers().is_empty() {
        return Err(AppError::Validation {
            field: "providers".to_string(),
            reason: "no notification provider is configured".to_string(),
        });
    }

    Ok(service)
}

/// Plain message first, then a time-sensitive one with the alarm sound
pub fn self_test_messages() -> [NotificationMessage; 2] {
    [
        NotificationMessage::new("pushcast test", "This is a test notification from pushcast"),
        NotificationMessage::new(
            "pushcast urgent test",
            "A time-sensitive notification; some providers such as Bark treat it specially",
        )
        .with_level(Level::TimeSensitive)
        .with_sound(Sound::Alarm),
    ]
}

fn print_results(results: &[NotificationResult]) {
    for result in results {
        println!("{}", result_line(result));
    }
}

fn result_line(result: &NotificationResult) -> String {
    let status = result
        .status_code
        .map(|code| format!(" [HTTP {code}]"))
        .unwrap_or_default();
    format!(
        "{:<18}{:<6}{} ({} ms){}",
        result.provider,
        if result.success { "ok" } else { "FAIL" },
        result.detail,
        result.duration_ms,
        status
    )
}

fn provider_line(name: &str, enabled: bool) -> String {
    format!("{:<18}{}", name, if enabled { "enabled" } else { "disabled" })
}
