//! Ntfy notification provider implementation.
//!
//! The body is the raw content; title, priority and tags travel as headers.

use super::message::NotificationMessage;
use super::provider::{Delivery, NotificationProvider};
use crate::config::NtfySettings;
use crate::config::settings::is_set;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use std::time::Duration;

const NTFY_TAGS: &str = "tada";

#[derive(Debug, Clone)]
pub struct NtfyProvider {
    settings: NtfySettings,
}

impl NtfyProvider {
    pub fn new(settings: NtfySettings) -> Self {
        Self { settings }
    }

    fn topic_url(&self) -> String {
        format!(
            "{}/{}",
            self.settings.url.trim().trim_end_matches('/'),
            self.settings.topic.as_deref().unwrap_or_default()
        )
    }
}

/// Header value from raw UTF-8 bytes; control characters are rejected
fn header_value(field: &str, value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_bytes(value.as_bytes()).map_err(|e| AppError::Validation {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl NotificationProvider for NtfyProvider {
    fn name(&self) -> &'static str {
        "ntfy"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.topic)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let response = HTTP_CLIENT
            .post(self.topic_url())
            .timeout(timeout)
            .header("Title", header_value("Title", &message.title)?)
            .header("Priority", header_value("Priority", &self.settings.priority)?)
            .header("Tags", NTFY_TAGS)
            .body(message.content.clone().into_bytes())
            .send()
            .await?
            .error_for_status()?;

        Ok(Delivery::new(response.status().as_u16(), "published"))
    }
}
