//! Bark notification provider implementation.
//!
//! Sends push notifications to iOS devices via Bark server API.
//! Uses the global `HTTP_CLIENT` for connection pooling and efficiency.
//!
//! Bark API Reference: https://github.com/Finb/Bark

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider};
use crate::config::BarkSettings;
use crate::config::settings::is_set;
use crate::error::AppResult;
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

/// Public Bark server
pub const BARK_ENDPOINT: &str = "https://api.day.app";

/// JSON body of a Bark push; absent fields are not serialized
#[derive(Debug, Serialize, PartialEq)]
struct BarkRequest<'a> {
    title: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
}

/// Bark notification provider
///
/// Message hints (`sound`, `group`, `level`, `url`) take precedence over the
/// configured defaults; `icon` always comes from settings.
///
/// # Example
/// ```ignore
/// let settings = BarkSettings {
///     push: Some("YourDeviceKey".to_string()),
///     sound: Some("birdsong".to_string()),
///     ..Default::default()
/// };
/// let provider = BarkProvider::new(settings);
/// let result = provider.send(&message, Duration::from_secs(10)).await;
/// ```
#[derive(Debug, Clone)]
pub struct BarkProvider {
    settings: BarkSettings,
    endpoint: String,
}

impl BarkProvider {
    /// Creates a new bark provider with settings
    pub fn new(settings: BarkSettings) -> Self {
        Self {
            settings,
            endpoint: BARK_ENDPOINT.to_string(),
        }
    }

    /// Overrides the server used when `push` is a bare device key
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builds the push URL
    ///
    /// A `push` value that already is a URL is used verbatim; otherwise it is
    /// treated as a device key appended to the server.
    fn push_url(&self) -> Option<String> {
        let push = self.settings.push.as_deref()?.trim();
        if push.starts_with("http") {
            Some(push.to_string())
        } else {
            Some(format!("{}/{}", self.endpoint.trim_end_matches('/'), push))
        }
    }

    /// Builds the request body for Bark API
    fn build_request_body<'a>(&'a self, message: &'a NotificationMessage) -> BarkRequest<'a> {
        fn non_empty(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        BarkRequest {
            title: &message.title,
            body: &message.content,
            sound: message
                .sound
                .map(|s| s.as_str())
                .or_else(|| non_empty(self.settings.sound.as_deref())),
            group: non_empty(message.group.as_deref())
                .or_else(|| non_empty(self.settings.group.as_deref())),
            level: message
                .level
                .map(|l| l.as_str())
                .or_else(|| non_empty(self.settings.level.as_deref())),
            url: non_empty(message.url.as_deref())
                .or_else(|| non_empty(self.settings.url.as_deref())),
            icon: non_empty(self.settings.icon.as_deref()),
        }
    }
}

#[async_trait]
impl NotificationProvider for BarkProvider {
    fn name(&self) -> &'static str {
        "bark"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.push)
    }

    /// Sends a notification via Bark
    ///
    /// Succeeds when the response JSON carries `code == 200`.
    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let api_url = self.push_url().unwrap_or_default();

        let response = HTTP_CLIENT
            .post(&api_url)
            .timeout(timeout)
            .json(&self.build_request_body(message))
            .send()
            .await?;

        JsonReply::read(response).await?.expect_field("code", json!(200))
    }
}
