//! Gotify notification provider implementation (self-hosted).

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider};
use crate::config::GotifySettings;
use crate::config::settings::is_set;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GotifyProvider {
    settings: GotifySettings,
}

impl GotifyProvider {
    pub fn new(settings: GotifySettings) -> Self {
        Self { settings }
    }

    fn message_url(&self) -> String {
        format!(
            "{}/message",
            self.settings
                .url
                .as_deref()
                .unwrap_or_default()
                .trim()
                .trim_end_matches('/')
        )
    }
}

/// Gotify answers with the stored message; a missing or empty `id` means it was not stored
fn has_id(json: &Value) -> bool {
    match json.get("id") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_i64() != Some(0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[async_trait]
impl NotificationProvider for GotifyProvider {
    fn name(&self) -> &'static str {
        "gotify"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.url) && is_set(&self.settings.token)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let body = json!({
            "title": message.title,
            "message": message.content,
            "priority": self.settings.priority,
        });

        let response = HTTP_CLIENT
            .post(self.message_url())
            .timeout(timeout)
            .query(&[("token", self.settings.token.as_deref().unwrap_or_default())])
            .json(&body)
            .send()
            .await?;

        let reply = JsonReply::read(response).await?;
        if has_id(&reply.json) {
            Ok(Delivery::new(reply.status, format!("id={}", reply.json["id"])))
        } else {
            Err(AppError::rejected(reply.status, reply.body))
        }
    }
}
