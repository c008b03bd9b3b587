//! PushPlus notification provider implementation.

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider, html_breaks};
use crate::config::PushPlusSettings;
use crate::config::settings::is_set;
use crate::error::AppResult;
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub const PUSHPLUS_ENDPOINT: &str = "http://www.pushplus.plus/send";

#[derive(Debug, Clone)]
pub struct PushPlusProvider {
    settings: PushPlusSettings,
    endpoint: String,
}

impl PushPlusProvider {
    pub fn new(settings: PushPlusSettings) -> Self {
        Self {
            settings,
            endpoint: PUSHPLUS_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request_body(&self, message: &NotificationMessage) -> serde_json::Value {
        let mut body = json!({
            "token": self.settings.token.as_deref().unwrap_or_default(),
            "title": message.title,
            "content": html_breaks(&message.content),
            "template": "html",
        });

        // Group push goes to every subscriber of the topic
        if let Some(topic) = self.settings.topic.as_deref().filter(|t| !t.trim().is_empty()) {
            body["topic"] = json!(topic);
        }

        body
    }
}

#[async_trait]
impl NotificationProvider for PushPlusProvider {
    fn name(&self) -> &'static str {
        "pushplus"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.token)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let response = HTTP_CLIENT
            .post(&self.endpoint)
            .timeout(timeout)
            .json(&self.build_request_body(message))
            .send()
            .await?;

        JsonReply::read(response).await?.expect_field("code", json!(200))
    }
}
