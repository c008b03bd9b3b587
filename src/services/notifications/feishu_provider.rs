//! Feishu (Lark) custom bot notification provider implementation.

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider};
use crate::config::FeishuSettings;
use crate::config::settings::is_set;
use crate::error::AppResult;
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub const FEISHU_ENDPOINT: &str = "https://open.feishu.cn/open-apis/bot/v2/hook";

#[derive(Debug, Clone)]
pub struct FeishuProvider {
    settings: FeishuSettings,
    endpoint: String,
}

impl FeishuProvider {
    pub fn new(settings: FeishuSettings) -> Self {
        Self {
            settings,
            endpoint: FEISHU_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl NotificationProvider for FeishuProvider {
    fn name(&self) -> &'static str {
        "feishu"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.key)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let url = format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.settings.key.as_deref().unwrap_or_default()
        );
        let body = json!({
            "msg_type": "text",
            "content": {
                "text": format!("{}\n\n{}", message.title, message.content),
            },
        });

        let response = HTTP_CLIENT
            .post(url)
            .timeout(timeout)
            .json(&body)
            .send()
            .await?;

        JsonReply::read(response)
            .await?
            .expect_field("StatusCode", json!(0))
    }
}
