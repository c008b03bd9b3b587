//! WeCom (企业微信) group robot notification provider implementation.

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider};
use crate::config::WeComSettings;
use crate::config::settings::is_set;
use crate::error::AppResult;
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub const WECOM_ROBOT_ENDPOINT: &str = "https://qyapi.weixin.qq.com/cgi-bin/webhook/send";

/// Group robot provider; sends the content only
#[derive(Debug, Clone)]
pub struct WeComRobotProvider {
    key: Option<String>,
    endpoint: String,
}

impl WeComRobotProvider {
    pub fn new(settings: &WeComSettings) -> Self {
        Self {
            key: settings.key.clone(),
            endpoint: WECOM_ROBOT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl NotificationProvider for WeComRobotProvider {
    fn name(&self) -> &'static str {
        "wecom_robot"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.key)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let body = json!({
            "msgtype": "text",
            "text": { "content": message.content },
        });

        let response = HTTP_CLIENT
            .post(&self.endpoint)
            .timeout(timeout)
            .query(&[("key", self.key.as_deref().unwrap_or_default())])
            .json(&body)
            .send()
            .await?;

        JsonReply::read(response).await?.expect_field("errcode", json!(0))
    }
}
