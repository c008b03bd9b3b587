//! Qmsg (Qmsg酱) notification provider implementation.

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider};
use crate::config::QmsgSettings;
use crate::config::settings::is_set;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use std::time::Duration;

pub const QMSG_ENDPOINT: &str = "https://qmsg.zendee.cn";

/// Qmsg provider; only the content is sent, the title is dropped
#[derive(Debug, Clone)]
pub struct QmsgProvider {
    settings: QmsgSettings,
    endpoint: String,
}

impl QmsgProvider {
    pub fn new(settings: QmsgSettings) -> Self {
        Self {
            settings,
            endpoint: QMSG_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn send_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.settings.kind,
            self.settings.key.as_deref().unwrap_or_default()
        )
    }
}

#[async_trait]
impl NotificationProvider for QmsgProvider {
    fn name(&self) -> &'static str {
        "qmsg"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.key)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let response = HTTP_CLIENT
            .get(self.send_url())
            .timeout(timeout)
            .query(&[("msg", message.content.as_str())])
            .send()
            .await?;

        let reply = JsonReply::read(response).await?;
        if reply.json.get("success").and_then(|v| v.as_bool()) == Some(true) {
            return Ok(Delivery::new(reply.status, "success=true"));
        }

        let reason = reply
            .json
            .get("reason")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or(reply.body);
        Err(AppError::rejected(reply.status, reason))
    }
}
