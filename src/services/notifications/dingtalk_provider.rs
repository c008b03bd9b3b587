//! DingTalk custom robot notification provider implementation.
//!
//! Robots created with the "signature" security setting require every request
//! to carry a millisecond timestamp and an HMAC-SHA256 signature:
//!
//! ```text
//! sign = urlencode(base64(hmac_sha256(key = secret, msg = "{timestamp}\n{secret}")))
//! ```
//!
//! DingTalk rejects timestamps more than an hour away from its clock.

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider};
use crate::config::DingTalkSettings;
use crate::config::settings::is_set;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::time::Duration;

pub const DINGTALK_ENDPOINT: &str = "https://oapi.dingtalk.com/robot/send";

type HmacSha256 = Hmac<Sha256>;

/// Computes the URL-encoded robot signature for `timestamp_ms`
pub fn sign(secret: &str, timestamp_ms: i64) -> AppResult<String> {
    let string_to_sign = format!("{timestamp_ms}\n{secret}");

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("HMAC key rejected: {e}"),
    })?;
    mac.update(string_to_sign.as_bytes());

    let signature = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());
    Ok(url::form_urlencoded::byte_serialize(signature.as_bytes()).collect())
}

/// DingTalk robot notification provider
#[derive(Debug, Clone)]
pub struct DingTalkProvider {
    settings: DingTalkSettings,
    endpoint: String,
}

impl DingTalkProvider {
    pub fn new(settings: DingTalkSettings) -> Self {
        Self {
            settings,
            endpoint: DINGTALK_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Robot URL with `access_token`, `timestamp` and `sign` query parameters
    fn signed_url(&self, timestamp_ms: i64) -> AppResult<String> {
        let secret = self.settings.secret.as_deref().unwrap_or_default();
        Ok(format!(
            "{}?access_token={}&timestamp={}&sign={}",
            self.endpoint,
            self.settings.access_token.as_deref().unwrap_or_default(),
            timestamp_ms,
            sign(secret, timestamp_ms)?
        ))
    }
}

#[async_trait]
impl NotificationProvider for DingTalkProvider {
    fn name(&self) -> &'static str {
        "dingtalk"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.access_token) && is_set(&self.settings.secret)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let timestamp_ms = jiff::Timestamp::now().as_millisecond();
        let body = json!({
            "msgtype": "text",
            "text": {
                "content": format!("{}\n\n{}", message.title, message.content),
            },
        });

        let response = HTTP_CLIENT
            .post(self.signed_url(timestamp_ms)?)
            .timeout(timeout)
            .json(&body)
            .send()
            .await?;

        JsonReply::read(response).await?.expect_field("errcode", json!(0))
    }
}
