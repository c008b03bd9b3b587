//! PushDeer notification provider implementation.
//!
//! Old and new PushDeer servers answer with different JSON shapes, so any
//! HTTP 200 counts as an accepted submission, parseable body or not.

use super::message::NotificationMessage;
use super::provider::{Delivery, NotificationProvider};
use crate::config::PushDeerSettings;
use crate::config::settings::is_set;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PushDeerProvider {
    settings: PushDeerSettings,
}

impl PushDeerProvider {
    pub fn new(settings: PushDeerSettings) -> Self {
        Self { settings }
    }
}

/// Describes a 200 response for the log; never decides success
fn describe_accepted(body: &str) -> &'static str {
    match serde_json::from_str::<Value>(body) {
        Ok(json)
            if json.get("success") == Some(&Value::Bool(true))
                || json.get("code") == Some(&Value::from(0))
                || json.get("message").is_some_and(|m| !m.is_null()) =>
        {
            "accepted"
        }
        Ok(_) => "accepted (no success field)",
        Err(_) => "accepted (non-JSON response)",
    }
}

/// Body of a refused request, or why it could not be read
fn rejection_body<E: std::fmt::Display>(read: Result<String, E>) -> String {
    read.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

#[async_trait]
impl NotificationProvider for PushDeerProvider {
    fn name(&self) -> &'static str {
        "pushdeer"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.pushkey)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let form = [
            ("pushkey", self.settings.pushkey.as_deref().unwrap_or_default()),
            ("text", message.title.as_str()),
            ("desp", message.content.as_str()),
            ("type", self.settings.kind.as_str()),
        ];

        let response = HTTP_CLIENT
            .post(self.settings.url.trim().trim_end_matches('/'))
            .timeout(timeout)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            Ok(Delivery::new(status.as_u16(), describe_accepted(&body)))
        } else {
            let body = rejection_body(response.text().await);
            Err(AppError::rejected(status.as_u16(), body))
        }
    }
}
