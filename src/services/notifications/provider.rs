//! Core notification provider trait and types.
//!
//! This module provides the abstraction for notification providers,
//! allowing easy extension to support different push channels.

use super::message::NotificationMessage;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Result of a notification send attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Name of the provider that produced this outcome
    pub provider: String,
    /// Whether the provider acknowledged the message
    pub success: bool,
    /// Success note or failure reason
    pub detail: String,
    /// HTTP status of the last response seen, if any
    pub status_code: Option<u16>,
    /// Time taken for the operation in milliseconds
    pub duration_ms: u64,
}

impl NotificationResult {
    /// A failed outcome with no HTTP response
    pub fn failed(provider: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            success: false,
            detail: detail.into(),
            status_code: None,
            duration_ms: 0,
        }
    }
}

/// What a provider reports after the remote side accepted a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub status_code: Option<u16>,
    pub detail: String,
}

impl Delivery {
    pub fn new(status_code: u16, detail: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            detail: detail.into(),
        }
    }
}

/// Trait for push notification providers (Bark, Telegram, DingTalk, ...)
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All providers must be Send + Sync for use in async contexts.
///
/// Implementors supply `is_enabled` and `deliver`; callers use `send`, which
/// never fails: every error from `deliver` is logged and folded into a failed
/// [`NotificationResult`].
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// pub struct EchoProvider;
///
/// #[async_trait]
/// impl NotificationProvider for EchoProvider {
///     fn name(&self) -> &'static str {
///         "echo"
///     }
///
///     fn is_enabled(&self) -> bool {
///         true
///     }
///
///     async fn deliver(&self, message: &NotificationMessage, _timeout: Duration) -> AppResult<Delivery> {
///         Ok(Delivery::new(200, message.title.clone()))
///     }
/// }
/// ```
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Returns the provider name for logging/debugging
    fn name(&self) -> &'static str;

    /// Whether every required setting is present
    ///
    /// Must be pure: it is evaluated on every dispatch.
    fn is_enabled(&self) -> bool;

    /// Issues the provider's HTTP request(s) and checks its success marker
    ///
    /// # Arguments
    /// * `message` - The notification message to send
    /// * `timeout` - Total time budget applied to each HTTP request
    async fn deliver(&self, message: &NotificationMessage, timeout: Duration)
    -> AppResult<Delivery>;

    /// Sends a notification message, converting any failure into the result
    ///
    /// # Returns
    /// Send outcome details (success, status, detail, duration)
    async fn send(&self, message: &NotificationMessage, timeout: Duration) -> NotificationResult {
        let provider = self.name();

        if !self.is_enabled() {
            tracing::warn!(provider, "Provider invoked without being enabled");
            return NotificationResult::failed(
                provider,
                AppError::NotConfigured {
                    provider: provider.to_string(),
                }
                .to_string(),
            );
        }

        tracing::info!(provider, "Sending notification");
        let start = Instant::now();
        let outcome = self.deliver(message, timeout).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(delivery) => {
                tracing::info!(provider, duration_ms, detail = %delivery.detail, "Notification delivered");
                NotificationResult {
                    provider: provider.to_string(),
                    success: true,
                    detail: delivery.detail,
                    status_code: delivery.status_code,
                    duration_ms,
                }
            }
            Err(e) => {
                tracing::error!(provider, duration_ms, error = %e, "Notification failed");
                let status_code = match &e {
                    AppError::Rejected { status, .. } => Some(*status),
                    AppError::Transport { source } => source.status().map(|s| s.as_u16()),
                    _ => None,
                };
                NotificationResult {
                    provider: provider.to_string(),
                    success: false,
                    detail: e.to_string(),
                    status_code,
                    duration_ms,
                }
            }
        }
    }
}

/// Raw response kept next to its parsed JSON form for diagnostics
#[derive(Debug, Clone)]
pub(crate) struct JsonReply {
    pub status: u16,
    pub body: String,
    pub json: serde_json::Value,
}

impl JsonReply {
    /// Reads the body and parses it as JSON
    ///
    /// A body that is not JSON becomes a rejection carrying the raw text.
    pub async fn read(response: reqwest::Response) -> AppResult<Self> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        let json = serde_json::from_str(&body).map_err(|_| AppError::rejected(status, &body))?;
        Ok(Self { status, body, json })
    }

    /// Accepts the reply when `field` equals `expected`, rejects it otherwise
    pub fn expect_field(self, field: &str, expected: serde_json::Value) -> AppResult<Delivery> {
        if self.json.get(field) == Some(&expected) {
            Ok(Delivery::new(self.status, format!("{field}={expected}")))
        } else {
            Err(AppError::rejected(self.status, self.body))
        }
    }
}

/// Replaces every `\n` with `<br>` for HTML-rendering providers
pub(crate) fn html_breaks(content: &str) -> String {
    content.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(json: serde_json::Value) -> JsonReply {
        JsonReply {
            status: 200,
            body: json.to_string(),
            json,
        }
    }

    #[test]
    fn test_expect_field_match() {
        let delivery = reply(json!({"errcode": 0, "errmsg": "ok"}))
            .expect_field("errcode", json!(0))
            .expect("errcode 0 is success");
        assert_eq!(delivery.status_code, Some(200));
        assert_eq!(delivery.detail, "errcode=0");
    }

    #[test]
    fn test_expect_field_mismatch_keeps_body() {
        let err = reply(json!({"errcode": 310000, "errmsg": "sign not match"}))
            .expect_field("errcode", json!(0))
            .unwrap_err();
        match err {
            AppError::Rejected { status, body } => {
                assert_eq!(status, 200);
                assert!(body.contains("sign not match"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_expect_field_missing() {
        assert!(reply(json!({})).expect_field("ok", json!(true)).is_err());
    }

    #[test]
    fn test_html_breaks() {
        assert_eq!(html_breaks("a\nb\n"), "a<br>b<br>");
    }

    struct Disabled;

    #[async_trait]
    impl NotificationProvider for Disabled {
        fn name(&self) -> &'static str {
            "disabled"
        }

        fn is_enabled(&self) -> bool {
            false
        }

        async fn deliver(
            &self,
            _message: &NotificationMessage,
            _timeout: Duration,
        ) -> AppResult<Delivery> {
            panic!("deliver must not run for a disabled provider");
        }
    }

    #[tokio::test]
    async fn test_send_refuses_disabled_provider() {
        let result = Disabled
            .send(&NotificationMessage::new("T", "C"), Duration::from_secs(1))
            .await;
        assert!(!result.success);
        assert_eq!(result.provider, "disabled");
        assert!(result.detail.contains("not configured"));
    }
}
