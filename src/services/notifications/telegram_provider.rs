//! Telegram Bot API notification provider implementation.
//!
//! Posts an HTML-formatted message through `sendMessage`. Supports an
//! alternate API host (reverse proxies) and a per-provider outbound proxy.

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider};
use crate::config::TelegramSettings;
use crate::config::settings::is_set;
use crate::error::AppResult;
use crate::external::client::{HTTP_CLIENT, proxied_client};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub const TELEGRAM_ENDPOINT: &str = "https://api.telegram.org";

/// Telegram notification provider
#[derive(Debug, Clone)]
pub struct TelegramProvider {
    settings: TelegramSettings,
}

impl TelegramProvider {
    pub fn new(settings: TelegramSettings) -> Self {
        Self { settings }
    }

    /// Overrides the API origin (same effect as `telegram.api_host`)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.settings.api_host = Some(endpoint.into());
        self
    }

    /// API origin: `api_host` with an implied `https://` scheme, or the public API
    fn origin(&self) -> String {
        match self.settings.api_host.as_deref().map(str::trim) {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
                host.trim_end_matches('/').to_string()
            }
            Some(host) if !host.is_empty() => format!("https://{}", host.trim_end_matches('/')),
            _ => TELEGRAM_ENDPOINT.to_string(),
        }
    }

    fn send_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.origin(),
            self.settings.bot_token.as_deref().unwrap_or_default()
        )
    }

    fn client(&self) -> AppResult<reqwest::Client> {
        match self.settings.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(proxy) => proxied_client(proxy.trim()),
            None => Ok(HTTP_CLIENT.clone()),
        }
    }
}

fn format_text(message: &NotificationMessage) -> String {
    format!("<b>{}</b>\n\n{}", message.title, message.content)
}

#[async_trait]
impl NotificationProvider for TelegramProvider {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.bot_token) && is_set(&self.settings.user_id)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let text = format_text(message);
        let form = [
            ("chat_id", self.settings.user_id.as_deref().unwrap_or_default()),
            ("text", text.as_str()),
            ("parse_mode", "HTML"),
            ("disable_web_page_preview", "true"),
        ];

        let response = self
            .client()?
            .post(self.send_url())
            .timeout(timeout)
            .form(&form)
            .send()
            .await?;

        JsonReply::read(response).await?.expect_field("ok", json!(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings() -> TelegramSettings {
        TelegramSettings {
            bot_token: Some("123:ABC".to_string()),
            user_id: Some("42".to_string()),
            api_host: None,
            proxy: None,
        }
    }

    #[test]
    fn test_send_url_default_and_api_host() {
        assert_eq!(
            TelegramProvider::new(settings()).send_url(),
            "https://api.telegram.org/bot123:ABC/sendMessage"
        );

        let mut custom = settings();
        custom.api_host = Some("tg.example.com".to_string());
        assert_eq!(
            TelegramProvider::new(custom).send_url(),
            "https://tg.example.com/bot123:ABC/sendMessage"
        );
    }

    #[test]
    fn test_requires_token_and_chat() {
        let mut no_chat = settings();
        no_chat.user_id = Some(" ".to_string());
        assert!(!TelegramProvider::new(no_chat).is_enabled());

        let mut no_token = settings();
        no_token.bot_token = None;
        assert!(!TelegramProvider::new(no_token).is_enabled());

        assert!(TelegramProvider::new(settings()).is_enabled());
    }

    #[test]
    fn test_format_text() {
        let message = NotificationMessage::new("Title", "Body");
        assert_eq!(format_text(&message), "<b>Title</b>\n\nBody");
    }

    #[tokio::test]
    async fn test_invalid_proxy_fails_without_request() {
        let mut with_proxy = settings();
        with_proxy.proxy = Some("::not a proxy::".to_string());
        let result = TelegramProvider::new(with_proxy)
            .send(&NotificationMessage::new("t", "c"), Duration::from_secs(1))
            .await;
        assert!(!result.success);
        assert!(result.detail.contains("proxy"), "{}", result.detail);
    }

    #[tokio::test]
    async fn test_send_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .and(body_string_contains("chat_id=42"))
            .and(body_string_contains("parse_mode=HTML"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = TelegramProvider::new(settings()).with_endpoint(server.uri());
        let result = provider
            .send(&NotificationMessage::new("T", "C"), Duration::from_secs(5))
            .await;
        assert!(result.success, "{result:?}");
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"ok": false, "description": "Unauthorized"})))
            .mount(&server)
            .await;

        let provider = TelegramProvider::new(settings()).with_endpoint(server.uri());
        let result = provider
            .send(&NotificationMessage::new("T", "C"), Duration::from_secs(5))
            .await;
        assert!(!result.success);
        assert_eq!(result.status_code, Some(401));
    }
}
