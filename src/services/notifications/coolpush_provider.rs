//! CoolPush notification provider implementation.
//!
//! One request per selected sub-channel (QQ, WeChat, email). Responses are
//! not inspected; the provider succeeds once every request completed.

use super::message::NotificationMessage;
use super::provider::{Delivery, NotificationProvider};
use crate::config::CoolPushSettings;
use crate::config::settings::is_set;
use crate::error::AppResult;
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use std::time::Duration;

pub const COOLPUSH_ENDPOINT: &str = "https://push.xuthus.cc";

/// CoolPush notification provider
#[derive(Debug, Clone)]
pub struct CoolPushProvider {
    settings: CoolPushSettings,
    endpoint: String,
}

impl CoolPushProvider {
    pub fn new(settings: CoolPushSettings) -> Self {
        Self {
            settings,
            endpoint: COOLPUSH_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sub-channel paths selected in settings, in QQ, WeChat, email order
    fn channels(&self) -> Vec<&'static str> {
        [
            (self.settings.qq, "send"),
            (self.settings.wx, "wx"),
            (self.settings.email, "email"),
        ]
        .into_iter()
        .filter_map(|(selected, path)| selected.then_some(path))
        .collect()
    }
}

#[async_trait]
impl NotificationProvider for CoolPushProvider {
    fn name(&self) -> &'static str {
        "coolpush"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.skey)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let skey = self.settings.skey.as_deref().unwrap_or_default();
        let channels = self.channels();
        if channels.is_empty() {
            tracing::warn!("CoolPush has no sub-channel selected, nothing sent");
        }

        let base = self.endpoint.trim_end_matches('/');
        let mut last_status = None;
        for channel in &channels {
            let response = HTTP_CLIENT
                .get(format!("{base}/{channel}/{skey}"))
                .timeout(timeout)
                .query(&[("c", message.content.as_str()), ("t", message.title.as_str())])
                .send()
                .await?;
            tracing::debug!(channel, status = response.status().as_u16(), "CoolPush sub-channel submitted");
            last_status = Some(response.status().as_u16());
        }

        Ok(Delivery {
            status_code: last_status,
            detail: format!("submitted to {}", channels.join(",")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(qq: bool, wx: bool, email: bool) -> CoolPushSettings {
        CoolPushSettings {
            skey: Some("sk".to_string()),
            qq,
            wx,
            email,
        }
    }

    #[test]
    fn test_channels_follow_flags() {
        assert_eq!(CoolPushProvider::new(settings(true, false, false)).channels(), vec!["send"]);
        assert_eq!(
            CoolPushProvider::new(settings(true, true, true)).channels(),
            vec!["send", "wx", "email"]
        );
        assert!(CoolPushProvider::new(settings(false, false, false)).channels().is_empty());
    }

    #[tokio::test]
    async fn test_one_get_per_selected_channel() {
        let server = MockServer::start().await;
        for channel in ["send", "email"] {
            Mock::given(method("GET"))
                .and(path(format!("/{channel}/sk")))
                .and(query_param("c", "content"))
                .and(query_param("t", "title"))
                .respond_with(ResponseTemplate::new(200).set_body_string("{\"code\":200}"))
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(path("/wx/sk"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = CoolPushProvider::new(settings(true, false, true)).with_endpoint(server.uri());
        let result = provider
            .send(&NotificationMessage::new("title", "content"), Duration::from_secs(5))
            .await;
        assert!(result.success, "{result:?}");
        assert_eq!(result.detail, "submitted to send,email");
    }

    #[tokio::test]
    async fn test_body_is_not_inspected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = CoolPushProvider::new(settings(true, false, false)).with_endpoint(server.uri());
        let result = provider
            .send(&NotificationMessage::new("t", "c"), Duration::from_secs(5))
            .await;
        assert!(result.success);
    }
}
