//! WeCom (企业微信) application message provider implementation.
//!
//! Two requests per send:
//! 1. `GET /cgi-bin/gettoken?corpid=..&corpsecret=..` for an access token
//! 2. `POST /cgi-bin/message/send?access_token=..` with the message
//!
//! When step 1 yields no token, step 2 is never attempted.

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider, html_breaks};
use crate::config::WeComSettings;
use crate::config::settings::is_set;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

pub const WECOM_API_ORIGIN: &str = "https://qyapi.weixin.qq.com";

/// Target of the "details" button on text cards
const TEXTCARD_URL: &str = "https://github.com/ZaiZaiCat/ZaiZaiCat-Checkin";
const TEXTCARD_BUTTON: &str = "详情";

/// WeCom application message provider
#[derive(Debug, Clone)]
pub struct WeComAppProvider {
    settings: WeComSettings,
}

impl WeComAppProvider {
    pub fn new(settings: WeComSettings) -> Self {
        Self { settings }
    }

    /// Overrides the API origin (same effect as `qywx.origin`)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.settings.origin = Some(endpoint.into());
        self
    }

    fn origin(&self) -> &str {
        self.settings
            .origin
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or(WECOM_API_ORIGIN)
            .trim_end_matches('/')
    }

    fn field(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or_default()
    }

    /// Exchanges corp id and secret for an access token
    async fn fetch_token(&self, timeout: Duration) -> AppResult<String> {
        let response = HTTP_CLIENT
            .get(format!("{}/cgi-bin/gettoken", self.origin()))
            .timeout(timeout)
            .query(&[
                ("corpid", Self::field(&self.settings.corpid)),
                ("corpsecret", Self::field(&self.settings.corpsecret)),
            ])
            .send()
            .await?;

        let reply = JsonReply::read(response).await?;
        match reply.json.get("access_token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(AppError::Token {
                reason: reply
                    .json
                    .get("errmsg")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or(reply.body),
            }),
        }
    }

    /// `mpnews` article when a thumbnail media id is configured, `textcard` otherwise
    fn build_request_body(&self, message: &NotificationMessage) -> Value {
        let touser = Self::field(&self.settings.touser);
        let agentid = Self::field(&self.settings.agentid);

        match self.settings.media_id.as_deref().filter(|m| !m.trim().is_empty()) {
            Some(media_id) => json!({
                "touser": touser,
                "msgtype": "mpnews",
                "agentid": agentid,
                "mpnews": {
                    "articles": [{
                        "title": message.title,
                        "thumb_media_id": media_id,
                        "content": html_breaks(&message.content),
                        "digest": message.content,
                    }],
                },
            }),
            None => json!({
                "touser": touser,
                "msgtype": "textcard",
                "agentid": agentid,
                "textcard": {
                    "title": message.title,
                    "description": message.content,
                    "url": TEXTCARD_URL,
                    "btntxt": TEXTCARD_BUTTON,
                },
            }),
        }
    }
}

#[async_trait]
impl NotificationProvider for WeComAppProvider {
    fn name(&self) -> &'static str {
        "wecom_app"
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.settings.corpid)
            && is_set(&self.settings.agentid)
            && is_set(&self.settings.corpsecret)
            && is_set(&self.settings.touser)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let access_token = self.fetch_token(timeout).await?;

        let response = HTTP_CLIENT
            .post(format!("{}/cgi-bin/message/send", self.origin()))
            .timeout(timeout)
            .query(&[("access_token", access_token.as_str())])
            .json(&self.build_request_body(message))
            .send()
            .await?;

        JsonReply::read(response).await?.expect_field("errcode", json!(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings() -> WeComSettings {
        WeComSettings {
            key: None,
            corpid: Some("ww123".to_string()),
            agentid: Some("1000002".to_string()),
            corpsecret: Some("secret".to_string()),
            touser: Some("@all".to_string()),
            media_id: None,
            origin: None,
        }
    }

    #[test]
    fn test_every_required_field() {
        assert!(WeComAppProvider::new(settings()).is_enabled());

        let strip: [fn(&mut WeComSettings); 4] = [
            |s| s.corpid = None,
            |s| s.agentid = Some(" ".to_string()),
            |s| s.corpsecret = None,
            |s| s.touser = Some(String::new()),
        ];
        for remove in strip {
            let mut s = settings();
            remove(&mut s);
            assert!(!WeComAppProvider::new(s).is_enabled());
        }
    }

    #[test]
    fn test_textcard_body() {
        let body = WeComAppProvider::new(settings()).build_request_body(&NotificationMessage::new("T", "a\nb"));
        assert_eq!(body["msgtype"], "textcard");
        assert_eq!(body["agentid"], "1000002");
        assert_eq!(body["textcard"]["description"], "a\nb");
        assert_eq!(body["textcard"]["url"], TEXTCARD_URL);
        assert_eq!(body["textcard"]["btntxt"], "详情");
    }

    #[test]
    fn test_mpnews_body() {
        let mut s = settings();
        s.media_id = Some("MEDIA".to_string());
        let body = WeComAppProvider::new(s).build_request_body(&NotificationMessage::new("T", "a\nb"));
        let article = &body["mpnews"]["articles"][0];
        assert_eq!(body["msgtype"], "mpnews");
        assert_eq!(article["thumb_media_id"], "MEDIA");
        assert_eq!(article["content"], "a<br>b");
        assert_eq!(article["digest"], "a\nb");
    }

    #[tokio::test]
    async fn test_token_exchange_then_send() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/gettoken"))
            .and(query_param("corpid", "ww123"))
            .and(query_param("corpsecret", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "access_token": "TOKEN", "expires_in": 7200})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/cgi-bin/message/send"))
            .and(query_param("access_token", "TOKEN"))
            .and(body_partial_json(json!({"touser": "@all", "msgtype": "textcard"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = WeComAppProvider::new(settings()).with_endpoint(server.uri());
        let result = provider
            .send(&NotificationMessage::new("T", "C"), Duration::from_secs(5))
            .await;
        assert!(result.success, "{result:?}");
    }

    #[tokio::test]
    async fn test_missing_token_skips_send() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/gettoken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 40013, "errmsg": "invalid corpid"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/cgi-bin/message/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0})))
            .expect(0)
            .mount(&server)
            .await;

        let provider = WeComAppProvider::new(settings()).with_endpoint(server.uri());
        let result = provider
            .send(&NotificationMessage::new("T", "C"), Duration::from_secs(5))
            .await;
        assert!(!result.success);
        assert!(result.detail.contains("invalid corpid"), "{}", result.detail);

        server.verify().await;
    }
}
