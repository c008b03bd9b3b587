//! ServerChan (Server酱) notification providers.
//!
//! The legacy service (sc.ftqq.com, `SCKEY`) and the Turbo service
//! (sctapi.ftqq.com, `SENDKEY`) share a request shape but differ in host and
//! success marker, so they are registered as two providers.

use super::message::NotificationMessage;
use super::provider::{Delivery, JsonReply, NotificationProvider};
use crate::config::ServerChanSettings;
use crate::config::settings::is_set;
use crate::error::AppResult;
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub const SERVERCHAN_LEGACY_ENDPOINT: &str = "https://sc.ftqq.com";
pub const SERVERCHAN_TURBO_ENDPOINT: &str = "https://sctapi.ftqq.com";

/// Which ServerChan backend a provider talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerChanEdition {
    Legacy,
    Turbo,
}

impl ServerChanEdition {
    fn default_endpoint(self) -> &'static str {
        match self {
            ServerChanEdition::Legacy => SERVERCHAN_LEGACY_ENDPOINT,
            ServerChanEdition::Turbo => SERVERCHAN_TURBO_ENDPOINT,
        }
    }

    /// JSON field and value reporting success
    fn success_marker(self) -> (&'static str, serde_json::Value) {
        match self {
            ServerChanEdition::Legacy => ("errno", json!(0)),
            ServerChanEdition::Turbo => ("code", json!(0)),
        }
    }
}

/// ServerChan notification provider
#[derive(Debug, Clone)]
pub struct ServerChanProvider {
    edition: ServerChanEdition,
    key: Option<String>,
    endpoint: String,
}

impl ServerChanProvider {
    /// Legacy provider keyed by `server.sckey`
    pub fn legacy(settings: &ServerChanSettings) -> Self {
        Self::with_key(ServerChanEdition::Legacy, settings.sckey.clone())
    }

    /// Turbo provider keyed by `server.sendkey`
    pub fn turbo(settings: &ServerChanSettings) -> Self {
        Self::with_key(ServerChanEdition::Turbo, settings.sendkey.clone())
    }

    fn with_key(edition: ServerChanEdition, key: Option<String>) -> Self {
        Self {
            edition,
            key,
            endpoint: edition.default_endpoint().to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn send_url(&self) -> String {
        format!(
            "{}/{}.send",
            self.endpoint.trim_end_matches('/'),
            self.key.as_deref().unwrap_or_default()
        )
    }
}

/// ServerChan renders markdown; a single newline does not break a line
fn double_newlines(content: &str) -> String {
    content.replace('\n', "\n\n")
}

#[async_trait]
impl NotificationProvider for ServerChanProvider {
    fn name(&self) -> &'static str {
        match self.edition {
            ServerChanEdition::Legacy => "serverchan",
            ServerChanEdition::Turbo => "serverchan_turbo",
        }
    }

    fn is_enabled(&self) -> bool {
        is_set(&self.key)
    }

    async fn deliver(
        &self,
        message: &NotificationMessage,
        timeout: Duration,
    ) -> AppResult<Delivery> {
        let desp = double_newlines(&message.content);
        let form = [("text", message.title.as_str()), ("desp", desp.as_str())];

        let response = HTTP_CLIENT
            .post(self.send_url())
            .timeout(timeout)
            .form(&form)
            .send()
            .await?;

        let (field, expected) = self.edition.success_marker();
        JsonReply::read(response).await?.expect_field(field, expected)
    }
}
