//! Notification dispatch across every configured provider.
//!
//! Sends one message to all enabled providers and collects a result per
//! provider. A provider that fails, or even panics, never keeps the others
//! from being attempted.

use super::bark_provider::BarkProvider;
use super::coolpush_provider::CoolPushProvider;
use super::dingtalk_provider::DingTalkProvider;
use super::feishu_provider::FeishuProvider;
use super::gotify_provider::GotifyProvider;
use super::message::NotificationMessage;
use super::ntfy_provider::NtfyProvider;
use super::provider::{NotificationProvider, NotificationResult};
use super::pushdeer_provider::PushDeerProvider;
use super::pushplus_provider::PushPlusProvider;
use super::qmsg_provider::QmsgProvider;
use super::serverchan_provider::ServerChanProvider;
use super::telegram_provider::TelegramProvider;
use super::wecom_app_provider::WeComAppProvider;
use super::wecom_robot_provider::WeComRobotProvider;
use crate::config::NotificationSettings;
use futures::FutureExt;
use futures::future::join_all;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Per-request timeout used when none is given
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Notification service holding an ordered list of providers
///
/// Cloning is cheap since providers are shared through `Arc`.
#[derive(Clone)]
pub struct NotificationService {
    providers: Vec<Arc<dyn NotificationProvider>>,
    timeout: Duration,
}

impl NotificationService {
    /// Creates a service over an explicit provider list
    ///
    /// Registration order is the order results are reported in.
    pub fn new(providers: Vec<Arc<dyn NotificationProvider>>) -> Self {
        Self {
            providers,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Registers every built-in provider from resolved settings
    pub fn from_settings(settings: &NotificationSettings) -> Self {
        let providers: Vec<Arc<dyn NotificationProvider>> = vec![
            Arc::new(BarkProvider::new(settings.bark.clone())),
            Arc::new(ServerChanProvider::legacy(&settings.server)),
            Arc::new(ServerChanProvider::turbo(&settings.server)),
            Arc::new(CoolPushProvider::new(settings.coolpush.clone())),
            Arc::new(QmsgProvider::new(settings.qmsg.clone())),
            Arc::new(TelegramProvider::new(settings.telegram.clone())),
            Arc::new(FeishuProvider::new(settings.feishu.clone())),
            Arc::new(DingTalkProvider::new(settings.dingtalk.clone())),
            Arc::new(WeComRobotProvider::new(&settings.qywx)),
            Arc::new(WeComAppProvider::new(settings.qywx.clone())),
            Arc::new(PushPlusProvider::new(settings.pushplus.clone())),
            Arc::new(PushDeerProvider::new(settings.pushdeer.clone())),
            Arc::new(GotifyProvider::new(settings.gotify.clone())),
            Arc::new(NtfyProvider::new(settings.ntfy.clone())),
        ];
        Self::new(providers)
    }

    /// Sets the timeout applied to each provider HTTP request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn providers(&self) -> &[Arc<dyn NotificationProvider>] {
        &self.providers
    }

    /// Names of the providers whose settings are complete
    pub fn enabled_providers(&self) -> Vec<&'static str> {
        self.providers
            .iter()
            .filter(|p| p.is_enabled())
            .map(|p| p.name())
            .collect()
    }

    /// Sends `message` to every enabled provider
    ///
    /// Providers run concurrently; results come back in registration order,
    /// one per enabled provider. Disabled providers produce no result.
    pub async fn send_all(&self, message: &NotificationMessage) -> Vec<NotificationResult> {
        let enabled: Vec<&Arc<dyn NotificationProvider>> = self
            .providers
            .iter()
            .filter(|provider| {
                let enabled = provider.is_enabled();
                if !enabled {
                    tracing::debug!(provider = provider.name(), "Provider not configured, skipping");
                }
                enabled
            })
            .collect();

        if enabled.is_empty() {
            tracing::info!("No notification provider configured");
            return Vec::new();
        }

        let timeout = self.timeout;
        let results = join_all(enabled.into_iter().map(|provider| async move {
            let name = provider.name();
            AssertUnwindSafe(provider.send(message, timeout))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    let reason = panic_message(panic.as_ref());
                    tracing::error!(provider = name, reason = %reason, "Provider panicked");
                    NotificationResult::failed(name, format!("provider panicked: {reason}"))
                })
        }))
        .await;

        let succeeded = results.iter().filter(|r| r.success).count();
        tracing::info!(
            attempted = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "Notification dispatch finished"
        );

        results
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use crate::services::notifications::provider::Delivery;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Succeed,
        Fail,
        Panic,
        Disabled,
    }

    struct Scripted {
        name: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl NotificationProvider for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_enabled(&self) -> bool {
            !matches!(self.behavior, Behavior::Disabled)
        }

        async fn deliver(
            &self,
            message: &NotificationMessage,
            _timeout: Duration,
        ) -> AppResult<Delivery> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => Ok(Delivery::new(200, message.title.clone())),
                Behavior::Fail => Err(AppError::rejected(500, "boom")),
                Behavior::Panic => panic!("adapter bug"),
                Behavior::Disabled => unreachable!(),
            }
        }
    }

    #[tokio::test]
    async fn test_panic_does_not_abort_others() {
        let first = Scripted::new("first", Behavior::Succeed);
        let broken = Scripted::new("broken", Behavior::Panic);
        let last = Scripted::new("last", Behavior::Succeed);
        let providers: Vec<Arc<dyn NotificationProvider>> = vec![first.clone(), broken, last.clone()];
        let service = NotificationService::new(providers);

        let results = service.send_all(&NotificationMessage::new("T", "C")).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[1].detail.contains("adapter bug"));
        assert!(results[2].success);
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(last.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_results_follow_registration_order() {
        let providers: Vec<Arc<dyn NotificationProvider>> = vec![
            Scripted::new("a", Behavior::Fail),
            Scripted::new("b", Behavior::Disabled),
            Scripted::new("c", Behavior::Succeed),
        ];
        let service = NotificationService::new(providers);

        let results = service.send_all(&NotificationMessage::new("T", "C")).await;
        let names: Vec<_> = results.iter().map(|r| r.provider.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert_eq!(results[0].status_code, Some(500));
        assert_eq!(service.enabled_providers(), ["a", "c"]);
    }

    #[tokio::test]
    async fn test_nothing_enabled() {
        let disabled = Scripted::new("off", Behavior::Disabled);
        let providers: Vec<Arc<dyn NotificationProvider>> = vec![disabled.clone()];
        let service = NotificationService::new(providers);
        assert!(service.send_all(&NotificationMessage::new("T", "C")).await.is_empty());
        assert_eq!(disabled.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_settings_registers_in_order() {
        let service = NotificationService::from_settings(&NotificationSettings::default());
        let names: Vec<_> = service.providers().iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            [
                "bark",
                "serverchan",
                "serverchan_turbo",
                "coolpush",
                "qmsg",
                "telegram",
                "feishu",
                "dingtalk",
                "wecom_robot",
                "wecom_app",
                "pushplus",
                "pushdeer",
                "gotify",
                "ntfy",
            ]
        );
        assert!(service.enabled_providers().is_empty());
        assert_eq!(service.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
