//! End-to-end dispatch: settings resolution through provider requests.

use pushcast::config::{ConfigLoader, NotificationSettings, SettingsResolver};
use pushcast::services::notifications::{
    BarkProvider, CoolPushProvider, NotificationMessage, NotificationProvider, NotificationService,
    TelegramProvider,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_from_env(pairs: &[(&str, &str)]) -> NotificationSettings {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    NotificationSettings::resolve(&SettingsResolver::new(None, env))
}

#[tokio::test]
async fn bark_only_sends_exactly_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/abc123"))
        .and(body_partial_json(json!({"title": "T", "body": "C"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "message": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_from_env(&[("BARK_PUSH", "abc123")]);
    let bark: Arc<dyn NotificationProvider> =
        Arc::new(BarkProvider::new(settings.bark.clone()).with_endpoint(server.uri()));
    let service = NotificationService::new(vec![bark]);

    let results = service.send_all(&NotificationMessage::new("T", "C")).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].provider, "bark");
    assert!(results[0].success, "{:?}", results[0]);
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
}

#[tokio::test]
async fn full_registry_reaches_only_the_configured_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(1)
        .mount(&server)
        .await;

    // A push value that is a full URL bypasses the public Bark server
    let push = format!("{}/abc123", server.uri());
    let settings = settings_from_env(&[("BARK_PUSH", push.as_str())]);
    let service = NotificationService::from_settings(&settings);

    assert_eq!(service.enabled_providers(), ["bark"]);
    let results = service.send_all(&NotificationMessage::new("T", "C")).await;
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
}

#[tokio::test]
async fn timeout_in_one_provider_does_not_block_another() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/send/sk"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&slow)
        .await;

    let telegram_api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&telegram_api)
        .await;

    let api_host = telegram_api.uri();
    let settings = settings_from_env(&[
        ("COOLPUSH_SKEY", "sk"),
        ("TG_BOT_TOKEN", "123:abc"),
        ("TG_USER_ID", "42"),
        ("TG_API_HOST", api_host.as_str()),
    ]);
    let providers: Vec<Arc<dyn NotificationProvider>> = vec![
        Arc::new(CoolPushProvider::new(settings.coolpush.clone()).with_endpoint(slow.uri())),
        Arc::new(TelegramProvider::new(settings.telegram.clone())),
    ];
    let service = NotificationService::new(providers).with_timeout(Duration::from_millis(300));

    let results = service.send_all(&NotificationMessage::new("T", "C")).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].provider, "coolpush");
    assert!(!results[0].success);
    assert_eq!(results[1].provider, "telegram");
    assert!(results[1].success, "{:?}", results[1]);
}

#[tokio::test]
async fn nothing_configured_sends_nothing() {
    let server = MockServer::start().await;

    let service = NotificationService::from_settings(&settings_from_env(&[]));
    let results = service.send_all(&NotificationMessage::new("T", "C")).await;

    assert!(results.is_empty());
    assert!(service.enabled_providers().is_empty());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn settings_file_wins_over_environment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/from-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/from-env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notification.json");
    std::fs::write(
        &file,
        json!({"bark": {"push": format!("{}/from-file", server.uri())}}).to_string(),
    )
    .unwrap();

    let env = HashMap::from([("BARK_PUSH".to_string(), format!("{}/from-env", server.uri()))]);
    let resolver = ConfigLoader::with_file(&file).resolver_with_env(env);
    let service = NotificationService::from_settings(&NotificationSettings::resolve(&resolver));

    let results = service.send_all(&NotificationMessage::new("T", "C")).await;
    assert_eq!(results.len(), 1);
    assert!(results[0].success);

    server.verify().await;
}
