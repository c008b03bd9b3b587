//! Typed provider settings
//!
//! One struct per settings block. Values are resolved once through
//! [`SettingsResolver`] and never change afterwards; blank values are stored
//! as `None`.

use serde::Serialize;

use crate::config::resolver::SettingsResolver;

// ============================================================================
// Defaults
// ============================================================================

const DEFAULT_BARK_SOUND: &str = "birdsong";
const DEFAULT_QMSG_TYPE: &str = "private";
const DEFAULT_GOTIFY_PRIORITY: i64 = 3;
const DEFAULT_NTFY_URL: &str = "https://ntfy.sh";
const DEFAULT_NTFY_PRIORITY: &str = "3";
const DEFAULT_PUSHDEER_URL: &str = "https://api2.pushdeer.com/message/push";
const DEFAULT_PUSHDEER_TYPE: &str = "text";

/// Whether an optional setting holds a non-blank value
pub fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// ============================================================================
// Per-provider settings
// ============================================================================

/// Bark (`bark` block)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BarkSettings {
    /// Device key, or a full push URL starting with `http`
    pub push: Option<String>,
    pub icon: Option<String>,
    pub sound: Option<String>,
    pub group: Option<String>,
    pub level: Option<String>,
    /// Click-through URL attached to the notification
    pub url: Option<String>,
}

/// ServerChan legacy and turbo (`server` block)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerChanSettings {
    /// Legacy key for sc.ftqq.com
    pub sckey: Option<String>,
    /// Turbo key for sctapi.ftqq.com
    pub sendkey: Option<String>,
}

/// CoolPush (`coolpush` block)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoolPushSettings {
    pub skey: Option<String>,
    pub qq: bool,
    pub wx: bool,
    pub email: bool,
}

impl Default for CoolPushSettings {
    fn default() -> Self {
        Self {
            skey: None,
            qq: true,
            wx: false,
            email: false,
        }
    }
}

/// Qmsg (`qmsg` block)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QmsgSettings {
    pub key: Option<String>,
    /// `private` or `group`
    pub kind: String,
}

impl Default for QmsgSettings {
    fn default() -> Self {
        Self {
            key: None,
            kind: DEFAULT_QMSG_TYPE.to_string(),
        }
    }
}

/// Telegram (`telegram` block)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TelegramSettings {
    pub bot_token: Option<String>,
    /// Chat id the bot posts to
    pub user_id: Option<String>,
    /// Alternate Bot API host, e.g. a reverse proxy
    pub api_host: Option<String>,
    /// Proxy URL applied to this provider only
    pub proxy: Option<String>,
}

/// Feishu (`feishu` block)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeishuSettings {
    pub key: Option<String>,
}

/// DingTalk (`dingtalk` block)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DingTalkSettings {
    pub access_token: Option<String>,
    pub secret: Option<String>,
}

/// WeCom robot and WeCom app (`qywx` block)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeComSettings {
    /// Group robot webhook key
    pub key: Option<String>,
    pub corpid: Option<String>,
    pub agentid: Option<String>,
    pub corpsecret: Option<String>,
    pub touser: Option<String>,
    /// Thumbnail media id; switches the app message to `mpnews`
    pub media_id: Option<String>,
    /// Alternate API origin for the app message endpoints
    pub origin: Option<String>,
}

/// PushPlus (`pushplus` block)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushPlusSettings {
    pub token: Option<String>,
    pub topic: Option<String>,
}

/// Gotify (`gotify` block)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GotifySettings {
    /// Base URL of the self-hosted server
    pub url: Option<String>,
    pub token: Option<String>,
    pub priority: i64,
}

impl Default for GotifySettings {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            priority: DEFAULT_GOTIFY_PRIORITY,
        }
    }
}

/// Ntfy (`ntfy` block)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NtfySettings {
    pub url: String,
    pub topic: Option<String>,
    pub priority: String,
}

impl Default for NtfySettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_NTFY_URL.to_string(),
            topic: None,
            priority: DEFAULT_NTFY_PRIORITY.to_string(),
        }
    }
}

/// PushDeer (`pushdeer` block)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushDeerSettings {
    pub pushkey: Option<String>,
    pub url: String,
    /// `text`, `markdown` or `image`
    pub kind: String,
}

impl Default for PushDeerSettings {
    fn default() -> Self {
        Self {
            pushkey: None,
            url: DEFAULT_PUSHDEER_URL.to_string(),
            kind: DEFAULT_PUSHDEER_TYPE.to_string(),
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// All provider settings, resolved once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationSettings {
    pub bark: BarkSettings,
    pub server: ServerChanSettings,
    pub coolpush: CoolPushSettings,
    pub qmsg: QmsgSettings,
    pub telegram: TelegramSettings,
    pub feishu: FeishuSettings,
    pub dingtalk: DingTalkSettings,
    pub qywx: WeComSettings,
    pub pushplus: PushPlusSettings,
    pub gotify: GotifySettings,
    pub ntfy: NtfySettings,
    pub pushdeer: PushDeerSettings,
}

impl NotificationSettings {
    /// Resolve every provider block through `resolver`
    pub fn resolve(r: &SettingsResolver) -> Self {
        Self {
            bark: BarkSettings {
                push: r.text("bark", "push", "BARK_PUSH"),
                icon: r.text("bark", "icon", "BARK_ICON"),
                sound: Some(r.text_or("bark", "sound", "BARK_SOUND", DEFAULT_BARK_SOUND)),
                group: r.text("bark", "group", "BARK_GROUP"),
                level: r.text("bark", "level", "BARK_LEVEL"),
                url: r.text("bark", "url", "BARK_URL"),
            },
            server: ServerChanSettings {
                sckey: r.text("server", "sckey", "SCKEY"),
                sendkey: r.text("server", "sendkey", "SENDKEY"),
            },
            coolpush: CoolPushSettings {
                skey: r.text("coolpush", "skey", "COOLPUSH_SKEY"),
                qq: r.flag("coolpush", "qq", "COOLPUSH_QQ", true),
                wx: r.flag("coolpush", "wx", "COOLPUSH_WX", false),
                email: r.flag("coolpush", "email", "COOLPUSH_EMAIL", false),
            },
            qmsg: QmsgSettings {
                key: r.text("qmsg", "key", "QMSG_KEY"),
                kind: r
                    .text_or("qmsg", "type", "QMSG_TYPE", DEFAULT_QMSG_TYPE),
            },
            telegram: TelegramSettings {
                bot_token: r.text("telegram", "bot_token", "TG_BOT_TOKEN"),
                user_id: r.text("telegram", "user_id", "TG_USER_ID"),
                api_host: r.text("telegram", "api_host", "TG_API_HOST"),
                proxy: r.text("telegram", "proxy", "TG_PROXY"),
            },
            feishu: FeishuSettings {
                key: r.text("feishu", "key", "FSKEY"),
            },
            dingtalk: DingTalkSettings {
                access_token: r.text("dingtalk", "access_token", "DINGTALK_ACCESS_TOKEN"),
                secret: r.text("dingtalk", "secret", "DINGTALK_SECRET"),
            },
            qywx: WeComSettings {
                key: r.text("qywx", "key", "QYWX_KEY"),
                corpid: r.text("qywx", "corpid", "QYWX_CORPID"),
                agentid: r.text("qywx", "agentid", "QYWX_AGENTID"),
                corpsecret: r.text("qywx", "corpsecret", "QYWX_CORPSECRET"),
                touser: r.text("qywx", "touser", "QYWX_TOUSER"),
                media_id: r.text("qywx", "media_id", "QYWX_MEDIA_ID"),
                origin: r.text("qywx", "origin", "QYWX_ORIGIN"),
            },
            pushplus: PushPlusSettings {
                token: r.text("pushplus", "token", "PUSHPLUS_TOKEN"),
                topic: r.text("pushplus", "topic", "PUSHPLUS_TOPIC"),
            },
            gotify: GotifySettings {
                url: r.text("gotify", "url", "GOTIFY_URL"),
                token: r.text("gotify", "token", "GOTIFY_TOKEN"),
                priority: parse_priority(r.text("gotify", "priority", "GOTIFY_PRIORITY")),
            },
            ntfy: NtfySettings {
                url: r
                    .text_or("ntfy", "url", "NTFY_URL", DEFAULT_NTFY_URL),
                topic: r.text("ntfy", "topic", "NTFY_TOPIC"),
                priority: r
                    .text_or("ntfy", "priority", "NTFY_PRIORITY", DEFAULT_NTFY_PRIORITY),
            },
            pushdeer: PushDeerSettings {
                pushkey: r.text("pushdeer", "pushkey", "PUSHDEER_PUSHKEY"),
                url: r
                    .text_or("pushdeer", "url", "PUSHDEER_URL", DEFAULT_PUSHDEER_URL),
                kind: r
                    .text_or("pushdeer", "type", "PUSHDEER_TYPE", DEFAULT_PUSHDEER_TYPE),
            },
        }
    }
}

fn parse_priority(raw: Option<String>) -> i64 {
    match raw {
        None => DEFAULT_GOTIFY_PRIORITY,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(
                value = %value,
                "gotify.priority is not an integer, using {}",
                DEFAULT_GOTIFY_PRIORITY
            );
            DEFAULT_GOTIFY_PRIORITY
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolver(pairs: &[(&str, &str)]) -> SettingsResolver {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SettingsResolver::new(None, env)
    }

    #[test]
    fn test_defaults_without_any_source() {
        let settings = NotificationSettings::resolve(&SettingsResolver::default());

        assert_eq!(settings.bark.push, None);
        assert_eq!(settings.bark.sound.as_deref(), Some("birdsong"));
        assert!(settings.coolpush.qq);
        assert!(!settings.coolpush.wx);
        assert!(!settings.coolpush.email);
        assert_eq!(settings.qmsg.kind, "private");
        assert_eq!(settings.gotify.priority, 3);
        assert_eq!(settings.ntfy.url, "https://ntfy.sh");
        assert_eq!(settings.ntfy.priority, "3");
        assert_eq!(settings.pushdeer.url, "https://api2.pushdeer.com/message/push");
        assert_eq!(settings.pushdeer.kind, "text");
    }

    #[test]
    fn test_env_vars_map_to_blocks() {
        let settings = NotificationSettings::resolve(&resolver(&[
            ("TG_BOT_TOKEN", "123:abc"),
            ("TG_USER_ID", "42"),
            ("QYWX_AGENTID", "1000002"),
            ("FSKEY", "hook"),
            ("GOTIFY_PRIORITY", "7"),
        ]));

        assert_eq!(settings.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(settings.telegram.user_id.as_deref(), Some("42"));
        assert_eq!(settings.qywx.agentid.as_deref(), Some("1000002"));
        assert_eq!(settings.feishu.key.as_deref(), Some("hook"));
        assert_eq!(settings.gotify.priority, 7);
    }

    #[test]
    fn test_invalid_gotify_priority_falls_back() {
        let settings = NotificationSettings::resolve(&resolver(&[("GOTIFY_PRIORITY", "high")]));
        assert_eq!(settings.gotify.priority, 3);
    }

    #[test]
    fn test_is_set() {
        assert!(is_set(&Some("x".to_string())));
        assert!(!is_set(&Some("  ".to_string())));
        assert!(!is_set(&None));
    }
}
