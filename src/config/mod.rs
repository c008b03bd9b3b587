//! Configuration management for pushcast
//!
//! Provider settings are resolved once at startup from three sources, first
//! match wins:
//! 1. the JSON settings file (`config/notification.json` by default), keyed by
//!    provider block then setting name
//! 2. a provider-specific environment variable (`BARK_PUSH`, `TG_BOT_TOKEN`, ...)
//! 3. a built-in default
//!
//! A missing file is not an error. A malformed file is logged and treated as
//! empty.

pub mod error;
pub mod loader;
pub mod resolver;
pub mod settings;

// Re-export public types
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{SettingValue, SettingsResolver};
pub use settings::{
    BarkSettings, CoolPushSettings, DingTalkSettings, FeishuSettings, GotifySettings,
    NotificationSettings, NtfySettings, PushDeerSettings, PushPlusSettings, QmsgSettings,
    ServerChanSettings, TelegramSettings, WeComSettings,
};
