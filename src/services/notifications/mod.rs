//! Notification system with pluggable providers.
//!
//! Every push channel implements [`NotificationProvider`]; the
//! [`NotificationService`] sends one message to each enabled channel and
//! reports a [`NotificationResult`] per channel.

mod bark_provider;
mod coolpush_provider;
mod dingtalk_provider;
mod feishu_provider;
mod gotify_provider;
mod message;
mod ntfy_provider;
mod provider;
mod pushdeer_provider;
mod pushplus_provider;
mod qmsg_provider;
mod serverchan_provider;
mod telegram_provider;
mod wecom_app_provider;
mod wecom_robot_provider;

pub mod notification_service;

pub use bark_provider::BarkProvider;
pub use coolpush_provider::CoolPushProvider;
pub use dingtalk_provider::{DingTalkProvider, sign as dingtalk_sign};
pub use feishu_provider::FeishuProvider;
pub use gotify_provider::GotifyProvider;
pub use message::{Level, NotificationMessage, Sound};
pub use notification_service::{DEFAULT_TIMEOUT, NotificationService};
pub use ntfy_provider::NtfyProvider;
pub use provider::{Delivery, NotificationProvider, NotificationResult};
pub use pushdeer_provider::PushDeerProvider;
pub use pushplus_provider::PushPlusProvider;
pub use qmsg_provider::QmsgProvider;
pub use serverchan_provider::{ServerChanEdition, ServerChanProvider};
pub use telegram_provider::TelegramProvider;
pub use wecom_app_provider::WeComAppProvider;
pub use wecom_robot_provider::WeComRobotProvider;
