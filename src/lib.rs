//! pushcast library
//!
//! Resolves per-provider push settings and delivers one message to every
//! configured channel.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod services;

pub use config::{ConfigLoader, NotificationSettings};
pub use services::notifications::{NotificationMessage, NotificationResult, NotificationService};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
