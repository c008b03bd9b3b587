//! Service layer for notification delivery.

pub mod notifications;

pub use notifications::{NotificationMessage, NotificationResult, NotificationService};
