//! User-facing upload notifications
//!
//! The host platform owns the actual notification surface. This module defines
//! the seam ([`Notifier`]) plus the stand-ins used off-device and in tests.

mod guard;
mod log;
mod recording;

pub use guard::ChannelGuard;
pub use log::LogNotifier;
pub use recording::RecordingNotifier;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uplink_core::constants::{NOTIFY_TITLE_COMPLETE, NOTIFY_TITLE_ERROR};
use uplink_core::UploaderConfig;
use uuid::Uuid;

/// Channel under which upload notifications are posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl ChannelDescriptor {
    pub fn from_config(config: &UploaderConfig) -> Self {
        Self {
            id: config.notification_channel_id.clone(),
            name: config.notification_channel_name.clone(),
            description: config.notification_channel_description.clone(),
        }
    }
}

impl Default for ChannelDescriptor {
    fn default() -> Self {
        Self::from_config(&UploaderConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(channel_id: &str, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel_id: channel_id.to_string(),
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    pub fn upload_complete(channel_id: &str, original_name: &str) -> Self {
        Self::new(
            channel_id,
            NOTIFY_TITLE_COMPLETE,
            format!("File {} uploaded successfully.", original_name),
        )
    }

    pub fn upload_error(channel_id: &str, original_name: &str) -> Self {
        Self::new(
            channel_id,
            NOTIFY_TITLE_ERROR,
            format!("Failed to upload {}", original_name),
        )
    }
}

/// Platform notification surface.
///
/// Both calls are best-effort: callers log errors and carry on.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Register the channel. Must be safe to call more than once.
    async fn ensure_channel(&self, channel: &ChannelDescriptor) -> anyhow::Result<()>;

    async fn notify(&self, notification: Notification) -> anyhow::Result<()>;
}
