use async_trait::async_trait;

use super::{ChannelDescriptor, Notification, Notifier};

/// Notifier for desktop and CI runs where no platform notification API exists.
/// Every notification becomes a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn ensure_channel(&self, channel: &ChannelDescriptor) -> anyhow::Result<()> {
        tracing::debug!(channel_id = %channel.id, name = %channel.name, "Notification channel ready");
        Ok(())
    }

    async fn notify(&self, notification: Notification) -> anyhow::Result<()> {
        tracing::info!(
            notification_id = %notification.id,
            channel_id = %notification.channel_id,
            title = %notification.title,
            "{}",
            notification.body
        );
        Ok(())
    }
}
