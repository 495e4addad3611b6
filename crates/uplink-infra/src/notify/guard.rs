use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{ChannelDescriptor, Notification, Notifier};

/// Wraps a notifier so the channel is registered at most once, however many
/// tasks ask for it. Failures from either call are logged, never returned.
pub struct ChannelGuard {
    inner: Arc<dyn Notifier>,
    channel: ChannelDescriptor,
    registered: OnceCell<()>,
}

impl ChannelGuard {
    pub fn new(inner: Arc<dyn Notifier>, channel: ChannelDescriptor) -> Self {
        Self {
            inner,
            channel,
            registered: OnceCell::new(),
        }
    }

    /// Register the channel on first call; later calls return immediately.
    /// A failed registration is not retried.
    pub async fn ensure_channel(&self) {
        self.registered
            .get_or_init(|| async {
                if let Err(e) = self.inner.ensure_channel(&self.channel).await {
                    tracing::warn!(
                        channel_id = %self.channel.id,
                        error = %e,
                        "Failed to register notification channel"
                    );
                }
            })
            .await;
    }

    pub fn is_registered(&self) -> bool {
        self.registered.initialized()
    }

    pub async fn upload_complete(&self, original_name: &str) {
        self.send(Notification::upload_complete(&self.channel.id, original_name))
            .await;
    }

    pub async fn upload_error(&self, original_name: &str) {
        self.send(Notification::upload_error(&self.channel.id, original_name))
            .await;
    }

    async fn send(&self, notification: Notification) {
        let title = notification.title.clone();
        if let Err(e) = self.inner.notify(notification).await {
            tracing::warn!(title = %title, error = %e, "Failed to post notification");
        }
    }
}
