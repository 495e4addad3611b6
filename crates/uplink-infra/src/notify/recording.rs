use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ChannelDescriptor, Notification, Notifier};

/// In-memory notifier. Hosts that poll for notifications and tests read back
/// what was posted.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
    channels: Mutex<Vec<ChannelDescriptor>>,
    registrations: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything posted so far, in posting order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.title)
            .collect()
    }

    /// Notifications whose title equals `title`.
    pub fn count_titled(&self, title: &str) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.title == title)
            .count()
    }

    /// How many times `ensure_channel` was called.
    pub fn channel_registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn channels(&self) -> Vec<ChannelDescriptor> {
        self.channels.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn ensure_channel(&self, channel: &ChannelDescriptor) -> anyhow::Result<()> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.channels
            .lock()
            .map_err(|_| anyhow::anyhow!("channel list lock poisoned"))?
            .push(channel.clone());
        Ok(())
    }

    async fn notify(&self, notification: Notification) -> anyhow::Result<()> {
        self.notifications
            .lock()
            .map_err(|_| anyhow::anyhow!("notification list lock poisoned"))?
            .push(notification);
        Ok(())
    }
}
