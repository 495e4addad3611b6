//! Uplink Infrastructure Library
//!
//! Cross-cutting pieces shared by the worker and the CLI: tracing setup and
//! user-facing notifications.

pub mod notify;
pub mod telemetry;

pub use notify::{
    ChannelDescriptor, ChannelGuard, LogNotifier, Notification, Notifier, RecordingNotifier,
};
pub use telemetry::init_telemetry;
