//! Uplink Worker Library
//!
//! Fans a batch out into one task per file, runs each file through
//! normalize, upload, commit and notify, and collects an optional report.

pub mod bridge;
pub mod dispatcher;
mod pipeline;

pub use bridge::{BridgeOutcome, UploadBridge};
pub use dispatcher::{DispatchHandle, Dispatcher};
