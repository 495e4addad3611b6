//! Host plugin entry point.
//!
//! Hosts call `execute(action, args)` with a JSON argument array. Only
//! `uploadFiles` is understood; anything else is reported as not handled so
//! the host can try another plugin.

use serde_json::Value;
use std::sync::Arc;
use uplink_core::constants::UPLOAD_FILES_ACTION;
use uplink_core::{UploadRequest, UploadResult};

use crate::dispatcher::{DispatchHandle, Dispatcher};

pub enum BridgeOutcome {
    /// The batch was scheduled. `message` goes back to the host's success callback.
    Dispatched {
        message: String,
        handle: DispatchHandle,
    },
    /// Unknown action
    NotHandled,
}

impl BridgeOutcome {
    pub fn handled(&self) -> bool {
        matches!(self, BridgeOutcome::Dispatched { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            BridgeOutcome::Dispatched { message, .. } => Some(message),
            BridgeOutcome::NotHandled => None,
        }
    }

    pub fn into_handle(self) -> Option<DispatchHandle> {
        match self {
            BridgeOutcome::Dispatched { handle, .. } => Some(handle),
            BridgeOutcome::NotHandled => None,
        }
    }
}

#[derive(Clone)]
pub struct UploadBridge {
    dispatcher: Arc<Dispatcher>,
}

impl UploadBridge {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// `args` must be `[postId, sasToken, files]`.
    pub async fn execute(&self, action: &str, args: &Value) -> UploadResult<BridgeOutcome> {
        if action != UPLOAD_FILES_ACTION {
            tracing::debug!(action = %action, "Ignoring unknown bridge action");
            return Ok(BridgeOutcome::NotHandled);
        }

        let (request, rejected) = UploadRequest::from_args(args)?;
        let message = format!("Upload completed for postId: {}", request.post_id);
        let handle = self.dispatcher.dispatch(request, rejected).await;

        Ok(BridgeOutcome::Dispatched { message, handle })
    }
}
