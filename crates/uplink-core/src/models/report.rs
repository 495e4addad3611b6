use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::upload::{DescriptorError, MediaKind};

/// Terminal result of one blob upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    Success { remote_url: String },
    Failure { reason: String },
}

/// What happened to one payload (primary or thumbnail) of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// PUT went through; `committed` says whether the backend call did too.
    Uploaded { remote_url: String, committed: bool },
    /// PUT failed at the transport level. No commit was attempted.
    UploadFailed { reason: String },
    /// Decoding or re-encoding failed before any network call.
    NormalizeFailed { reason: String },
    /// Nothing to upload (e.g. a video without a thumbnail key).
    Skipped,
}

impl FileStatus {
    /// The upload outcome, if a PUT was attempted.
    pub fn outcome(&self) -> Option<UploadOutcome> {
        match self {
            FileStatus::Uploaded { remote_url, .. } => Some(UploadOutcome::Success {
                remote_url: remote_url.clone(),
            }),
            FileStatus::UploadFailed { reason } => Some(UploadOutcome::Failure {
                reason: reason.clone(),
            }),
            FileStatus::NormalizeFailed { .. } | FileStatus::Skipped => None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, FileStatus::Uploaded { .. })
    }
}

/// Per-file record of a finished task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub task_id: Uuid,
    pub file_name: String,
    pub original_name: String,
    pub kind: MediaKind,
    pub primary: FileStatus,
    /// `None` for anything but videos.
    pub thumbnail: Option<FileStatus>,
    pub finished_at: DateTime<Utc>,
}

impl FileReport {
    /// Number of PUT requests this file issued.
    pub fn put_attempts(&self) -> usize {
        [Some(&self.primary), self.thumbnail.as_ref()]
            .into_iter()
            .flatten()
            .filter(|status| status.outcome().is_some())
            .count()
    }
}

/// Completion report for one dispatched batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub post_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Descriptors that never got a task
    pub rejected: Vec<DescriptorError>,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn uploaded(&self) -> usize {
        self.files.iter().filter(|f| f.primary.is_uploaded()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.uploaded()
    }

    pub fn file(&self, file_name: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.file_name == file_name)
    }
}
