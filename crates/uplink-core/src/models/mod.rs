//! Domain models for upload batches and their outcomes.

pub mod report;
pub mod upload;

pub use report::{BatchReport, FileReport, FileStatus, UploadOutcome};
pub use upload::{DescriptorError, FileDescriptor, MediaKind, UploadRequest};
