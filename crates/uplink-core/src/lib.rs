//! Uplink Core Library
//!
//! This crate provides the domain models, error types, configuration and constants
//! shared across all Uplink components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::UploaderConfig;
pub use error::{LogLevel, UploadError, UploadResult};
pub use models::{
    BatchReport, DescriptorError, FileDescriptor, FileReport, FileStatus, MediaKind,
    UploadOutcome, UploadRequest,
};
