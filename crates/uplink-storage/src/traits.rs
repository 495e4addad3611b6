//! Storage abstraction traits
//!
//! This module defines the two outbound calls every upload makes: the blob PUT
//! and the backend commit.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uplink_core::UploadError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Commit failed: {0}")]
    CommitFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::CommitFailed(msg) => UploadError::Commit(msg),
            StorageError::ConfigError(msg) => UploadError::Config(msg),
            other => UploadError::Storage(other.to_string()),
        }
    }
}

/// Blob store reached through pre-signed URLs.
///
/// Implementations must treat any HTTP response as success; only transport
/// failures (DNS, connect, TLS, timeout, aborted body) are errors.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `data` under `key` and return the object's public URL
    /// (without the token).
    async fn put_blob(&self, key: &str, data: Bytes, sas_token: &str) -> StorageResult<String>;

    /// The public URL an object stored under `key` would have.
    fn object_url(&self, key: &str) -> StorageResult<String>;
}

/// Backend registration of an uploaded object against a post.
#[async_trait]
pub trait CommitClient: Send + Sync {
    async fn commit(
        &self,
        post_id: &str,
        remote_url: &str,
        original_name: &str,
        file_mime: &str,
    ) -> StorageResult<()>;
}
