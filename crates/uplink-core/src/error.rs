//! Error types module
//!
//! All failures a batch can run into are unified under [`UploadError`]. None of them
//! is fatal to a batch: the dispatcher maps each one to a per-file outcome.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues such as undecodable media
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Payload decode error: {0}")]
    Decode(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Commit error: {0}")]
    Commit(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

impl UploadError {
    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::InvalidRequest(_) => "INVALID_REQUEST",
            UploadError::Decode(_) => "DECODE_ERROR",
            UploadError::ImageProcessing(_) => "IMAGE_PROCESSING_ERROR",
            UploadError::Storage(_) => "STORAGE_ERROR",
            UploadError::Commit(_) => "COMMIT_ERROR",
            UploadError::Config(_) => "CONFIG_ERROR",
            UploadError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            UploadError::InvalidRequest(_) => LogLevel::Debug,
            UploadError::Decode(_) | UploadError::ImageProcessing(_) | UploadError::Commit(_) => {
                LogLevel::Warn
            }
            UploadError::Storage(_) | UploadError::Config(_) | UploadError::Internal(_) => {
                LogLevel::Error
            }
        }
    }
}
