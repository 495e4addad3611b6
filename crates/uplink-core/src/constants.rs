//! Application-wide constants.

/// Blob store base URL used when `UPLINK_STORAGE_BASE_URL` is not set.
pub const DEFAULT_STORAGE_BASE_URL: &str = "https://arabicschool.blob.core.windows.net";

/// Backend commit endpoint used when `UPLINK_COMMIT_ENDPOINT` is not set.
pub const DEFAULT_COMMIT_ENDPOINT: &str =
    "https://personal-fjlz3d21.outsystemscloud.com/uploads/rest/a/commit";

/// Content type sent with every blob PUT, whatever the payload is.
pub const BLOB_CONTENT_TYPE: &str = "application/octet-stream";

/// Value reported as `filemime` in every commit payload.
///
/// The backend has never been observed to read this field. If it starts trusting
/// it, images and videos will be mislabelled.
pub const COMMIT_FILE_MIME: &str = "application/octet-stream";

/// Host action name for the batch upload operation.
pub const UPLOAD_FILES_ACTION: &str = "uploadFiles";

/// Notification channel defaults.
pub const DEFAULT_CHANNEL_ID: &str = "upload_channel";
pub const DEFAULT_CHANNEL_NAME: &str = "Uploads";
pub const DEFAULT_CHANNEL_DESCRIPTION: &str = "Notifications for file uploads";

pub const NOTIFY_TITLE_COMPLETE: &str = "Upload Complete";
pub const NOTIFY_TITLE_ERROR: &str = "Upload Error";

/// Default cap on simultaneous per-file tasks. `0` disables the cap.
pub const DEFAULT_MAX_CONCURRENT_UPLOADS: usize = 4;

/// Timestamp (seconds) of the frame used as a video thumbnail.
pub const THUMBNAIL_TIMESTAMP_SECS: f64 = 0.0;
