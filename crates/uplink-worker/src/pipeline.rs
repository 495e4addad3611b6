//! Per-file task: normalize, upload, commit, notify.

use chrono::Utc;
use std::sync::Arc;
use uplink_core::constants::COMMIT_FILE_MIME;
use uplink_core::{FileDescriptor, FileReport, FileStatus, MediaKind, UploadError};
use uplink_infra::ChannelGuard;
use uplink_processing::MediaNormalizer;
use uplink_storage::{BlobStore, CommitClient};
use uuid::Uuid;

/// Everything a file task needs, shared by all tasks of one batch.
pub(crate) struct BatchContext {
    pub post_id: String,
    pub sas_token: String,
    pub store: Arc<dyn BlobStore>,
    pub commit: Arc<dyn CommitClient>,
    pub normalizer: Arc<MediaNormalizer>,
    pub notifications: Arc<ChannelGuard>,
    pub notify_on_normalize_failure: bool,
}

#[tracing::instrument(
    skip(ctx, descriptor),
    fields(post_id = %ctx.post_id, file_name = %descriptor.file_name, kind = %descriptor.kind())
)]
pub(crate) async fn run_file(
    ctx: Arc<BatchContext>,
    task_id: Uuid,
    descriptor: FileDescriptor,
) -> FileReport {
    let kind = descriptor.kind();
    let (primary, thumbnail) = match ctx.normalizer.normalize(&descriptor).await {
        Ok(media) => {
            let primary = upload(&ctx, &descriptor.file_name, media.payload, &descriptor).await;
            let thumbnail = match (kind, media.thumbnail) {
                (MediaKind::Video, _) if descriptor.thumbnail_name.is_empty() => {
                    tracing::debug!("Video has no thumbnail key, skipping thumbnail");
                    Some(FileStatus::Skipped)
                }
                (MediaKind::Video, Some(still)) => {
                    Some(upload(&ctx, &descriptor.thumbnail_name, still, &descriptor).await)
                }
                (MediaKind::Video, None) => Some(FileStatus::NormalizeFailed {
                    reason: "thumbnail extraction failed".to_string(),
                }),
                _ => None,
            };
            (primary, thumbnail)
        }
        Err(e) => {
            log_normalize_failure(&e);
            if ctx.notify_on_normalize_failure {
                ctx.notifications
                    .upload_error(&descriptor.original_name)
                    .await;
            }
            (
                FileStatus::NormalizeFailed {
                    reason: e.to_string(),
                },
                None,
            )
        }
    };

    FileReport {
        task_id,
        file_name: descriptor.file_name,
        original_name: descriptor.original_name,
        kind,
        primary,
        thumbnail,
        finished_at: Utc::now(),
    }
}

/// PUT one payload; on success commit it and post "Upload Complete",
/// on failure post "Upload Error".
async fn upload(
    ctx: &BatchContext,
    key: &str,
    payload: bytes::Bytes,
    descriptor: &FileDescriptor,
) -> FileStatus {
    let remote_url = match ctx.store.put_blob(key, payload, &ctx.sas_token).await {
        Ok(url) => url,
        Err(e) => {
            let err = UploadError::from(e);
            tracing::warn!(
                key = %key,
                error = %err,
                error_code = err.error_code(),
                "Upload failed"
            );
            ctx.notifications
                .upload_error(&descriptor.original_name)
                .await;
            return FileStatus::UploadFailed {
                reason: err.to_string(),
            };
        }
    };

    let committed = match ctx
        .commit
        .commit(
            &ctx.post_id,
            &remote_url,
            &descriptor.original_name,
            COMMIT_FILE_MIME,
        )
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Commit failed");
            false
        }
    };

    ctx.notifications
        .upload_complete(&descriptor.original_name)
        .await;

    FileStatus::Uploaded {
        remote_url,
        committed,
    }
}

fn log_normalize_failure(err: &UploadError) {
    match err.log_level() {
        uplink_core::LogLevel::Debug => {
            tracing::debug!(error = %err, error_code = err.error_code(), "File dropped")
        }
        uplink_core::LogLevel::Warn => {
            tracing::warn!(error = %err, error_code = err.error_code(), "File dropped")
        }
        uplink_core::LogLevel::Error => {
            tracing::error!(error = %err, error_code = err.error_code(), "File dropped")
        }
    }
}
