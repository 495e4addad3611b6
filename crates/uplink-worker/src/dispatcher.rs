//! Batch dispatcher
//!
//! `dispatch` registers the notification channel once, spawns one task per
//! file and returns. Tasks are independent and are never cancelled; dropping
//! the returned [`DispatchHandle`] just detaches them.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use uplink_core::{
    BatchReport, DescriptorError, FileReport, FileStatus, MediaKind, UploadRequest, UploadResult,
    UploaderConfig,
};
use uplink_infra::{ChannelDescriptor, ChannelGuard, Notifier};
use uplink_processing::MediaNormalizer;
use uplink_storage::{create_clients, BlobStore, CommitClient};
use uuid::Uuid;

use crate::pipeline::{run_file, BatchContext};

pub struct Dispatcher {
    config: Arc<UploaderConfig>,
    store: Arc<dyn BlobStore>,
    commit: Arc<dyn CommitClient>,
    normalizer: Arc<MediaNormalizer>,
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(
        config: UploaderConfig,
        store: Arc<dyn BlobStore>,
        commit: Arc<dyn CommitClient>,
        normalizer: Arc<MediaNormalizer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            commit,
            normalizer,
            notifier,
        }
    }

    /// Wire up the HTTP clients and FFmpeg normalizer described by `config`.
    pub fn from_config(config: UploaderConfig, notifier: Arc<dyn Notifier>) -> UploadResult<Self> {
        let (store, commit) = create_clients(&config)?;
        let normalizer = Arc::new(MediaNormalizer::from_config(&config)?);
        Ok(Self::new(config, store, commit, normalizer, notifier))
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Validate the host's raw arguments and dispatch the batch.
    ///
    /// A bad `post_id`, `sas_token` or `files` fails here with nothing
    /// scheduled and no channel registered.
    pub async fn dispatch_wire(
        &self,
        post_id: &Value,
        sas_token: &Value,
        files: &Value,
    ) -> UploadResult<DispatchHandle> {
        let (request, rejected) = UploadRequest::from_wire(post_id, sas_token, files)?;
        Ok(self.dispatch(request, rejected).await)
    }

    #[tracing::instrument(
        skip_all,
        fields(post_id = %request.post_id, files = request.files.len(), rejected = rejected.len())
    )]
    pub async fn dispatch(
        &self,
        request: UploadRequest,
        rejected: Vec<DescriptorError>,
    ) -> DispatchHandle {
        let started_at = Utc::now();

        for err in &rejected {
            tracing::warn!(
                index = err.index,
                field = %err.field,
                reason = %err.reason,
                "Skipping malformed file descriptor"
            );
        }

        let notifications = Arc::new(ChannelGuard::new(
            self.notifier.clone(),
            ChannelDescriptor::from_config(&self.config),
        ));
        notifications.ensure_channel().await;
        let channel_registered = notifications.is_registered();

        let semaphore = self
            .config
            .concurrency_limit()
            .map(|limit| Arc::new(Semaphore::new(limit)));

        let UploadRequest {
            post_id,
            sas_token,
            files,
        } = request;

        let ctx = Arc::new(BatchContext {
            post_id: post_id.clone(),
            sas_token,
            store: self.store.clone(),
            commit: self.commit.clone(),
            normalizer: self.normalizer.clone(),
            notifications,
            notify_on_normalize_failure: self.config.notify_on_normalize_failure,
        });

        let mut tasks = Vec::with_capacity(files.len());
        for descriptor in files {
            let task_id = Uuid::new_v4();
            let scheduled = ScheduledFile {
                task_id,
                file_name: descriptor.file_name.clone(),
                original_name: descriptor.original_name.clone(),
                kind: descriptor.kind(),
            };
            let ctx = ctx.clone();
            let semaphore = semaphore.clone();

            let handle = tokio::spawn(async move {
                // Held for the whole task, so the cap bounds in-flight files.
                let _permit = match semaphore {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(e) => {
                            tracing::warn!(error = %e, "Upload semaphore closed, running unbounded");
                            None
                        }
                    },
                    None => None,
                };
                run_file(ctx, task_id, descriptor).await
            });

            tasks.push((scheduled, handle));
        }

        tracing::info!(scheduled = tasks.len(), channel_registered, "Batch dispatched");

        DispatchHandle {
            post_id,
            started_at,
            rejected,
            tasks,
        }
    }
}

/// What is known about a file before its task finishes.
struct ScheduledFile {
    task_id: Uuid,
    file_name: String,
    original_name: String,
    kind: MediaKind,
}

/// Handle to a dispatched batch.
pub struct DispatchHandle {
    post_id: String,
    started_at: DateTime<Utc>,
    rejected: Vec<DescriptorError>,
    tasks: Vec<(ScheduledFile, JoinHandle<FileReport>)>,
}

impl DispatchHandle {
    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// Number of file tasks spawned.
    pub fn scheduled(&self) -> usize {
        self.tasks.len()
    }

    pub fn rejected(&self) -> &[DescriptorError] {
        &self.rejected
    }

    /// Wait for every task and collect the report, in descriptor order.
    pub async fn wait(self) -> BatchReport {
        let (scheduled, handles): (Vec<_>, Vec<_>) = self.tasks.into_iter().unzip();
        let results = join_all(handles).await;

        let files = scheduled
            .into_iter()
            .zip(results)
            .map(|(file, result)| match result {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!(
                        file_name = %file.file_name,
                        error = %e,
                        "Upload task did not complete"
                    );
                    FileReport {
                        task_id: file.task_id,
                        file_name: file.file_name,
                        original_name: file.original_name,
                        kind: file.kind,
                        primary: FileStatus::UploadFailed {
                            reason: format!("task aborted: {}", e),
                        },
                        thumbnail: None,
                        finished_at: Utc::now(),
                    }
                }
            })
            .collect();

        BatchReport {
            post_id: self.post_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            rejected: self.rejected,
            files,
        }
    }
}
