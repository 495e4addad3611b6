#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uplink_core::UploaderConfig;
use uplink_infra::RecordingNotifier;
use uplink_processing::{
    FrameExtractor, ImageNormalizer, MediaNormalizer, OutputFormat, QualityPreset,
};
use uplink_storage::{BlobStore, CommitClient, StorageError, StorageResult};
use uplink_worker::Dispatcher;

pub const BLOB_BASE: &str = "https://blob.test/container";

#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub key: String,
    pub data: Bytes,
    pub sas_token: String,
}

/// Blob store that keeps every PUT in memory.
#[derive(Default)]
pub struct MemoryBlobStore {
    puts: Mutex<Vec<RecordedPut>>,
    failing_keys: Mutex<HashSet<String>>,
    fail_all: bool,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every PUT fails with a transport error.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn fail_key(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }

    pub fn put(&self, key: &str) -> Option<RecordedPut> {
        self.puts().into_iter().find(|p| p.key == key)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_blob(&self, key: &str, data: Bytes, sas_token: &str) -> StorageResult<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_all || self.failing_keys.lock().unwrap().contains(key) {
            return Err(StorageError::UploadFailed(format!(
                "PUT {} failed: connection refused",
                key
            )));
        }

        self.puts.lock().unwrap().push(RecordedPut {
            key: key.to_string(),
            data,
            sas_token: sas_token.to_string(),
        });
        self.object_url(key)
    }

    fn object_url(&self, key: &str) -> StorageResult<String> {
        Ok(format!("{}/{}", BLOB_BASE, key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
    pub post_id: String,
    pub remote_url: String,
    pub original_name: String,
    pub file_mime: String,
}

#[derive(Default)]
pub struct RecordingCommitClient {
    commits: Mutex<Vec<RecordedCommit>>,
    fail: bool,
}

impl RecordingCommitClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every commit fails, as a timed-out backend would.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.commits.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommitClient for RecordingCommitClient {
    async fn commit(
        &self,
        post_id: &str,
        remote_url: &str,
        original_name: &str,
        file_mime: &str,
    ) -> StorageResult<()> {
        if self.fail {
            return Err(StorageError::CommitFailed("operation timed out".to_string()));
        }
        self.commits.lock().unwrap().push(RecordedCommit {
            post_id: post_id.to_string(),
            remote_url: remote_url.to_string(),
            original_name: original_name.to_string(),
            file_mime: file_mime.to_string(),
        });
        Ok(())
    }
}

/// Extractor whose frame is a solid PNG coloured by the video's first three
/// bytes. The video goes through a per-call temp file like the FFmpeg one.
pub struct ColorFrameExtractor {
    pub delay: Duration,
}

impl Default for ColorFrameExtractor {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(20),
        }
    }
}

#[async_trait]
impl FrameExtractor for ColorFrameExtractor {
    async fn extract_frame(&self, video: &[u8], _timestamp_seconds: f64) -> anyhow::Result<Bytes> {
        let temp = tempfile::NamedTempFile::new()?;
        tokio::fs::write(temp.path(), video).await?;
        tokio::time::sleep(self.delay).await;
        let stored = tokio::fs::read(temp.path()).await?;
        if stored.len() < 3 {
            anyhow::bail!("video too short for a frame");
        }
        Ok(Bytes::from(fixtures::png([
            stored[0], stored[1], stored[2], 255,
        ])))
    }
}

/// Extractor for videos with no decodable stream.
pub struct BrokenFrameExtractor;

#[async_trait]
impl FrameExtractor for BrokenFrameExtractor {
    async fn extract_frame(&self, _video: &[u8], _timestamp_seconds: f64) -> anyhow::Result<Bytes> {
        anyhow::bail!("Invalid data found when processing input")
    }
}

pub struct TestHarness {
    pub dispatcher: Arc<Dispatcher>,
    pub store: Arc<MemoryBlobStore>,
    pub commit: Arc<RecordingCommitClient>,
    pub notifier: Arc<RecordingNotifier>,
}

pub struct HarnessBuilder {
    config: UploaderConfig,
    store: MemoryBlobStore,
    commit: RecordingCommitClient,
    extractor: Arc<dyn FrameExtractor>,
    format: OutputFormat,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            config: UploaderConfig::default(),
            store: MemoryBlobStore::new(),
            commit: RecordingCommitClient::new(),
            extractor: Arc::new(ColorFrameExtractor::default()),
            format: OutputFormat::WebP,
        }
    }
}

impl HarnessBuilder {
    pub fn config(mut self, config: UploaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: MemoryBlobStore) -> Self {
        self.store = store;
        self
    }

    pub fn commit(mut self, commit: RecordingCommitClient) -> Self {
        self.commit = commit;
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn FrameExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Lossless output so tests can compare pixels.
    pub fn png_output(mut self) -> Self {
        self.format = OutputFormat::Png;
        self
    }

    pub fn build(self) -> TestHarness {
        let store = Arc::new(self.store);
        let commit = Arc::new(self.commit);
        let notifier = Arc::new(RecordingNotifier::new());
        let normalizer = Arc::new(MediaNormalizer::new(
            ImageNormalizer::new(self.format, QualityPreset::Normal),
            self.extractor,
        ));
        let dispatcher = Arc::new(Dispatcher::new(
            self.config,
            store.clone(),
            commit.clone(),
            normalizer,
            notifier.clone(),
        ));

        TestHarness {
            dispatcher,
            store,
            commit,
            notifier,
        }
    }
}

pub fn harness() -> HarnessBuilder {
    HarnessBuilder::default()
}
