//! Frame extraction for video thumbnails

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Produces a still frame from raw video bytes.
///
/// The returned bytes are in any format the image decoder can read; callers
/// re-encode them to the canonical still format.
#[async_trait]
pub trait FrameExtractor: Send + Sync {
    async fn extract_frame(&self, video: &[u8], timestamp_seconds: f64) -> Result<Bytes>;
}

/// FFmpeg-backed extractor.
///
/// Each call gets its own input and output temp files, removed when the call
/// returns on every path.
pub struct FFmpegFrameExtractor {
    ffmpeg_path: String,
    temp_dir: Option<PathBuf>,
}

impl FFmpegFrameExtractor {
    pub fn new(ffmpeg_path: String) -> Result<Self> {
        // Validate ffmpeg_path
        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if ffmpeg_path.is_empty() || ffmpeg_path.chars().any(|c| dangerous_chars.contains(&c)) {
            return Err(anyhow!(
                "Invalid ffmpeg_path: empty or contains dangerous characters"
            ));
        }

        Ok(Self {
            ffmpeg_path,
            temp_dir: None,
        })
    }

    /// Create temp files under `dir` instead of the system temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    fn temp_file(&self, prefix: &str, suffix: &str) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix).suffix(suffix);
        match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }

    async fn run_ffmpeg(&self, input_path: &Path, output_path: &Path, timestamp: f64) -> Result<()> {
        let args = vec![
            "-ss".to_string(),
            timestamp.to_string(),
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-vframes".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ];

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("FFmpeg thumbnail extraction failed: {}", stderr));
        }

        Ok(())
    }
}

#[async_trait]
impl FrameExtractor for FFmpegFrameExtractor {
    async fn extract_frame(&self, video: &[u8], timestamp_seconds: f64) -> Result<Bytes> {
        let input_temp = self
            .temp_file("uplink-video-", "")
            .context("Failed to create video temp file")?;
        tokio::fs::write(input_temp.path(), video)
            .await
            .context("Failed to write video temp file")?;

        // The extension selects ffmpeg's output muxer.
        let output_temp = self
            .temp_file("uplink-frame-", ".jpg")
            .context("Failed to create frame temp file")?;

        self.run_ffmpeg(input_temp.path(), output_temp.path(), timestamp_seconds)
            .await?;

        let frame = tokio::fs::read(output_temp.path())
            .await
            .context("Failed to read extracted frame")?;
        if frame.is_empty() {
            return Err(anyhow!("FFmpeg produced an empty frame"));
        }

        Ok(Bytes::from(frame))
    }
}
