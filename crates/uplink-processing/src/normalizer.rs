//! Per-kind normalization of decoded payloads.

use crate::compression::{OutputFormat, QualityPreset};
use crate::image::ImageNormalizer;
use crate::payload::decode_payload;
use crate::video::{FFmpegFrameExtractor, FrameExtractor};
use bytes::Bytes;
use std::sync::Arc;
use uplink_core::constants::THUMBNAIL_TIMESTAMP_SECS;
use uplink_core::{FileDescriptor, MediaKind, UploadError, UploadResult, UploaderConfig};

/// Bytes ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMedia {
    pub kind: MediaKind,
    pub payload: Bytes,
    /// Still frame for videos, already in the canonical image format.
    /// `None` for other kinds or when extraction failed.
    pub thumbnail: Option<Bytes>,
}

pub struct MediaNormalizer {
    image: ImageNormalizer,
    extractor: Arc<dyn FrameExtractor>,
}

impl MediaNormalizer {
    pub fn new(image: ImageNormalizer, extractor: Arc<dyn FrameExtractor>) -> Self {
        Self { image, extractor }
    }

    /// Build from configuration, using FFmpeg for thumbnails.
    pub fn from_config(config: &UploaderConfig) -> UploadResult<Self> {
        let format = OutputFormat::parse(&config.image_format)
            .map_err(|e| UploadError::Config(e.to_string()))?;
        let quality = QualityPreset::parse(&config.image_quality)
            .map_err(|e| UploadError::Config(e.to_string()))?;
        let mut extractor = FFmpegFrameExtractor::new(config.ffmpeg_path.clone())
            .map_err(|e| UploadError::Config(e.to_string()))?;
        if let Some(dir) = &config.temp_dir {
            extractor = extractor.with_temp_dir(dir.clone());
        }

        Ok(Self::new(
            ImageNormalizer::new(format, quality),
            Arc::new(extractor),
        ))
    }

    /// Decode a descriptor's payload and run the branch its MIME type selects.
    #[tracing::instrument(skip(self, descriptor), fields(file_name = %descriptor.file_name, kind = %descriptor.kind()))]
    pub async fn normalize(&self, descriptor: &FileDescriptor) -> UploadResult<NormalizedMedia> {
        let raw = decode_payload(&descriptor.binary_data)?;
        match descriptor.kind() {
            MediaKind::Image => self.normalize_image(raw).await,
            MediaKind::Video => {
                let want_thumbnail = !descriptor.thumbnail_name.is_empty();
                Ok(self.normalize_video(raw, want_thumbnail).await)
            }
            MediaKind::Other => Ok(self.normalize_other(raw)),
        }
    }

    pub async fn normalize_image(&self, raw: Vec<u8>) -> UploadResult<NormalizedMedia> {
        let payload = self.image.normalize(Bytes::from(raw)).await?;
        Ok(NormalizedMedia {
            kind: MediaKind::Image,
            payload,
            thumbnail: None,
        })
    }

    /// The video itself is never transcoded. A failed thumbnail is logged and
    /// leaves `thumbnail` empty. Without `want_thumbnail` no frame is extracted.
    pub async fn normalize_video(&self, raw: Vec<u8>, want_thumbnail: bool) -> NormalizedMedia {
        let payload = Bytes::from(raw);
        let thumbnail = if want_thumbnail {
            self.thumbnail(&payload).await
        } else {
            None
        };
        NormalizedMedia {
            kind: MediaKind::Video,
            payload,
            thumbnail,
        }
    }

    pub fn normalize_other(&self, raw: Vec<u8>) -> NormalizedMedia {
        NormalizedMedia {
            kind: MediaKind::Other,
            payload: Bytes::from(raw),
            thumbnail: None,
        }
    }

    async fn thumbnail(&self, video: &[u8]) -> Option<Bytes> {
        let frame = match self
            .extractor
            .extract_frame(video, THUMBNAIL_TIMESTAMP_SECS)
            .await
        {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "Thumbnail extraction failed");
                return None;
            }
        };

        match self.image.normalize(frame).await {
            Ok(still) => Some(still),
            Err(e) => {
                tracing::warn!(error = %e, "Extracted frame could not be re-encoded");
                None
            }
        }
    }
}
