//! Image normalizer - decode and re-encode

use crate::compression::{ImageCompressor, OutputFormat, QualityPreset};
use bytes::Bytes;
use image::{GenericImageView, ImageReader};
use std::io::Cursor;
use uplink_core::{UploadError, UploadResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer {
    format: OutputFormat,
    quality: QualityPreset,
}

impl ImageNormalizer {
    pub fn new(format: OutputFormat, quality: QualityPreset) -> Self {
        Self { format, quality }
    }

    /// Decode `data` (format guessed from content) and encode it to the
    /// canonical output. Runs on the calling thread.
    pub fn normalize_blocking(&self, data: &[u8]) -> UploadResult<Bytes> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| UploadError::ImageProcessing(format!("Failed to read image: {}", e)))?;
        let img = reader
            .decode()
            .map_err(|e| UploadError::ImageProcessing(format!("Failed to decode image: {}", e)))?;

        let (width, height) = img.dimensions();
        let encoded = ImageCompressor::compress(&img, self.format, self.quality)
            .map_err(|e| UploadError::ImageProcessing(format!("Failed to encode image: {}", e)))?;

        tracing::debug!(
            width,
            height,
            input_bytes = data.len(),
            output_bytes = encoded.len(),
            format = self.format.to_mime_type(),
            "Image normalized"
        );

        Ok(encoded)
    }

    /// Same as [`normalize_blocking`](Self::normalize_blocking), off the async pool.
    pub async fn normalize(&self, data: Bytes) -> UploadResult<Bytes> {
        let normalizer = *self;
        // Image decode is CPU-bound; run off the async pool to avoid blocking other tasks.
        tokio::task::spawn_blocking(move || normalizer.normalize_blocking(&data))
            .await
            .map_err(|e| UploadError::Internal(format!("Image task failed: {}", e)))?
    }
}
