use anyhow::{anyhow, Result};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// libwebp rejects anything wider or taller than this.
pub const WEBP_MAX_DIMENSION: u32 = 16383;

/// Quality presets for lossy image output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    #[default]
    Normal, // WebP 80, what mobile uploads have always used
    Better,
    Best,
    Lighter,
    Lightest,
}

impl QualityPreset {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(QualityPreset::Normal),
            "better" => Ok(QualityPreset::Better),
            "best" => Ok(QualityPreset::Best),
            "lighter" => Ok(QualityPreset::Lighter),
            "lightest" => Ok(QualityPreset::Lightest),
            _ => Err(anyhow!("Invalid quality preset: {}", s)),
        }
    }

    /// Get quality value for WebP (0-100)
    pub fn webp_quality(self) -> f32 {
        match self {
            QualityPreset::Normal => 80.0,
            QualityPreset::Better => 90.0,
            QualityPreset::Best => 98.0,
            QualityPreset::Lighter => 70.0,
            QualityPreset::Lightest => 55.0,
        }
    }
}

/// Canonical still-image output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Png,
    #[default]
    WebP,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(anyhow!("Invalid format: {}", s)),
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }
}

/// Still-image encoder
pub struct ImageCompressor;

impl ImageCompressor {
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: QualityPreset,
    ) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(anyhow!("Cannot encode an empty image"));
        }

        match format {
            OutputFormat::Png => Self::compress_png(img),
            OutputFormat::WebP => Self::compress_webp(img, quality),
        }
    }

    /// Compress to PNG
    fn compress_png(img: &DynamicImage) -> Result<Bytes> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        img.write_to(&mut cursor, ImageFormat::Png)?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to lossy WebP
    fn compress_webp(img: &DynamicImage, quality: QualityPreset) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        // `Encoder::encode` panics on dimensions libwebp refuses.
        if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
            return Err(anyhow!(
                "{}x{} exceeds the WebP limit of {}px",
                width,
                height,
                WEBP_MAX_DIMENSION
            ));
        }

        // Convert to RGBA for WebP encoding
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality.webp_quality());

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}
