//! Uplink Media Processing Library
//!
//! Turns a descriptor's base64 payload into the bytes that get uploaded:
//! images are re-encoded to a canonical still format, videos pass through
//! unchanged and yield a thumbnail from their first frame.

pub mod compression;
pub mod image;
pub mod normalizer;
pub mod payload;
pub mod video;

// Re-export commonly used types
pub use compression::{ImageCompressor, OutputFormat, QualityPreset};
pub use crate::image::ImageNormalizer;
pub use normalizer::{MediaNormalizer, NormalizedMedia};
pub use payload::decode_payload;
pub use video::{FFmpegFrameExtractor, FrameExtractor};
