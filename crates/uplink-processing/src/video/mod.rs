//! Video processing module
//!
//! Videos are uploaded as-is; the only processing is thumbnail extraction.

pub mod extractor;

pub use extractor::{FFmpegFrameExtractor, FrameExtractor};
