//! Image processing module
//!
//! Decodes whatever still format the host sent and re-encodes it to the
//! configured canonical format.

pub mod processor;

pub use processor::ImageNormalizer;
