//! Base64 payload decoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use uplink_core::{UploadError, UploadResult};

/// Decode a descriptor's `binarydata` field.
///
/// Accepts standard base64 with padding. Line breaks and other ASCII
/// whitespace anywhere in the input are ignored, and a leading
/// `data:<mime>;base64,` prefix is stripped.
pub fn decode_payload(encoded: &str) -> UploadResult<Vec<u8>> {
    let body = strip_data_url_prefix(encoded.trim_start());

    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| UploadError::Decode(format!("Invalid base64 payload: {}", e)))
}

fn strip_data_url_prefix(input: &str) -> &str {
    if !input.starts_with("data:") {
        return input;
    }
    match input.find(";base64,") {
        Some(pos) => &input[pos + ";base64,".len()..],
        None => input,
    }
}
