//! Helpers for the `uplink` binary.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::path::Path;

/// MIME type for a local file, from its extension.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Object key for `path` under `prefix` (a trailing `/` is added if missing).
pub fn object_key(prefix: &str, file_name: &str) -> String {
    if prefix.is_empty() {
        file_name.to_string()
    } else if prefix.ends_with('/') {
        format!("{}{}", prefix, file_name)
    } else {
        format!("{}/{}", prefix, file_name)
    }
}

/// Build one wire descriptor from a local file.
///
/// Videos get a `{stem}_thumb.webp` thumbnail key next to the video.
pub fn encode_file(path: &Path, prefix: &str) -> anyhow::Result<Value> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Not a valid file name: {}", path.display()))?;
    let mime = guess_mime(path);

    let thumbnail = if mime.starts_with("video") {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        object_key(prefix, &format!("{}_thumb.webp", stem))
    } else {
        String::new()
    };

    Ok(json!({
        "filename": object_key(prefix, file_name),
        "originalname": file_name,
        "mimetype": mime,
        "binarydata": STANDARD.encode(&data),
        "thumbnail": thumbnail,
    }))
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    if let Err(e) = uplink_infra::init_telemetry("uplink-cli") {
        eprintln!("Failed to initialize tracing: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("a.png")), "image/png");
        assert_eq!(guess_mime(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("", "a.png"), "a.png");
        assert_eq!(object_key("posts/1", "a.png"), "posts/1/a.png");
        assert_eq!(object_key("posts/1/", "a.png"), "posts/1/a.png");
    }

    #[test]
    fn test_encode_file_video_gets_thumbnail_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"hello")
            .unwrap();

        let value = encode_file(&path, "posts/7").unwrap();
        assert_eq!(value["filename"], "posts/7/clip.mp4");
        assert_eq!(value["originalname"], "clip.mp4");
        assert_eq!(value["mimetype"], "video/mp4");
        assert_eq!(value["binarydata"], "aGVsbG8=");
        assert_eq!(value["thumbnail"], "posts/7/clip_thumb.webp");
    }

    #[test]
    fn test_encode_file_missing() {
        assert!(encode_file(Path::new("/nonexistent/uplink.png"), "").is_err());
    }
}
