//! Configuration module
//!
//! Uploader settings are read from the environment (and an optional `.env` file).
//! Every setting has a default so the bridge works with no configuration at all.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CHANNEL_DESCRIPTION, DEFAULT_CHANNEL_ID, DEFAULT_CHANNEL_NAME,
    DEFAULT_COMMIT_ENDPOINT, DEFAULT_MAX_CONCURRENT_UPLOADS, DEFAULT_STORAGE_BASE_URL,
};

const IMAGE_FORMATS: &[&str] = &["webp", "png"];
const IMAGE_QUALITIES: &[&str] = &["normal", "better", "best", "lighter", "lightest"];

/// Uploader configuration
#[derive(Clone, Debug)]
pub struct UploaderConfig {
    /// Blob store base; objects land at `{storage_base_url}/{file_name}`.
    /// Include the container segment here when the account needs one.
    pub storage_base_url: String,
    /// Backend endpoint that registers uploaded objects against a post.
    pub commit_endpoint: String,
    /// Maximum per-file tasks in flight for one batch. `0` = unbounded.
    pub max_concurrent_uploads: usize,
    /// Canonical still-image output: "webp" or "png".
    pub image_format: String,
    /// Quality preset name for lossy output.
    pub image_quality: String,
    pub ffmpeg_path: String,
    /// Directory for per-call video temp files. `None` = system temp dir.
    pub temp_dir: Option<PathBuf>,
    /// Optional HTTP timeout. `None` keeps the client default.
    pub http_timeout_secs: Option<u64>,
    /// Emit an "Upload Error" notification when a file cannot be decoded.
    pub notify_on_normalize_failure: bool,
    pub notification_channel_id: String,
    pub notification_channel_name: String,
    pub notification_channel_description: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            storage_base_url: DEFAULT_STORAGE_BASE_URL.to_string(),
            commit_endpoint: DEFAULT_COMMIT_ENDPOINT.to_string(),
            max_concurrent_uploads: DEFAULT_MAX_CONCURRENT_UPLOADS,
            image_format: "webp".to_string(),
            image_quality: "normal".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            temp_dir: None,
            http_timeout_secs: None,
            notify_on_normalize_failure: false,
            notification_channel_id: DEFAULT_CHANNEL_ID.to_string(),
            notification_channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            notification_channel_description: DEFAULT_CHANNEL_DESCRIPTION.to_string(),
        }
    }
}

impl UploaderConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            storage_base_url: env::var("UPLINK_STORAGE_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.storage_base_url),
            commit_endpoint: env::var("UPLINK_COMMIT_ENDPOINT")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.commit_endpoint),
            max_concurrent_uploads: env::var("UPLINK_MAX_CONCURRENT_UPLOADS")
                .unwrap_or_else(|_| DEFAULT_MAX_CONCURRENT_UPLOADS.to_string())
                .parse()
                .map_err(|_| {
                    anyhow::anyhow!("UPLINK_MAX_CONCURRENT_UPLOADS must be a non-negative number")
                })?,
            image_format: env::var("UPLINK_IMAGE_FORMAT")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or(defaults.image_format),
            image_quality: env::var("UPLINK_IMAGE_QUALITY")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or(defaults.image_quality),
            ffmpeg_path: env::var("UPLINK_FFMPEG_PATH").unwrap_or(defaults.ffmpeg_path),
            temp_dir: env::var("UPLINK_TEMP_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            http_timeout_secs: parse_timeout_secs(env::var("UPLINK_HTTP_TIMEOUT_SECS").ok())?,
            notify_on_normalize_failure: parse_flag(
                "UPLINK_NOTIFY_ON_NORMALIZE_FAILURE",
                env::var("UPLINK_NOTIFY_ON_NORMALIZE_FAILURE").ok(),
                defaults.notify_on_normalize_failure,
            )?,
            notification_channel_id: env::var("UPLINK_NOTIFICATION_CHANNEL_ID")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.notification_channel_id),
            notification_channel_name: defaults.notification_channel_name,
            notification_channel_description: defaults.notification_channel_description,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, url) in [
            ("UPLINK_STORAGE_BASE_URL", &self.storage_base_url),
            ("UPLINK_COMMIT_ENDPOINT", &self.commit_endpoint),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!(
                    "{} must be an http:// or https:// URL, got '{}'",
                    name,
                    url
                ));
            }
        }

        if !IMAGE_FORMATS.contains(&self.image_format.as_str()) {
            return Err(anyhow::anyhow!(
                "UPLINK_IMAGE_FORMAT must be one of {:?}, got '{}'",
                IMAGE_FORMATS,
                self.image_format
            ));
        }

        if !IMAGE_QUALITIES.contains(&self.image_quality.as_str()) {
            return Err(anyhow::anyhow!(
                "UPLINK_IMAGE_QUALITY must be one of {:?}, got '{}'",
                IMAGE_QUALITIES,
                self.image_quality
            ));
        }

        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if self.ffmpeg_path.is_empty()
            || self.ffmpeg_path.chars().any(|c| dangerous_chars.contains(&c))
        {
            return Err(anyhow::anyhow!(
                "UPLINK_FFMPEG_PATH is empty or contains dangerous characters"
            ));
        }

        if self.notification_channel_id.is_empty() {
            return Err(anyhow::anyhow!(
                "UPLINK_NOTIFICATION_CHANNEL_ID must not be empty"
            ));
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    /// Semaphore size for a batch, `None` when unbounded.
    pub fn concurrency_limit(&self) -> Option<usize> {
        (self.max_concurrent_uploads > 0).then_some(self.max_concurrent_uploads)
    }
}

/// Seconds, unset or `0` meaning "no explicit timeout".
fn parse_timeout_secs(raw: Option<String>) -> Result<Option<u64>, anyhow::Error> {
    let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let secs: u64 = raw.parse().map_err(|_| {
        anyhow::anyhow!(
            "UPLINK_HTTP_TIMEOUT_SECS must be a non-negative number of seconds, got '{}'",
            raw
        )
    })?;
    Ok((secs > 0).then_some(secs))
}

fn parse_flag(name: &str, raw: Option<String>, default: bool) -> Result<bool, anyhow::Error> {
    let Some(raw) = raw.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    match raw.as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "{} must be true or false, got '{}'",
            name,
            raw
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = UploaderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_concurrent_uploads, 4);
        assert_eq!(config.concurrency_limit(), Some(4));
        assert_eq!(config.image_format, "webp");
        assert!(config.http_timeout().is_none());
        assert!(!config.notify_on_normalize_failure);
    }

    #[test]
    fn test_zero_concurrency_is_unbounded() {
        let config = UploaderConfig {
            max_concurrent_uploads: 0,
            ..UploaderConfig::default()
        };
        assert_eq!(config.concurrency_limit(), None);
    }

    #[test]
    fn test_rejects_non_http_urls() {
        let config = UploaderConfig {
            storage_base_url: "ftp://example.com".to_string(),
            ..UploaderConfig::default()
        };
        assert!(config.validate().is_err());

        let config = UploaderConfig {
            commit_endpoint: "example.com/commit".to_string(),
            ..UploaderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_image_format() {
        let config = UploaderConfig {
            image_format: "avif".to_string(),
            ..UploaderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_dangerous_ffmpeg_path() {
        let config = UploaderConfig {
            ffmpeg_path: "ffmpeg; rm -rf /".to_string(),
            ..UploaderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(parse_timeout_secs(None).unwrap(), None);
        assert_eq!(parse_timeout_secs(Some(" ".into())).unwrap(), None);
        assert_eq!(parse_timeout_secs(Some("0".into())).unwrap(), None);
        assert_eq!(parse_timeout_secs(Some("30".into())).unwrap(), Some(30));
        assert!(parse_timeout_secs(Some("30s".into())).is_err());
        assert!(parse_timeout_secs(Some("-5".into())).is_err());
    }

    #[test]
    fn test_flag_parsing() {
        let name = "UPLINK_NOTIFY_ON_NORMALIZE_FAILURE";
        assert!(!parse_flag(name, None, false).unwrap());
        assert!(parse_flag(name, Some("1".into()), false).unwrap());
        assert!(parse_flag(name, Some("TRUE".into()), false).unwrap());
        assert!(!parse_flag(name, Some("off".into()), true).unwrap());

        let err = parse_flag(name, Some("maybe".into()), false).unwrap_err();
        assert!(err.to_string().contains(name));
    }
}
