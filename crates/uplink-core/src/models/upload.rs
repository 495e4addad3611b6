use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter, Result as FmtResult};
use validator::Validate;

use crate::error::{UploadError, UploadResult};

/// Processing branch selected from a descriptor's declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    /// Case-sensitive prefix match, no normalization: `"image/png"` is an image,
    /// `"Image/png"` is not.
    pub fn classify(mime_type: &str) -> Self {
        if mime_type.starts_with("image") {
            MediaKind::Image
        } else if mime_type.starts_with("video") {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Other => "other",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// One file of a batch, as sent by the host.
///
/// Wire shape: `{ filename, originalname, mimetype, binarydata, thumbnail }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FileDescriptor {
    /// Destination object key in the blob store
    #[serde(rename = "filename")]
    #[validate(length(min = 1, message = "filename must not be empty"))]
    pub file_name: String,
    /// Human-readable name, used in notifications and the commit payload
    #[serde(rename = "originalname")]
    pub original_name: String,
    #[serde(rename = "mimetype")]
    #[validate(length(min = 1, message = "mimetype must not be empty"))]
    pub mime_type: String,
    /// Base64-encoded payload
    #[serde(rename = "binarydata")]
    pub binary_data: String,
    /// Destination key for the derived thumbnail (videos only)
    #[serde(rename = "thumbnail")]
    pub thumbnail_name: String,
}

/// Fields every wire descriptor must carry as strings.
const REQUIRED_FIELDS: [&str; 5] = [
    "filename",
    "originalname",
    "mimetype",
    "binarydata",
    "thumbnail",
];

/// Why a single descriptor was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorError {
    pub index: usize,
    pub field: String,
    pub reason: String,
}

impl DescriptorError {
    fn new(index: usize, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl FileDescriptor {
    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(&self.mime_type)
    }

    /// Convert one untyped wire object, checking required fields explicitly.
    pub fn from_wire(index: usize, value: &Value) -> Result<Self, DescriptorError> {
        let object = value
            .as_object()
            .ok_or_else(|| DescriptorError::new(index, "<descriptor>", "expected a JSON object"))?;

        for field in REQUIRED_FIELDS {
            match object.get(field) {
                None | Some(Value::Null) => {
                    return Err(DescriptorError::new(index, field, "missing"));
                }
                Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(DescriptorError::new(index, field, "expected a string"));
                }
            }
        }

        let descriptor: FileDescriptor = serde_json::from_value(value.clone())
            .map_err(|e| DescriptorError::new(index, "<descriptor>", e.to_string()))?;

        descriptor.validate().map_err(|errors| {
            let (field, reason) = errors
                .field_errors()
                .into_iter()
                .next()
                .map(|(field, errs)| {
                    let reason = errs
                        .first()
                        .and_then(|e| e.message.as_ref())
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "invalid".to_string());
                    (wire_name(&field).to_string(), reason)
                })
                .unwrap_or_else(|| ("<descriptor>".to_string(), errors.to_string()));
            DescriptorError::new(index, field, reason)
        })?;

        Ok(descriptor)
    }
}

/// A batch submitted by one host call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub post_id: String,
    pub sas_token: String,
    pub files: Vec<FileDescriptor>,
}

impl UploadRequest {
    /// Build a request from the host's positional arguments.
    ///
    /// A bad `post_id`, `sas_token` or non-array `files` fails the whole call.
    /// Individual descriptors that fail validation are returned alongside the
    /// request instead.
    pub fn from_wire(
        post_id: &Value,
        sas_token: &Value,
        files: &Value,
    ) -> UploadResult<(Self, Vec<DescriptorError>)> {
        let post_id = non_empty_string(post_id, "postId")?;
        let sas_token = non_empty_string(sas_token, "sasToken")?;
        let entries = files
            .as_array()
            .ok_or_else(|| UploadError::InvalidRequest("files must be an array".to_string()))?;

        let mut accepted = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match FileDescriptor::from_wire(index, entry) {
                Ok(descriptor) => accepted.push(descriptor),
                Err(err) => rejected.push(err),
            }
        }

        Ok((
            Self {
                post_id,
                sas_token,
                files: accepted,
            },
            rejected,
        ))
    }

    /// Build a request from an argument array `[postId, sasToken, files]`.
    pub fn from_args(args: &Value) -> UploadResult<(Self, Vec<DescriptorError>)> {
        let args = args
            .as_array()
            .ok_or_else(|| UploadError::InvalidRequest("arguments must be an array".to_string()))?;
        if args.len() < 3 {
            return Err(UploadError::InvalidRequest(format!(
                "expected 3 arguments [postId, sasToken, files], got {}",
                args.len()
            )));
        }
        Self::from_wire(&args[0], &args[1], &args[2])
    }
}

/// Map a struct field name back to its wire name.
fn wire_name(field: &str) -> &str {
    match field {
        "file_name" => "filename",
        "original_name" => "originalname",
        "mime_type" => "mimetype",
        "binary_data" => "binarydata",
        "thumbnail_name" => "thumbnail",
        other => other,
    }
}

fn non_empty_string(value: &Value, name: &str) -> UploadResult<String> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        Some(_) => Err(UploadError::InvalidRequest(format!(
            "{} must not be empty",
            name
        ))),
        None => Err(UploadError::InvalidRequest(format!(
            "{} must be a string",
            name
        ))),
    }
}
