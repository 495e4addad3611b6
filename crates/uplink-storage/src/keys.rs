//! Shared URL building for blob objects.
//!
//! Object URL: `{base}/{key}`. Upload URL: `{base}/{key}?{token}`.

use crate::traits::{StorageError, StorageResult};

/// Check that a key stays inside the container and cannot rewrite the query.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key must not start with '/': {}",
            key
        )));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains a '..' segment: {}",
            key
        )));
    }
    if key.contains('?') || key.contains('#') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains a query or fragment delimiter: {}",
            key
        )));
    }
    Ok(())
}

/// Public URL of an object.
pub fn object_url(base: &str, key: &str) -> StorageResult<String> {
    validate_key(key)?;
    Ok(format!("{}/{}", base.trim_end_matches('/'), key))
}

/// Pre-signed upload URL. The token is appended verbatim; a leading `?` from
/// a copy-pasted SAS string is dropped.
pub fn upload_url(base: &str, key: &str, sas_token: &str) -> StorageResult<String> {
    let url = object_url(base, key)?;
    let token = sas_token.strip_prefix('?').unwrap_or(sas_token);
    Ok(format!("{}?{}", url, token))
}
