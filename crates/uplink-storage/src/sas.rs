use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use uplink_core::constants::BLOB_CONTENT_TYPE;

use crate::keys;
use crate::traits::{BlobStore, StorageError, StorageResult};

/// Blob store client that writes through SAS-signed PUT URLs.
#[derive(Clone, Debug)]
pub struct SasBlobStore {
    client: Client,
    base_url: String,
}

impl SasBlobStore {
    /// Create a new SasBlobStore
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `base_url` - Container URL (e.g., "https://account.blob.core.windows.net/container")
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BlobStore for SasBlobStore {
    #[tracing::instrument(skip(self, data, sas_token), fields(size_bytes = data.len()))]
    async fn put_blob(&self, key: &str, data: Bytes, sas_token: &str) -> StorageResult<String> {
        let upload_url = keys::upload_url(&self.base_url, key, sas_token)?;
        let object_url = keys::object_url(&self.base_url, key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let response = self
            .client
            .put(&upload_url)
            .header(CONTENT_TYPE, BLOB_CONTENT_TYPE)
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("PUT {} failed: {}", key, e)))?;

        // Status is not inspected: any response counts as delivered.
        tracing::info!(
            key = %key,
            status = response.status().as_u16(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob upload finished"
        );

        Ok(object_url)
    }

    fn object_url(&self, key: &str) -> StorageResult<String> {
        keys::object_url(&self.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_put_blob_sends_octet_stream_to_signed_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/container/posts/1/photo.webp")
            .match_query(Matcher::Exact("sv=1&sig=abc".to_string()))
            .match_header("content-type", "application/octet-stream")
            .match_body(Matcher::Exact("payload".to_string()))
            .with_status(201)
            .create_async()
            .await;

        let store = SasBlobStore::new(Client::new(), format!("{}/container", server.url()));
        let url = store
            .put_blob("posts/1/photo.webp", Bytes::from_static(b"payload"), "sv=1&sig=abc")
            .await
            .unwrap();

        assert_eq!(url, format!("{}/container/posts/1/photo.webp", server.url()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_blob_ignores_http_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/a.bin")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("AuthenticationFailed")
            .create_async()
            .await;

        let store = SasBlobStore::new(Client::new(), server.url());
        let result = store
            .put_blob("a.bin", Bytes::from_static(b"x"), "sig=expired")
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_blob_transport_failure() {
        // Nothing listens on port 9 of the loopback interface.
        let store = SasBlobStore::new(Client::new(), "http://127.0.0.1:9");
        let result = store
            .put_blob("a.bin", Bytes::from_static(b"x"), "sig=1")
            .await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
    }

    #[tokio::test]
    async fn test_put_blob_rejects_bad_key_without_request() {
        let store = SasBlobStore::new(Client::new(), "http://127.0.0.1:9");
        let result = store
            .put_blob("../escape", Bytes::from_static(b"x"), "sig=1")
            .await;

        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
