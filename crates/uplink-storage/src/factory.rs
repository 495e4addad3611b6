use crate::{BlobStore, CommitClient, HttpCommitClient, SasBlobStore, StorageError, StorageResult};
use reqwest::Client;
use std::sync::Arc;
use uplink_core::UploaderConfig;

/// Build the HTTP client shared by the blob store and the commit client.
pub fn build_http_client(config: &UploaderConfig) -> StorageResult<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.http_timeout() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Create the blob store and commit client based on configuration
pub fn create_clients(
    config: &UploaderConfig,
) -> StorageResult<(Arc<dyn BlobStore>, Arc<dyn CommitClient>)> {
    let client = build_http_client(config)?;

    let store = SasBlobStore::new(client.clone(), config.storage_base_url.clone());
    let commit = HttpCommitClient::new(client, config.commit_endpoint.clone());

    tracing::debug!(
        storage_base_url = %store.base_url(),
        commit_endpoint = %commit.endpoint(),
        "Storage clients created"
    );

    Ok((Arc::new(store), Arc::new(commit)))
}
