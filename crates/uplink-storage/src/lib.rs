//! Uplink Storage Library
//!
//! This crate provides the blob store abstraction and the backend commit client.
//!
//! # Object URL format
//!
//! Every object lives at `{storage_base}/{key}`. Writes go to the same URL with the
//! caller's pre-signed token appended as the query string:
//! `{storage_base}/{key}?{sas_token}`. URL building is centralized in the `keys`
//! module so the PUT target and the committed URL never drift apart.

pub mod commit;
pub mod factory;
pub(crate) mod keys;
pub mod sas;
pub mod traits;

// Re-export commonly used types
pub use commit::{CommitPayload, HttpCommitClient};
pub use factory::{build_http_client, create_clients};
pub use sas::SasBlobStore;
pub use traits::{BlobStore, CommitClient, StorageError, StorageResult};
