//! Object storage for uploaded preview images.
//!
//! The preview handler only ever performs a single write per request, so the
//! abstraction is a put-only [`ObjectStore`]. Production deployments use
//! [`S3ObjectStore`] against any S3-compatible endpoint; tests swap in
//! [`InMemoryObjectStore`].

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod s3;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::{InMemoryObjectStore, StoredObject};
pub use s3::S3ObjectStore;

/// Content type attached to every stored preview. No sniffing or transcoding is done.
pub const PREVIEW_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Error, Debug)]
pub enum StorageError {
    /// Access key id or secret access key were not configured
    #[error("Object storage credentials are not configured")]
    MissingCredentials,

    /// The backend rejected or failed the write
    #[error("Failed to store object {key}: {source}")]
    Put {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A write-once blob store addressed by key.
///
/// Implementations make exactly one attempt per call; retries are left to the caller.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `body` under `key`, replacing any existing object with the same key.
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError>;
}
