//! Storage backend abstraction
//!
//! Everything the blob manager needs from a storage service, expressed as a
//! trait so that request handling can run against any backend.

use crate::blob::models::{BlobEntry, SasPolicy};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for blob storage backends, scoped to one storage account
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Check whether a container exists
    async fn container_exists(&self, container: &str) -> Result<bool>;

    async fn create_container(&self, container: &str) -> Result<()>;

    async fn delete_container(&self, container: &str) -> Result<()>;

    /// List a single page of blobs, optionally restricted to a name prefix
    async fn list_blobs(&self, container: &str, prefix: Option<String>) -> Result<Vec<BlobEntry>>;

    /// Download the full content of a blob
    async fn download_blob(&self, container: &str, blob: &str) -> Result<Vec<u8>>;

    /// Upload a block blob, replacing any existing blob with the same name
    async fn upload_blob(
        &self,
        container: &str,
        blob: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// Replace the custom metadata of an existing blob
    async fn set_blob_metadata(
        &self,
        container: &str,
        blob: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<()>;

    /// Delete a blob together with all of its snapshots
    async fn delete_blob_with_snapshots(&self, container: &str, blob: &str) -> Result<()>;

    /// Sign a container-scoped shared access signature
    async fn container_sas(&self, container: &str, policy: &SasPolicy) -> Result<String>;

    /// Blob endpoint of the account, e.g. `https://acct.blob.core.windows.net`
    fn blob_endpoint(&self) -> String;
}
