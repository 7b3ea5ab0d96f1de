//! Core blob storage manager for file operations
//!
//! This module provides the BlobManager struct: container lifecycle,
//! listing, read, write, delete and shared access signature issuance
//! for one container of an authenticated storage account.

use crate::blob::content_type::determine_content_type;
use crate::blob::models::*;
use crate::blob::path::list_prefix;
use crate::blob::store::BlobStore;
use crate::error::{BlobHelperError, Result};
use crate::utils::helpers::build_connection_string;
use crate::utils::sanitizer::validate_container_name;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Default lifetime of issued container tokens
pub const DEFAULT_SAS_VALIDITY_HOURS: i64 = 24;

/// Core blob storage manager
pub struct BlobManager {
    store: Arc<dyn BlobStore>,
    container_name: String,
    sas_validity: Duration,
}

impl BlobManager {
    /// Create a new BlobManager instance
    pub fn new(store: Arc<dyn BlobStore>, container_name: impl Into<String>) -> Self {
        Self {
            store,
            container_name: container_name.into(),
            sas_validity: Duration::hours(DEFAULT_SAS_VALIDITY_HOURS),
        }
    }

    /// Override how long issued tokens stay valid
    pub fn with_sas_validity(mut self, validity: Duration) -> Self {
        self.sas_validity = validity;
        self
    }

    /// Get the container name
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Create the container if it doesn't already exist
    pub async fn create_container(&self) -> Result<ContainerStatus> {
        validate_container_name(&self.container_name)?;

        if self.store.container_exists(&self.container_name).await? {
            debug!(container = %self.container_name, "container already exists");
            return Ok(ContainerStatus::AlreadyExists);
        }

        self.store.create_container(&self.container_name).await?;
        info!(container = %self.container_name, "created container");
        Ok(ContainerStatus::Created)
    }

    /// Delete the container if it exists
    pub async fn delete_container(&self) -> Result<ContainerStatus> {
        if !self.store.container_exists(&self.container_name).await? {
            return Ok(ContainerStatus::DidNotExist);
        }

        self.store.delete_container(&self.container_name).await?;
        info!(container = %self.container_name, "deleted container");
        Ok(ContainerStatus::Deleted)
    }

    pub async fn container_exists(&self) -> Result<bool> {
        self.store.container_exists(&self.container_name).await
    }

    /// List files under a directory, skipping virtual directory markers
    pub async fn list_directory(&self, directory: Option<&str>) -> Result<Vec<StorageItem>> {
        let prefix = list_prefix(directory);
        debug!(container = %self.container_name, prefix = ?prefix, "listing blobs");

        let entries = self.store.list_blobs(&self.container_name, prefix).await?;
        Ok(entries.into_iter().filter_map(StorageItem::from_entry).collect())
    }

    /// Download a blob and return its content base64-encoded
    pub async fn read_blob(&self, blob_name: &str) -> Result<String> {
        let content = self.store.download_blob(&self.container_name, blob_name).await?;
        debug!(blob = blob_name, bytes = content.len(), "downloaded blob");
        Ok(base64::engine::general_purpose::STANDARD.encode(content))
    }

    /// Create or overwrite a blob from base64 content
    pub async fn write_blob(&self, blob_name: &str, content_base64: &str) -> Result<String> {
        let content = base64::engine::general_purpose::STANDARD.decode(content_base64.trim())?;
        let content_type = determine_content_type(blob_name);

        self.store
            .upload_blob(&self.container_name, blob_name, content, content_type)
            .await?;

        Ok(format!("Created blob: {blob_name}"))
    }

    /// Attach custom metadata to an existing blob
    pub async fn set_metadata(&self, blob_name: &str, metadata: &HashMap<String, String>) -> Result<()> {
        self.store
            .set_blob_metadata(&self.container_name, blob_name, metadata)
            .await
    }

    /// Delete a blob and all of its snapshots
    pub async fn delete_blob(&self, blob_name: &str) -> Result<String> {
        self.store
            .delete_blob_with_snapshots(&self.container_name, blob_name)
            .await?;
        info!(container = %self.container_name, blob = blob_name, "deleted blob");
        Ok(format!("Deleted blob: {blob_name}"))
    }

    /// Policy for a read/list container token issued at `now`
    pub fn sas_policy(&self, now: DateTime<Utc>) -> SasPolicy {
        SasPolicy::read_list(now, self.sas_validity)
    }

    /// Issue a read/list token for the container
    pub async fn generate_sas_token(&self) -> Result<String> {
        if self.sas_validity <= Duration::zero() {
            return Err(BlobHelperError::config("SAS validity must be positive"));
        }
        let policy = self.sas_policy(Utc::now());
        self.store.container_sas(&self.container_name, &policy).await
    }

    /// Wrap a fresh container token in a connection string
    pub async fn generate_connection_string(&self) -> Result<String> {
        let token = self.generate_sas_token().await?;
        let endpoint = self.store.blob_endpoint();

        Ok(build_connection_string(&[
            ("DefaultEndpointsProtocol", "https"),
            ("BlobEndpoint", &endpoint),
            ("SharedAccessSignature", &token),
        ]))
    }
}
