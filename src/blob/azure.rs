//! Azure Blob Storage backend
//!
//! Implements [`BlobStore`] on top of the `azure_storage_blobs` SDK using
//! shared-key credentials for a single storage account.

use crate::blob::models::{BlobEntry, SasPolicy, SasTransport};
use crate::blob::store::BlobStore;
use crate::error::{BlobHelperError, Result};
use crate::utils::helpers::{get_blob_endpoint, to_utc, DEFAULT_STORAGE_DOMAIN};
use async_trait::async_trait;
use azure_core::request_options::Metadata;
use azure_storage::prelude::BlobSasPermissions;
use azure_storage::shared_access_signature::{SasProtocol, SasToken};
use azure_storage::{CloudLocation, StorageCredentials};
use azure_storage_blobs::prelude::*;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use std::collections::HashMap;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Blob store backed by an Azure storage account
pub struct AzureBlobStore {
    account_name: String,
    storage_domain: String,
    blob_service: BlobServiceClient,
}

impl AzureBlobStore {
    /// Create a client for `https://{account}.{storage_domain}` with a shared key
    pub fn new(account_name: &str, account_key: &str, storage_domain: &str) -> Self {
        let credentials = StorageCredentials::access_key(account_name.to_string(), account_key.to_string());

        let builder = if storage_domain.trim_matches('.') == DEFAULT_STORAGE_DOMAIN {
            ClientBuilder::new(account_name.to_string(), credentials)
        } else {
            let location = CloudLocation::Custom {
                account: account_name.to_string(),
                uri: get_blob_endpoint(account_name, storage_domain),
            };
            ClientBuilder::with_location(location, credentials)
        };

        Self {
            account_name: account_name.to_string(),
            storage_domain: storage_domain.to_string(),
            blob_service: builder.blob_service_client(),
        }
    }

    /// Get the storage account name
    pub fn account_name(&self) -> &str {
        &self.account_name
    }
}

fn to_offset_datetime(dt: DateTime<Utc>) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(dt.timestamp())
        .map_err(|e| BlobHelperError::invalid_argument(format!("Timestamp out of range: {e}")))
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn container_exists(&self, container: &str) -> Result<bool> {
        let container_client = self.blob_service.container_client(container);
        container_client
            .exists()
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to check container: {e}")))
    }

    async fn create_container(&self, container: &str) -> Result<()> {
        let container_client = self.blob_service.container_client(container);
        container_client
            .create()
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to create container: {e}")))?;
        Ok(())
    }

    async fn delete_container(&self, container: &str) -> Result<()> {
        let container_client = self.blob_service.container_client(container);
        container_client
            .delete()
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to delete container: {e}")))?;
        Ok(())
    }

    async fn list_blobs(&self, container: &str, prefix: Option<String>) -> Result<Vec<BlobEntry>> {
        let container_client = self.blob_service.container_client(container);

        let mut list_builder = container_client
            .list_blobs()
            .include_metadata(true)
            .include_snapshots(true);
        if let Some(prefix) = prefix {
            list_builder = list_builder.prefix(prefix);
        }

        // One page only; the service caps a page at 5000 entries
        let mut stream = list_builder.into_stream();
        let Some(page) = stream
            .try_next()
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to list blobs: {e}")))?
        else {
            return Ok(Vec::new());
        };

        let entries = page
            .blobs
            .blobs()
            .map(|blob_item| BlobEntry {
                name: blob_item.name.clone(),
                content_length: Some(blob_item.properties.content_length),
                created_on: to_utc(blob_item.properties.creation_time),
                last_modified: to_utc(blob_item.properties.last_modified),
                content_type: Some(blob_item.properties.content_type.clone())
                    .filter(|ct| !ct.is_empty()),
                metadata: blob_item.metadata.clone().unwrap_or_default(),
            })
            .collect::<Vec<_>>();

        debug!(container, count = entries.len(), "listed blob page");
        Ok(entries)
    }

    async fn download_blob(&self, container: &str, blob: &str) -> Result<Vec<u8>> {
        let blob_client = self.blob_service.container_client(container).blob_client(blob);

        let properties = blob_client
            .get_properties()
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to get blob properties: {e}")))?;

        // get_content() fails with 416 Range Not Satisfiable for 0-byte blobs
        if properties.blob.properties.content_length == 0 {
            return Ok(Vec::new());
        }

        blob_client
            .get_content()
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to download blob: {e}")))
    }

    async fn upload_blob(
        &self,
        container: &str,
        blob: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let blob_client = self.blob_service.container_client(container).blob_client(blob);
        let content_length = content.len();

        blob_client
            .put_block_blob(content)
            .content_type(content_type.to_string())
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to upload blob: {e}")))?;

        info!(container, blob, content_length, content_type, "uploaded blob");
        Ok(())
    }

    async fn set_blob_metadata(
        &self,
        container: &str,
        blob: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<()> {
        let blob_client = self.blob_service.container_client(container).blob_client(blob);

        let mut azure_metadata = Metadata::new();
        for (key, value) in metadata {
            azure_metadata.insert(key.clone(), value.clone());
        }

        blob_client
            .set_metadata()
            .metadata(azure_metadata)
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to set blob metadata: {e}")))?;
        Ok(())
    }

    async fn delete_blob_with_snapshots(&self, container: &str, blob: &str) -> Result<()> {
        let blob_client = self.blob_service.container_client(container).blob_client(blob);

        blob_client
            .delete()
            .delete_snapshots_method(DeleteSnapshotsMethod::Include)
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to delete blob: {e}")))?;
        Ok(())
    }

    async fn container_sas(&self, container: &str, policy: &SasPolicy) -> Result<String> {
        let container_client = self.blob_service.container_client(container);

        let permissions = BlobSasPermissions {
            read: policy.permissions.read,
            add: policy.permissions.add,
            create: policy.permissions.create,
            write: policy.permissions.write,
            delete: policy.permissions.delete,
            list: policy.permissions.list,
            ..Default::default()
        };
        let protocol = match policy.transport {
            SasTransport::HttpsOnly => SasProtocol::Https,
            SasTransport::HttpsAndHttp => SasProtocol::HttpHttps,
        };

        let signature = container_client
            .shared_access_signature(permissions, to_offset_datetime(policy.expires_on)?)
            .await
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to sign SAS token: {e}")))?
            .start(to_offset_datetime(policy.starts_on)?)
            .protocol(protocol);

        let token = signature
            .token()
            .map_err(|e| BlobHelperError::azure_api(format!("Failed to encode SAS token: {e}")))?;

        debug!(
            container,
            permissions = %policy.permissions,
            validity_hours = policy.validity().num_hours(),
            "signed container SAS"
        );
        Ok(token)
    }

    fn blob_endpoint(&self) -> String {
        get_blob_endpoint(&self.account_name, &self.storage_domain)
    }
}
