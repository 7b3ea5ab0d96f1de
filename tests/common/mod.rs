//! Shared test fixtures: an in-memory blob store and connectors around it

#![allow(dead_code)]

use async_trait::async_trait;
use blobhelper::auth::{AccountCredentials, StorageConnector};
use blobhelper::blob::{BlobEntry, BlobStore, SasPolicy};
use blobhelper::config::GuidanceConfig;
use blobhelper::dispatch::Dispatcher;
use blobhelper::error::{BlobHelperError, Result};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub content: Vec<u8>,
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

/// Blob store that keeps everything in memory and counts backend calls
#[derive(Default)]
pub struct MemoryBlobStore {
    containers: Mutex<HashMap<String, BTreeMap<String, StoredBlob>>>,
    sas_policies: Mutex<Vec<SasPolicy>>,
    fail_metadata: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_container(container: &str) -> Arc<Self> {
        let store = Self::default();
        store
            .containers
            .lock()
            .unwrap()
            .insert(container.to_string(), BTreeMap::new());
        Arc::new(store)
    }

    /// Seed a blob directly, bypassing call accounting
    pub fn put(&self, container: &str, name: &str, content: &[u8]) {
        self.containers
            .lock()
            .unwrap()
            .entry(container.to_string())
            .or_default()
            .insert(
                name.to_string(),
                StoredBlob {
                    content: content.to_vec(),
                    content_type: "application/octet-stream".to_string(),
                    metadata: HashMap::new(),
                },
            );
    }

    pub fn blob(&self, container: &str, name: &str) -> Option<StoredBlob> {
        self.containers
            .lock()
            .unwrap()
            .get(container)
            .and_then(|blobs| blobs.get(name).cloned())
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.containers.lock().unwrap().contains_key(container)
    }

    pub fn fail_metadata(&self) {
        self.fail_metadata.store(true, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sas_policies(&self) -> Vec<SasPolicy> {
        self.sas_policies.lock().unwrap().clone()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn container_not_found(container: &str) -> BlobHelperError {
        BlobHelperError::azure_api(format!("The specified container does not exist: {container}"))
    }

    fn blob_not_found(blob: &str) -> BlobHelperError {
        BlobHelperError::azure_api(format!("The specified blob does not exist: {blob}"))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn container_exists(&self, container: &str) -> Result<bool> {
        self.record_call();
        Ok(self.has_container(container))
    }

    async fn create_container(&self, container: &str) -> Result<()> {
        self.record_call();
        let mut containers = self.containers.lock().unwrap();
        if containers.contains_key(container) {
            return Err(BlobHelperError::azure_api(format!(
                "The specified container already exists: {container}"
            )));
        }
        containers.insert(container.to_string(), BTreeMap::new());
        Ok(())
    }

    async fn delete_container(&self, container: &str) -> Result<()> {
        self.record_call();
        self.containers
            .lock()
            .unwrap()
            .remove(container)
            .map(|_| ())
            .ok_or_else(|| Self::container_not_found(container))
    }

    async fn list_blobs(&self, container: &str, prefix: Option<String>) -> Result<Vec<BlobEntry>> {
        self.record_call();
        let containers = self.containers.lock().unwrap();
        let blobs = containers
            .get(container)
            .ok_or_else(|| Self::container_not_found(container))?;

        Ok(blobs
            .iter()
            .filter(|(name, _)| prefix.as_deref().map_or(true, |p| name.starts_with(p)))
            .map(|(name, blob)| BlobEntry {
                name: name.clone(),
                content_length: Some(blob.content.len() as u64),
                created_on: Some(Utc::now()),
                last_modified: Some(Utc::now()),
                content_type: Some(blob.content_type.clone()),
                metadata: blob.metadata.clone(),
            })
            .collect())
    }

    async fn download_blob(&self, container: &str, blob: &str) -> Result<Vec<u8>> {
        self.record_call();
        let containers = self.containers.lock().unwrap();
        containers
            .get(container)
            .ok_or_else(|| Self::container_not_found(container))?
            .get(blob)
            .map(|stored| stored.content.clone())
            .ok_or_else(|| Self::blob_not_found(blob))
    }

    async fn upload_blob(
        &self,
        container: &str,
        blob: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.record_call();
        let mut containers = self.containers.lock().unwrap();
        let blobs = containers
            .get_mut(container)
            .ok_or_else(|| Self::container_not_found(container))?;
        blobs.insert(
            blob.to_string(),
            StoredBlob {
                content,
                content_type: content_type.to_string(),
                metadata: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn set_blob_metadata(
        &self,
        container: &str,
        blob: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<()> {
        self.record_call();
        if self.fail_metadata.load(Ordering::SeqCst) {
            return Err(BlobHelperError::azure_api("metadata service unavailable"));
        }
        let mut containers = self.containers.lock().unwrap();
        let stored = containers
            .get_mut(container)
            .ok_or_else(|| Self::container_not_found(container))?
            .get_mut(blob)
            .ok_or_else(|| Self::blob_not_found(blob))?;
        stored.metadata = metadata.clone();
        Ok(())
    }

    async fn delete_blob_with_snapshots(&self, container: &str, blob: &str) -> Result<()> {
        self.record_call();
        let mut containers = self.containers.lock().unwrap();
        containers
            .get_mut(container)
            .ok_or_else(|| Self::container_not_found(container))?
            .remove(blob)
            .map(|_| ())
            .ok_or_else(|| Self::blob_not_found(blob))
    }

    async fn container_sas(&self, container: &str, policy: &SasPolicy) -> Result<String> {
        self.record_call();
        self.sas_policies.lock().unwrap().push(policy.clone());
        Ok(format!(
            "sv=2022-11-02&sr=c&sp={}&se={}&sig=test-{}",
            policy.permissions,
            policy.expires_on.format("%Y-%m-%dT%H:%M:%SZ"),
            container
        ))
    }

    fn blob_endpoint(&self) -> String {
        "https://testaccount.blob.core.windows.net".to_string()
    }
}

/// Connector that hands out the same in-memory store for every request
pub struct MemoryConnector {
    store: Arc<MemoryBlobStore>,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryBlobStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StorageConnector for MemoryConnector {
    async fn connect(&self, _credentials: &AccountCredentials) -> Result<Arc<dyn BlobStore>> {
        let store: Arc<dyn BlobStore> = self.store.clone();
        Ok(store)
    }
}

/// Connector that rejects every credential
pub struct RejectingConnector;

#[async_trait]
impl StorageConnector for RejectingConnector {
    async fn connect(&self, credentials: &AccountCredentials) -> Result<Arc<dyn BlobStore>> {
        Err(BlobHelperError::authentication(format!(
            "Server failed to authenticate the request for account {}",
            credentials.account_name()
        )))
    }
}

pub fn memory_dispatcher(store: Arc<MemoryBlobStore>) -> Dispatcher {
    Dispatcher::new(Arc::new(MemoryConnector::new(store)), GuidanceConfig::default())
}

/// JSON body with credentials for `container` plus any extra fields
pub fn request_body(container: &str, action: &str, extra: serde_json::Value) -> Vec<u8> {
    let mut body = serde_json::json!({
        "azure_storage_account_name": "testaccount",
        "azure_storage_account_key": "dGVzdC1rZXk=",
        "azure_storage_account_container": container,
        "action": action,
    });
    if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    serde_json::to_vec(&body).unwrap()
}
