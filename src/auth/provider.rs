//! Storage connector trait and implementations
//!
//! A connector turns the account name and key carried by a request into a
//! blob store handle. Handles are built per request and never cached.

use crate::blob::azure::AzureBlobStore;
use crate::blob::store::BlobStore;
use crate::error::{BlobHelperError, Result};
use crate::utils::helpers::DEFAULT_STORAGE_DOMAIN;
use async_trait::async_trait;
use base64::Engine;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

/// Shared-key credentials for a storage account
#[derive(Clone)]
pub struct AccountCredentials {
    account_name: String,
    account_key: Zeroizing<String>,
}

impl AccountCredentials {
    pub fn new(account_name: impl Into<String>, account_key: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            account_key: Zeroizing::new(account_key.into()),
        }
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn account_key(&self) -> &str {
        self.account_key.as_str()
    }
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .finish()
    }
}

/// Trait for turning request credentials into a storage handle
#[async_trait]
pub trait StorageConnector: Send + Sync {
    /// Authenticate and return a store scoped to the credentials' account
    async fn connect(&self, credentials: &AccountCredentials) -> Result<Arc<dyn BlobStore>>;
}

/// Shared-key connector for Azure storage accounts
pub struct AzureConnector {
    storage_domain: String,
}

impl AzureConnector {
    /// Create a connector for the public Azure cloud
    pub fn new() -> Self {
        Self::with_storage_domain(DEFAULT_STORAGE_DOMAIN)
    }

    /// Create a connector for a specific blob endpoint domain
    pub fn with_storage_domain(storage_domain: impl Into<String>) -> Self {
        Self {
            storage_domain: storage_domain.into(),
        }
    }

    pub fn storage_domain(&self) -> &str {
        &self.storage_domain
    }
}

impl Default for AzureConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject account keys the shared-key signer could never use
pub fn validate_account_key(account_key: &str) -> Result<()> {
    base64::engine::general_purpose::STANDARD
        .decode(account_key.trim())
        .map(|_| ())
        .map_err(|e| BlobHelperError::authentication(format!("Account key is not valid base64: {e}")))
}

#[async_trait]
impl StorageConnector for AzureConnector {
    async fn connect(&self, credentials: &AccountCredentials) -> Result<Arc<dyn BlobStore>> {
        validate_account_key(credentials.account_key())?;

        let store = AzureBlobStore::new(
            credentials.account_name(),
            credentials.account_key().trim(),
            &self.storage_domain,
        );
        debug!(
            account = store.account_name(),
            domain = %self.storage_domain,
            "created shared-key blob client"
        );

        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let creds = AccountCredentials::new("acct", "c2VjcmV0");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("acct"));
        assert!(!rendered.contains("c2VjcmV0"));
    }

    #[test]
    fn test_validate_account_key() {
        assert!(validate_account_key("c2VjcmV0LWtleQ==").is_ok());
        let err = validate_account_key("not base64!").unwrap_err();
        assert!(matches!(err, BlobHelperError::AuthenticationError(_)));
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_key() {
        let connector = AzureConnector::new();
        let creds = AccountCredentials::new("acct", "%%%");
        assert!(connector.connect(&creds).await.is_err());
    }

    #[tokio::test]
    async fn test_connect_builds_endpoint_from_account() {
        let connector = AzureConnector::with_storage_domain("blob.core.windows.net");
        let creds = AccountCredentials::new("acct", "c2VjcmV0LWtleQ==");
        let store = connector.connect(&creds).await.unwrap();
        assert_eq!(store.blob_endpoint(), "https://acct.blob.core.windows.net");
    }
}
