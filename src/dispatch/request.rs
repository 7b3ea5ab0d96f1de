//! Inbound request model and validation

use crate::auth::AccountCredentials;
use crate::error::{BlobHelperError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Operation requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Create,
    Read,
    Update,
    Delete,
    CreateContainer,
    DeleteContainer,
    ExistsContainer,
    GetSas,
    GetConnectionString,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::List,
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::CreateContainer,
        Action::DeleteContainer,
        Action::ExistsContainer,
        Action::GetSas,
        Action::GetConnectionString,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::CreateContainer => "create_container",
            Action::DeleteContainer => "delete_container",
            Action::ExistsContainer => "exists_container",
            Action::GetSas => "get_sas",
            Action::GetConnectionString => "get_connection_string",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = BlobHelperError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| BlobHelperError::invalid_argument(format!("Unrecognized action: {s}")))
    }
}

/// Request body as posted by the caller; every field is optional at parse time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlobRequest {
    pub azure_storage_account_name: Option<String>,
    pub azure_storage_account_key: Option<String>,
    pub azure_storage_account_container: Option<String>,
    pub action: Option<String>,
    pub optional_directory: Option<String>,
    pub optional_file_name: Option<String>,
    pub optional_file_content_as_base64: Option<String>,
    pub optional_file_custom_metadata: Option<HashMap<String, String>>,
}

/// A request whose mandatory fields are present and whose action is known
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub credentials: AccountCredentials,
    pub container_name: String,
    pub action: Action,
    pub directory: Option<String>,
    pub file_name: Option<String>,
    pub file_content_base64: Option<String>,
    pub custom_metadata: HashMap<String, String>,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BlobHelperError::missing_field(format!("Missing required field: {field}")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl BlobRequest {
    /// Parse a raw body; anything that is not a JSON object of the expected shape fails
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn validate(self) -> Result<ValidatedRequest> {
        let account_name = required(self.azure_storage_account_name, "azure_storage_account_name")?;
        let account_key = required(self.azure_storage_account_key, "azure_storage_account_key")?;
        let container_name = required(
            self.azure_storage_account_container,
            "azure_storage_account_container",
        )?;
        let action: Action = required(self.action, "action")?.parse()?;

        Ok(ValidatedRequest {
            credentials: AccountCredentials::new(account_name, account_key),
            container_name,
            action,
            directory: self.optional_directory,
            file_name: non_empty(self.optional_file_name),
            file_content_base64: non_empty(self.optional_file_content_as_base64),
            custom_metadata: self.optional_file_custom_metadata.unwrap_or_default(),
        })
    }
}
