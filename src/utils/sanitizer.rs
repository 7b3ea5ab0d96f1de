//! Name validation for Azure Blob Storage compatibility
//!
//! Container names are checked before any backend call is made, so an
//! invalid name never reaches the storage service.

use regex::Regex;
use crate::error::{BlobHelperError, Result};

const CONTAINER_NAME_PATTERN: &str = r"^[a-z0-9](-*[a-z0-9])*$";

/// Check if a name is valid for an Azure Blob Storage container
pub fn is_valid_container_name(name: &str) -> Result<bool> {
    let re = Regex::new(CONTAINER_NAME_PATTERN)?;
    Ok(re.is_match(name))
}

/// Fail with `InvalidContainerName` unless the name matches the container rules
pub fn validate_container_name(name: &str) -> Result<()> {
    if is_valid_container_name(name)? {
        Ok(())
    } else {
        Err(BlobHelperError::invalid_container_name(name))
    }
}
