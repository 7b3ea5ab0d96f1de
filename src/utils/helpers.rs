//! General utility helper functions
//!
//! This module contains helpers for endpoint URLs, connection strings,
//! timestamp conversion and request correlation ids.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Default DNS suffix of the public Azure blob endpoint
pub const DEFAULT_STORAGE_DOMAIN: &str = "blob.core.windows.net";

/// Get the blob endpoint URI for a storage account
pub fn get_blob_endpoint(account_name: &str, storage_domain: &str) -> String {
    format!("https://{}.{}", account_name, storage_domain.trim_matches('.'))
}

/// Build a connection string from ordered key-value pairs
pub fn build_connection_string(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(";")
}

/// Convert an Azure SDK timestamp into a chrono UTC timestamp, or `None`
/// when it falls outside chrono's range
pub fn to_utc(timestamp: time::OffsetDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), timestamp.nanosecond())
}

/// Generate a new request correlation id
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
