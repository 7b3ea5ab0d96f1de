//! Data models for blob storage operations
//!
//! This module defines the data structures exchanged between the blob
//! manager and the storage backend, and the records returned to callers.

use chrono::{DateTime, Duration, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A blob as reported by a backend listing
#[derive(Debug, Clone, PartialEq)]
pub struct BlobEntry {
    pub name: String,
    pub content_length: Option<u64>,
    pub created_on: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// A listed file, with custom metadata flattened next to the built-in fields
#[derive(Debug, Clone, PartialEq)]
pub struct StorageItem {
    pub name: String,
    pub content_length: u64,
    pub created_on: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl StorageItem {
    /// Project a backend entry, or `None` for virtual directory markers
    pub fn from_entry(entry: BlobEntry) -> Option<Self> {
        match entry.content_length {
            Some(length) if length > 0 => Some(Self {
                name: entry.name,
                content_length: length,
                created_on: entry.created_on,
                last_modified: entry.last_modified,
                content_type: entry.content_type,
                metadata: entry.metadata,
            }),
            _ => None,
        }
    }

    /// Flat JSON record; metadata keys overwrite built-in fields of the same name
    pub fn to_record(&self) -> serde_json::Map<String, serde_json::Value> {
        use serde_json::Value;

        let mut record = serde_json::Map::new();
        record.insert("name".to_string(), Value::from(self.name.clone()));
        record.insert("contentLength".to_string(), Value::from(self.content_length));
        record.insert(
            "createdOn".to_string(),
            self.created_on.map(|t| Value::from(t.to_rfc3339())).unwrap_or(Value::Null),
        );
        record.insert(
            "lastModified".to_string(),
            self.last_modified.map(|t| Value::from(t.to_rfc3339())).unwrap_or(Value::Null),
        );
        record.insert(
            "contentType".to_string(),
            self.content_type.clone().map(Value::from).unwrap_or(Value::Null),
        );
        for (key, value) in &self.metadata {
            record.insert(key.clone(), Value::from(value.clone()));
        }
        record
    }
}

impl Serialize for StorageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let record = self.to_record();
        let mut map = serializer.serialize_map(Some(record.len()))?;
        for (key, value) in &record {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Outcome of a container lifecycle call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    AlreadyExists,
    Deleted,
    DidNotExist,
}

impl ContainerStatus {
    /// Human-readable status line for the given container
    pub fn describe(&self, container_name: &str) -> String {
        match self {
            Self::Created => format!("Container \"{container_name}\" created successfully."),
            Self::AlreadyExists => format!("Container \"{container_name}\" already exists."),
            Self::Deleted => format!("Container \"{container_name}\" deleted successfully."),
            Self::DidNotExist => format!("Container \"{container_name}\" does not exist."),
        }
    }
}

/// Permissions carried by a container shared access signature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SasPermissions {
    pub read: bool,
    pub add: bool,
    pub create: bool,
    pub write: bool,
    pub delete: bool,
    pub list: bool,
}

impl fmt::Display for SasPermissions {
    /// Canonical permission string, in the order the service expects
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.read, 'r'),
            (self.add, 'a'),
            (self.create, 'c'),
            (self.write, 'w'),
            (self.delete, 'd'),
            (self.list, 'l'),
        ];
        for (enabled, flag) in flags {
            if enabled {
                write!(f, "{flag}")?;
            }
        }
        Ok(())
    }
}

/// Transport allowed for a shared access signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SasTransport {
    HttpsOnly,
    HttpsAndHttp,
}

/// Everything the backend needs to sign a container token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SasPolicy {
    pub permissions: SasPermissions,
    pub starts_on: DateTime<Utc>,
    pub expires_on: DateTime<Utc>,
    pub transport: SasTransport,
}

impl SasPolicy {
    /// Read and list access, starting at `now`, over HTTPS and HTTP
    pub fn read_list(now: DateTime<Utc>, validity: Duration) -> Self {
        Self {
            permissions: SasPermissions {
                read: true,
                list: true,
                ..Default::default()
            },
            starts_on: now,
            expires_on: now + validity,
            transport: SasTransport::HttpsAndHttp,
        }
    }

    pub fn validity(&self) -> Duration {
        self.expires_on - self.starts_on
    }
}
