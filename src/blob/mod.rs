//! Azure Blob Storage operations for file management
//!
//! This module provides functionality for storing and managing files
//! in Azure Blob Storage, including upload, download, listing, deletion,
//! container lifecycle and shared access signatures.

pub mod azure;
pub mod content_type;
pub mod manager;
pub mod models;
pub mod path;
pub mod store;

// Re-export commonly used types
pub use manager::BlobManager;
pub use models::*;
pub use store::BlobStore;
