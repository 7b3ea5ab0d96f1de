//! blobhelper - Azure Blob Storage request dispatcher
//!
//! Translates JSON requests carrying storage account credentials into
//! container and blob operations, access-token issuance and connection
//! strings, and shapes every outcome into a uniform response envelope.

pub mod auth;
pub mod blob;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod server;
pub mod utils;

// Re-export commonly used types
pub use error::{BlobHelperError, Result};
