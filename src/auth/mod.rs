//! Authentication module for Azure storage accounts
//!
//! This module turns the shared-key credentials supplied with each request
//! into a storage client handle.

pub mod provider;

pub use provider::*;
