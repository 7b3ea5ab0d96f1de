//! Utility functions module
//!
//! This module contains container name validation, connection string
//! handling and other small helpers.

pub mod helpers;
pub mod sanitizer;

pub use helpers::*;
pub use sanitizer::*;
