//! Request dispatch
//!
//! Turns one inbound request into one blob storage action and a uniform
//! response envelope.

pub mod dispatcher;
pub mod request;
pub mod response;

pub use dispatcher::Dispatcher;
pub use request::{Action, BlobRequest, ValidatedRequest};
pub use response::{Reply, ResponseEnvelope};
