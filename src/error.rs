use thiserror::Error;

/// Main error type for blobhelper operations
#[derive(Debug, Error)]
pub enum BlobHelperError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Azure API error: {0}")]
    AzureApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid container name. Container names can only contain lowercase letters, numbers, and hyphens, and must start and end with a letter or number.")]
    InvalidContainerName { name: String },

    #[error("{0}")]
    MissingField(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid base64 content: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl BlobHelperError {
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::AuthenticationError(msg.into())
    }

    pub fn azure_api<S: Into<String>>(msg: S) -> Self {
        Self::AzureApiError(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_container_name<S: Into<String>>(name: S) -> Self {
        Self::InvalidContainerName { name: name.into() }
    }

    pub fn missing_field<S: Into<String>>(msg: S) -> Self {
        Self::MissingField(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn unknown<S: Into<String>>(msg: S) -> Self {
        Self::Unknown(msg.into())
    }

    /// True when the caller supplied bad input and nothing reached the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidContainerName { .. }
                | Self::MissingField(_)
                | Self::InvalidArgument(_)
                | Self::Base64Error(_)
        )
    }
}

/// Result type alias for blobhelper operations
pub type Result<T> = std::result::Result<T, BlobHelperError>;

/// Convert Azure Core errors to BlobHelperError
impl From<azure_core::Error> for BlobHelperError {
    fn from(error: azure_core::Error) -> Self {
        Self::AzureApiError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(BlobHelperError::invalid_container_name("Bad").is_client_error());
        assert!(BlobHelperError::missing_field("No file name supplied").is_client_error());
        assert!(BlobHelperError::invalid_argument("x").is_client_error());
        assert!(!BlobHelperError::azure_api("boom").is_client_error());
        assert!(!BlobHelperError::authentication("bad key").is_client_error());
    }

    #[test]
    fn test_missing_field_message_is_verbatim() {
        let err = BlobHelperError::missing_field("No file contents supplied");
        assert_eq!(err.to_string(), "No file contents supplied");
    }
}
