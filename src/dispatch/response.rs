//! Response envelope shared by every action

use crate::blob::models::StorageItem;
use crate::config::GuidanceConfig;
use axum::http::StatusCode;
use serde::Serialize;

/// Value of the `error` field when nothing went wrong
pub const NO_ERROR: &str = "none";

pub const WRONG_METHOD_MESSAGE: &str = "This HTTP triggered function executed successfully, but should be called using POST.  Pass in the following parameters in the POST body:";
pub const MISSING_FIELDS_MESSAGE: &str = "This HTTP triggered function executed successfully, but not all the required information was found. Please use the example payload for guidance:";
pub const FAILURE_MESSAGE: &str = "An error occured. Pass in the following parameters in the POST body to call the service:";

/// JSON body returned for every request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<StorageItem>>,
    #[serde(rename = "fileName", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "fileAsBase64", skip_serializing_if = "Option::is_none")]
    pub file_as_base64: Option<String>,
    #[serde(rename = "sasToken", skip_serializing_if = "Option::is_none")]
    pub sas_token: Option<String>,
    #[serde(rename = "connectionString", skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    #[serde(rename = "containerName", skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_error: Option<String>,
    #[serde(rename = "examplePayload", skip_serializing_if = "Option::is_none")]
    pub example_payload: Option<serde_json::Value>,
    #[serde(rename = "errorMessage", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

impl Default for ResponseEnvelope {
    fn default() -> Self {
        Self {
            error: NO_ERROR.to_string(),
            action: None,
            debug: None,
            result: None,
            results: None,
            file_name: None,
            file_as_base64: None,
            sas_token: None,
            connection_string: None,
            container_name: None,
            metadata_error: None,
            example_payload: None,
            error_message: None,
            guidance: None,
        }
    }
}

impl ResponseEnvelope {
    pub fn is_error(&self) -> bool {
        self.error != NO_ERROR
    }

    /// Rejection for a call made with a method other than POST
    pub fn wrong_method(guidance: &GuidanceConfig) -> Self {
        Self {
            error: WRONG_METHOD_MESSAGE.to_string(),
            example_payload: Some(guidance.example_payload.clone()),
            guidance: Some(guidance.guidance.clone()),
            ..Default::default()
        }
    }

    /// Rejection for a body missing required fields or naming an unknown action
    pub fn missing_fields(guidance: &GuidanceConfig) -> Self {
        Self {
            error: MISSING_FIELDS_MESSAGE.to_string(),
            example_payload: Some(guidance.example_payload.clone()),
            ..Default::default()
        }
    }

    /// Rejection for a body that could not be read, such as one over the size limit
    pub fn unreadable_body(guidance: &GuidanceConfig, message: &str) -> Self {
        Self {
            error: format!("The request body could not be read: {message}"),
            example_payload: Some(guidance.example_payload.clone()),
            ..Default::default()
        }
    }

    /// Template that replaces the envelope after an unexpected failure
    pub fn failure(guidance: &GuidanceConfig, message: &str) -> Self {
        Self {
            error: FAILURE_MESSAGE.to_string(),
            example_payload: Some(guidance.example_payload.clone()),
            error_message: Some(format!("\"{message}\"")),
            guidance: Some(guidance.guidance.clone()),
            ..Default::default()
        }
    }
}

/// Envelope plus the HTTP status it should be delivered with
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: ResponseEnvelope,
}

impl Reply {
    pub fn new(status: StatusCode, body: ResponseEnvelope) -> Self {
        Self { status, body }
    }

    pub fn ok(body: ResponseEnvelope) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_success_envelope_omits_absent_fields() {
        let envelope = ResponseEnvelope {
            action: Some("get_sas".to_string()),
            sas_token: Some("sv=1".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&envelope).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(json["error"], "none");
        assert_eq!(json["sasToken"], "sv=1");
        assert!(!object.contains_key("results"));
        assert!(!object.contains_key("examplePayload"));
        assert!(!envelope.is_error());
    }

    #[test]
    fn test_failure_template() {
        let guidance = GuidanceConfig::default();
        let envelope = ResponseEnvelope::failure(&guidance, "boom");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["error"], FAILURE_MESSAGE);
        assert_eq!(json["errorMessage"], "\"boom\"");
        assert_eq!(json["examplePayload"]["optional_file_name"], "name.ext");
        assert!(json["guidance"].as_str().unwrap().contains("400"));
        assert!(envelope.is_error());
    }

    #[test]
    fn test_missing_fields_has_no_guidance_line() {
        let envelope = ResponseEnvelope::missing_fields(&GuidanceConfig::default());
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"], MISSING_FIELDS_MESSAGE);
        assert_eq!(json.get("guidance"), None::<&Value>);
    }
}
