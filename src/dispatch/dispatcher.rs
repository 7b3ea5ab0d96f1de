//! Request dispatcher
//!
//! Validates an inbound request, authenticates a storage handle through the
//! configured connector, runs the requested action and shapes the outcome
//! into a [`Reply`].
//!
//! Status mapping: 200 on success, 400 for input errors (nothing reaches the
//! backend), 500 for backend failures and for authentication failures. The
//! latter replace the envelope with the guidance template.

use crate::auth::StorageConnector;
use crate::blob::path::add_directory_to_filename;
use crate::blob::BlobManager;
use crate::config::{Config, GuidanceConfig};
use crate::dispatch::request::{Action, BlobRequest, ValidatedRequest};
use crate::dispatch::response::{Reply, ResponseEnvelope};
use crate::error::{BlobHelperError, Result};
use crate::utils::helpers::generate_request_id;
use axum::http::{Method, StatusCode};
use chrono::Duration;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

pub const AUTHENTICATED_MESSAGE: &str = "Authenticated to the blob storage service.";

/// Routes validated requests to blob operations
pub struct Dispatcher {
    connector: Arc<dyn StorageConnector>,
    guidance: GuidanceConfig,
    sas_validity: Duration,
}

impl Dispatcher {
    pub fn new(connector: Arc<dyn StorageConnector>, guidance: GuidanceConfig) -> Self {
        Self {
            connector,
            guidance,
            sas_validity: Duration::hours(crate::blob::manager::DEFAULT_SAS_VALIDITY_HOURS),
        }
    }

    /// Build a dispatcher with the connector and guidance taken from configuration
    pub fn from_config(connector: Arc<dyn StorageConnector>, config: &Config) -> Self {
        Self::new(connector, config.guidance.clone()).with_sas_validity(config.sas_validity())
    }

    pub fn with_sas_validity(mut self, validity: Duration) -> Self {
        self.sas_validity = validity;
        self
    }

    /// Handle one raw HTTP request
    pub async fn handle(&self, method: &Method, body: &[u8]) -> Reply {
        if method != Method::POST {
            warn!(%method, "rejected request with unsupported method");
            return Reply::new(
                StatusCode::BAD_REQUEST,
                ResponseEnvelope::wrong_method(&self.guidance),
            );
        }

        match BlobRequest::from_slice(body).and_then(BlobRequest::validate) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                warn!(error = %e, "rejected malformed request");
                Reply::new(
                    StatusCode::BAD_REQUEST,
                    ResponseEnvelope::missing_fields(&self.guidance),
                )
            }
        }
    }

    /// Reply for a request whose body never reached the dispatcher
    pub fn reject_unreadable_body(&self, message: &str) -> Reply {
        warn!(error = message, "rejected unreadable request body");
        Reply::new(
            StatusCode::BAD_REQUEST,
            ResponseEnvelope::unreadable_body(&self.guidance, message),
        )
    }

    /// Authenticate and run a validated request
    pub async fn dispatch(&self, request: ValidatedRequest) -> Reply {
        let span = info_span!(
            "dispatch",
            request_id = %generate_request_id(),
            account = %request.credentials.account_name(),
            container = %request.container_name,
            action = %request.action,
        );

        async move {
            let store = match self.connector.connect(&request.credentials).await {
                Ok(store) => store,
                Err(e) => {
                    error!(error = %e, "failed to authenticate to the blob storage service");
                    return Reply::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ResponseEnvelope::failure(&self.guidance, &e.to_string()),
                    );
                }
            };

            let manager = BlobManager::new(store, request.container_name.clone())
                .with_sas_validity(self.sas_validity);
            let mut envelope = ResponseEnvelope {
                action: Some(request.action.as_str().to_string()),
                debug: Some(AUTHENTICATED_MESSAGE.to_string()),
                ..Default::default()
            };

            match run_action(&manager, &request, &mut envelope).await {
                Ok(()) => {
                    info!("request completed");
                    Reply::ok(envelope)
                }
                Err(e) => {
                    let status = if e.is_client_error() {
                        warn!(error = %e, "request rejected");
                        StatusCode::BAD_REQUEST
                    } else {
                        error!(error = %e, "blob operation failed");
                        StatusCode::INTERNAL_SERVER_ERROR
                    };
                    envelope.error = e.to_string();
                    Reply::new(status, envelope)
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn require_file_name(request: &ValidatedRequest) -> Result<String> {
    let file_name = request
        .file_name
        .as_deref()
        .ok_or_else(|| BlobHelperError::missing_field("No file name supplied"))?;
    Ok(add_directory_to_filename(request.directory.as_deref(), file_name))
}

async fn run_action(
    manager: &BlobManager,
    request: &ValidatedRequest,
    envelope: &mut ResponseEnvelope,
) -> Result<()> {
    match request.action {
        Action::CreateContainer => {
            let status = manager.create_container().await?;
            envelope.result = Some(status.describe(manager.container_name()));
        }
        Action::DeleteContainer => {
            let status = manager.delete_container().await?;
            envelope.result = Some(status.describe(manager.container_name()));
        }
        Action::ExistsContainer => {
            envelope.result = Some(manager.container_exists().await?.to_string());
        }
        Action::List => {
            envelope.results = Some(manager.list_directory(request.directory.as_deref()).await?);
        }
        Action::Create | Action::Update => {
            let blob_name = require_file_name(request)?;
            let content = request
                .file_content_base64
                .as_deref()
                .ok_or_else(|| BlobHelperError::missing_field("No file contents supplied"))?;

            envelope.file_name = Some(blob_name.clone());
            envelope.debug = Some(manager.write_blob(&blob_name, content).await?);

            // Best effort: the blob stays committed even if this fails
            if !request.custom_metadata.is_empty() {
                if let Err(e) = manager.set_metadata(&blob_name, &request.custom_metadata).await {
                    warn!(blob = %blob_name, error = %e, "failed to add custom metadata");
                    envelope.metadata_error = Some(format!("Error adding custom metadata: {e}"));
                }
            }
        }
        Action::Read => {
            let blob_name = require_file_name(request)?;
            envelope.file_name = Some(blob_name.clone());
            envelope.debug = Some(format!("Getting blob {blob_name}"));
            envelope.file_as_base64 = Some(manager.read_blob(&blob_name).await?);
        }
        Action::Delete => {
            let blob_name = require_file_name(request)?;
            envelope.file_name = Some(blob_name.clone());
            envelope.debug = Some(manager.delete_blob(&blob_name).await?);
        }
        Action::GetSas => {
            envelope.sas_token = Some(manager.generate_sas_token().await?);
        }
        Action::GetConnectionString => {
            envelope.connection_string = Some(manager.generate_connection_string().await?);
            envelope.container_name = Some(manager.container_name().to_string());
        }
    }

    Ok(())
}
