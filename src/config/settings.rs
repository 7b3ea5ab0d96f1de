//! Configuration settings management
//!
//! This module handles loading configuration from multiple sources,
//! validation, and persistence.

use crate::blob::manager::DEFAULT_SAS_VALIDITY_HOURS;
use crate::error::{BlobHelperError, Result};
use crate::utils::helpers::DEFAULT_STORAGE_DOMAIN;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Default request body ceiling (100 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

/// Guidance returned to callers whose request was rejected or failed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GuidanceConfig {
    pub example_payload: serde_json::Value,
    pub guidance: String,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            example_payload: json!({
                "azure_storage_account_name": "x",
                "azure_storage_account_key": "x",
                "azure_storage_account_container": "x",
                "optional_directory": ".",
                "optional_file_name": "name.ext",
                "optional_file_content_as_base64": " ",
                "action": "list|create|read|update|delete|create_container|delete_container|exists_container|get_sas|get_connection_string",
                "optional_file_custom_metadata": {
                    "customKey1": "value1",
                    "customKey2": "value2"
                }
            }),
            guidance: "The service will return a status code 200 if successful, 400 if called with an incorrect payload, or 500 if there is an error.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub debug: bool,
    pub bind_address: String,
    pub port: u16,
    pub route: String,
    pub storage_domain: String,
    pub sas_validity_hours: i64,
    pub max_body_bytes: usize,
    pub guidance: GuidanceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            bind_address: "0.0.0.0".to_string(),
            port: 7071,
            route: "/api/blobstoragehelper".to_string(),
            storage_domain: DEFAULT_STORAGE_DOMAIN.to_string(),
            sas_validity_hours: DEFAULT_SAS_VALIDITY_HOURS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            guidance: GuidanceConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(BlobHelperError::config("Port must be greater than zero"));
        }

        if !self.route.starts_with('/') {
            return Err(BlobHelperError::config(format!(
                "Route must start with '/': {}",
                self.route
            )));
        }

        if self.storage_domain.trim_matches('.').is_empty() {
            return Err(BlobHelperError::config("Storage domain is required"));
        }

        if self.sas_validity_hours <= 0 {
            return Err(BlobHelperError::config("SAS validity must be a positive number of hours"));
        }

        if self.max_body_bytes == 0 {
            return Err(BlobHelperError::config("Maximum body size must be greater than zero"));
        }

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        // Use XDG Base Directory specification on Linux and macOS
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            use std::env;
            let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
                PathBuf::from(xdg_config_home)
            } else {
                let home_dir = env::var("HOME")
                    .map_err(|_| BlobHelperError::config("HOME environment variable not set"))?;
                PathBuf::from(home_dir).join(".config")
            };
            Ok(config_dir.join("blobhelper").join("blobhelper.toml"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| BlobHelperError::config("Unable to determine config directory"))?;
            Ok(config_dir.join("blobhelper").join("blobhelper.toml"))
        }
    }

    /// Socket address string the server binds to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn sas_validity(&self) -> chrono::Duration {
        chrono::Duration::hours(self.sas_validity_hours)
    }
}

/// Load configuration from multiple sources with priority order:
/// 1. Command-line flags (applied by the caller)
/// 2. Environment variables
/// 3. Configuration file
/// 4. Default values
pub async fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = load_config_no_validation(path).await?;

    // Validate configuration
    config.validate()?;

    Ok(config)
}

/// Load configuration without validation (for config commands)
pub async fn load_config_no_validation(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::get_config_path()?,
    };

    let mut config = if config_path.exists() {
        load_from_file(&config_path).await?
    } else if path.is_some() {
        return Err(BlobHelperError::config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    } else {
        Config::default()
    };

    // Override with environment variables
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

async fn load_from_file(path: &Path) -> Result<Config> {
    let contents = tokio::fs::read_to_string(path).await?;

    // Try to parse as TOML first, then JSON as fallback
    if let Ok(config) = toml::from_str::<Config>(&contents) {
        return Ok(config);
    }

    let config = serde_json::from_str::<Config>(&contents)?;
    Ok(config)
}

/// Apply environment overrides; unparsable numeric values are ignored
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("DEBUG") {
        config.debug = value.to_lowercase() == "true" || value == "1";
    }

    if let Some(value) = lookup("BLOBHELPER_BIND_ADDRESS") {
        config.bind_address = value;
    }

    if let Some(value) = lookup("BLOBHELPER_PORT") {
        if let Ok(port) = value.parse::<u16>() {
            config.port = port;
        }
    }

    if let Some(value) = lookup("BLOBHELPER_ROUTE") {
        config.route = value;
    }

    if let Some(value) = lookup("BLOBHELPER_STORAGE_DOMAIN") {
        config.storage_domain = value;
    }

    if let Some(value) = lookup("BLOBHELPER_SAS_VALIDITY_HOURS") {
        if let Ok(hours) = value.parse::<i64>() {
            config.sas_validity_hours = hours;
        }
    }

    if let Some(value) = lookup("BLOBHELPER_MAX_BODY_BYTES") {
        if let Ok(bytes) = value.parse::<usize>() {
            config.max_body_bytes = bytes;
        }
    }
}

pub async fn save_config(config: &Config, path: &Path) -> Result<()> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let contents = toml::to_string_pretty(config)
        .map_err(|e| BlobHelperError::serialization(e.to_string()))?;

    tokio::fs::write(path, contents).await?;

    Ok(())
}

/// Write the default configuration unless a file already exists; returns
/// whether a file was written
pub async fn init_default_config(path: &Path) -> Result<bool> {
    // Don't overwrite existing configuration
    if path.exists() {
        return Ok(false);
    }

    save_config(&Config::default(), path).await?;
    Ok(true)
}
