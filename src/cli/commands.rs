//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, subcommands, and their arguments.

use crate::auth::AzureConnector;
use crate::config::{init_default_config, Config};
use crate::dispatch::Dispatcher;
use crate::error::{BlobHelperError, Result};
use crate::server;
use axum::http::Method;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Get the full version string with build information
fn get_version() -> &'static str {
    env!("VERSION_WITH_GIT")
}

#[derive(Parser)]
#[command(name = "blobhelper")]
#[command(about = "Run Azure Blob Storage operations from JSON requests over HTTP")]
#[command(version = get_version(), author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH", env = "BLOBHELPER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run a single request payload through the dispatcher and print the response
    Invoke {
        /// JSON payload file, or '-' for stdin
        payload: String,
        /// HTTP method to simulate
        #[arg(long, default_value = "POST")]
        method: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Show version and build information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Show the configuration file path
    Path,
    /// Write a default configuration file if none exists
    Init,
}

impl Cli {
    /// True for commands that must not fail on an invalid configuration
    pub fn skips_config_validation(&self) -> bool {
        matches!(self.command, Commands::Config { .. } | Commands::Version)
    }

    pub async fn execute(self, mut config: Config) -> Result<()> {
        if self.debug {
            config.debug = true;
        }

        match self.command {
            Commands::Serve { bind, port } => execute_serve(bind, port, config).await,
            Commands::Invoke { payload, method } => execute_invoke(&payload, &method, &config).await,
            Commands::Config { command } => {
                execute_config_command(command, self.config, &config).await
            }
            Commands::Version => execute_version_command(),
        }
    }
}

async fn execute_serve(bind: Option<String>, port: Option<u16>, mut config: Config) -> Result<()> {
    if let Some(bind) = bind {
        config.bind_address = bind;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config.validate()?;

    let connector = Arc::new(AzureConnector::with_storage_domain(config.storage_domain.clone()));
    info!(storage_domain = connector.storage_domain(), "using shared-key Azure connector");
    let dispatcher = Arc::new(Dispatcher::from_config(connector, &config));

    server::run_http_server(&config, dispatcher, server::shutdown_signal())
        .await
        .map_err(|e| BlobHelperError::unknown(format!("{e:#}")))
}

async fn read_payload(payload: &str) -> Result<Vec<u8>> {
    if payload == "-" {
        let mut buffer = Vec::new();
        tokio::io::stdin().read_to_end(&mut buffer).await?;
        Ok(buffer)
    } else {
        Ok(tokio::fs::read(payload).await?)
    }
}

async fn execute_invoke(payload: &str, method: &str, config: &Config) -> Result<()> {
    let method = Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|e| BlobHelperError::invalid_argument(format!("Invalid HTTP method: {e}")))?;
    let body = read_payload(payload).await?;

    let connector = Arc::new(AzureConnector::with_storage_domain(config.storage_domain.clone()));
    let dispatcher = Dispatcher::from_config(connector, config);
    let reply = dispatcher.handle(&method, &body).await;

    eprintln!("HTTP {}", reply.status);
    println!("{}", serde_json::to_string_pretty(&reply.body)?);

    if reply.body.is_error() {
        return Err(BlobHelperError::unknown(format!(
            "Request failed with status {}",
            reply.status
        )));
    }
    Ok(())
}

async fn execute_config_command(
    command: ConfigCommands,
    path: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => Config::get_config_path()?,
    };

    match command {
        ConfigCommands::Show => {
            let contents = toml::to_string_pretty(config)
                .map_err(|e| BlobHelperError::serialization(e.to_string()))?;
            println!("{contents}");
        }
        ConfigCommands::Path => {
            println!("{}", config_path.display());
        }
        ConfigCommands::Init => {
            if init_default_config(&config_path).await? {
                println!("Wrote default configuration to {}", config_path.display());
            } else {
                println!("Configuration already exists at {}", config_path.display());
            }
        }
    }
    Ok(())
}

fn execute_version_command() -> Result<()> {
    println!("blobhelper");
    println!("==========");
    println!("Version:    {}", env!("CARGO_PKG_VERSION"));
    println!("Git Hash:   {}", env!("GIT_HASH"));
    println!("Git Branch: {}", env!("GIT_BRANCH"));
    println!("Built:      {}", env!("BUILD_TIME"));
    Ok(())
}
