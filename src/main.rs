//! blobhelper - Azure Blob Storage request dispatcher
//!
//! Serves the dispatcher over HTTP, or runs a single payload through it
//! from the command line.

use blobhelper::cli::Cli;
use blobhelper::config::{self, apply_env_overrides, Config};
use blobhelper::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Configuration decides the log level, so it is loaded first
    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(cli.debug || config.debug, cli.log_json);

    // Execute the command
    if let Err(e) = run(cli, config).await {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    info!("Starting blobhelper {}", env!("VERSION_WITH_GIT"));
    cli.execute(config).await
}

async fn load_config(cli: &Cli) -> Result<Config> {
    if cli.skips_config_validation() {
        load_config_for_management(cli).await
    } else {
        config::load_config(cli.config.as_deref()).await
    }
}

/// Config and version commands skip validation and tolerate a missing file
async fn load_config_for_management(cli: &Cli) -> Result<Config> {
    match cli.config.as_deref() {
        Some(path) if !path.exists() => {
            let mut config = Config::default();
            apply_env_overrides(&mut config, |key| std::env::var(key).ok());
            Ok(config)
        }
        path => config::load_config_no_validation(path).await,
    }
}

fn init_logging(debug: bool, json: bool) {
    let default_filter = if debug {
        "blobhelper=debug,tower_http=debug"
    } else {
        "blobhelper=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
