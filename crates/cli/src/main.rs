//! Harbor CLI
//!
//! Parse `data:` URIs and save their payloads from the command line.

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use harbor_core::HarborError;
use harbor_datauri::{DataUriParser, DataUriSuffixParser};
use harbor_toggles::{
    FeatureToggleCache, InMemoryRemoteFeatureTogglesRepository, RemoteFeatureToggle,
};

use crate::config::HarborConfig;

/// Harbor CLI: inspect and save data URIs.
#[derive(Parser, Debug)]
#[command(name = "harbor", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "HARBOR_CONFIG", default_value = "harbor.toml", global = true)]
    config: PathBuf,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a data URI and show what would be saved.
    Parse(commands::parse::ParseArgs),
    /// Decode a data URI and write it to disk.
    Save(commands::save::SaveArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = HarborConfig::load(&cli.config)?;

    // RUST_LOG wins over the configured filter.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !cli.config.exists() {
        debug!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let parser = DataUriParser::new(DataUriSuffixParser::new().with_overrides(&config.suffixes));

    match cli.command {
        Command::Parse(args) => commands::parse::run(&parser, &args, &cli.format),
        Command::Save(args) => {
            let toggles = load_toggles(&config).await?;
            let directory = args
                .dir
                .clone()
                .unwrap_or_else(|| config.downloads.directory.clone());
            commands::save::run(parser, &toggles, &directory, &args, &cli.format).await
        }
    }
}

/// Seed the toggle cache from the `[features]` table.
async fn load_toggles(config: &HarborConfig) -> anyhow::Result<FeatureToggleCache> {
    let repository = InMemoryRemoteFeatureTogglesRepository::new(
        config
            .features
            .iter()
            .map(|(name, enabled)| RemoteFeatureToggle::new(name.as_str(), *enabled)),
    );
    let cache = FeatureToggleCache::new(Arc::new(repository));
    let count = cache
        .update_feature_toggles()
        .await
        .map_err(HarborError::from)?;
    info!(count, "feature toggles loaded");
    Ok(cache)
}
