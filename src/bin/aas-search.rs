// Copyright (c) 2025 - Cowboy AI, Inc.
//! AAS Search CLI
//!
//! Resolves a search term against the configured infrastructures and
//! prints the result as JSON.
//!
//! Run with: cargo run --bin aas-search -- <asset or AAS ID>
//!
//! Modes:
//! - `aas-search <term>` - full search, prints the redirect and the shell
//! - `aas-search --submodel <id>` - submodel search
//! - `aas-search --repositories <aasId>` - every repository copy of a shell
//!
//! Terms starting with `-` go after a `--` separator.
//!
//! Configuration:
//! 1. The default infrastructure comes from `AAS_REPO_API_URL`,
//!    `REGISTRY_API_URL`, `DISCOVERY_API_URL` and friends
//! 2. `--infrastructures <FILE>` or `AAS_SEARCH_INFRASTRUCTURES` may name a
//!    JSON file with further infrastructures

use anyhow::{Context, Result};
use clap::Parser;
use mnestix_aas_search::clients::HttpClientFactory;
use mnestix_aas_search::SearchConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "aas-search")]
#[command(about = "Resolve asset and AAS IDs across AAS infrastructures")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Asset ID or AAS ID to resolve (a submodel ID with --submodel)
    id: String,

    /// Search for a submodel instead of a shell
    #[arg(long, conflicts_with = "repositories")]
    submodel: bool,

    /// List every repository copy of the shell
    #[arg(long)]
    repositories: bool,

    /// JSON file with further infrastructures
    #[arg(long, value_name = "FILE")]
    infrastructures: Option<String>,
}

fn load_config(infrastructures: Option<String>) -> Result<SearchConfig> {
    let config = SearchConfig::from_env().context("Failed to read search environment")?;
    let path = infrastructures.or_else(|| std::env::var("AAS_SEARCH_INFRASTRUCTURES").ok());
    match path {
        Some(path) => {
            let extra = SearchConfig::from_json_file(&path)
                .with_context(|| format!("Failed to load infrastructures from {}", path))?;
            config
                .merge(extra)
                .context("Infrastructure configuration is inconsistent")
        }
        None => Ok(config),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.infrastructures)?;
    if config.infrastructures.is_empty() {
        warn!("No infrastructure configured, every search will come back empty");
    }

    let factory = HttpClientFactory::new(config.http_client_config())
        .context("Failed to create HTTP client")?;
    let searcher = config.searcher(Arc::new(factory));
    info!(
        "Loaded {} infrastructure(s), request timeout {}s, stage timeout {:?}",
        config.infrastructures.len(),
        config.request_timeout_secs,
        searcher.stage_timeout()
    );

    let id = cli.id;
    if cli.submodel {
        let result = searcher
            .perform_submodel_search(&id)
            .await
            .with_context(|| format!("Submodel search for '{}' failed", id))?;
        print_json(&result)
    } else if cli.repositories {
        let result = searcher
            .get_aas_from_all_repos(&id)
            .await
            .with_context(|| format!("Repository search for '{}' failed", id))?;
        print_json(&result)
    } else {
        let result = searcher
            .perform_full_search(&id)
            .await
            .with_context(|| format!("Search for '{}' failed", id))?;
        print_json(&result)
    }
}
