use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cratedigger_server::config::{AppConfig, CliConfig, FileConfig};
use cratedigger_server::inventory::{InventoryCache, JsonFileInventorySource};
use cratedigger_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(version = concat!(env!("APP_VERSION"), "-", env!("GIT_HASH")))]
struct CliArgs {
    /// Path to the exported store inventory (a JSON array of records).
    #[clap(value_parser = parse_path)]
    pub inventory_path: Option<PathBuf>,

    /// Path to a TOML config file. Values in it override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// How long a fetched inventory is served before being re-read, in seconds.
    #[clap(long)]
    pub cache_ttl_sec: Option<u64>,

    /// Minimum score a record needs to be returned as a match.
    #[clap(long)]
    pub threshold: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config = CliConfig {
        inventory_path: cli_args.inventory_path.clone(),
        port: cli_args.port,
        logging_level: cli_args.logging_level.clone(),
        threshold: cli_args.threshold,
        cache_ttl_sec: cli_args.cache_ttl_sec,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!(
        "Matching with threshold {} and weights {:?}",
        config.matching.threshold, config.matching.weights
    );

    let source = JsonFileInventorySource::new(&config.inventory_path);
    let mut inventory = InventoryCache::new(
        Box::new(source),
        config.inventory.ttl(),
        config.inventory.stale_policy(),
    );

    // A broken inventory at startup is not fatal, requests will retry
    info!("Warming inventory cache from {:?}...", config.inventory_path);
    if let Err(err) = inventory.get(false) {
        warn!("Could not load inventory at startup: {}", err);
    }

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level,
        port: config.port,
    };

    info!(
        "Starting cratedigger server {}-{} on port {}",
        env!("APP_VERSION"),
        env!("GIT_HASH"),
        config.port
    );
    run_server(
        server_config,
        inventory,
        config.matching,
        env!("GIT_HASH").to_owned(),
    )
    .await
}
