mod file_config;

pub use file_config::{FileConfig, InventoryConfig, MatchingConfig};

use crate::inventory::{StalePolicy, DEFAULT_CACHE_TTL};
use crate::matching::{MatchWeights, DEFAULT_THRESHOLD};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub inventory_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub threshold: Option<f64>,
    pub cache_ttl_sec: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub inventory_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,

    // Feature configs (with defaults)
    pub matching: MatchingSettings,
    pub inventory: InventorySettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let inventory_path = file
            .inventory_path
            .map(PathBuf::from)
            .or_else(|| cli.inventory_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "inventory_path must be specified via --inventory-path or in config file"
                )
            })?;

        if !inventory_path.exists() {
            bail!("Inventory file does not exist: {:?}", inventory_path);
        }
        if !inventory_path.is_file() {
            bail!("inventory_path is not a file: {:?}", inventory_path);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let matching = MatchingSettings::resolve(cli, file.matching.unwrap_or_default())?;

        let inv_file = file.inventory.unwrap_or_default();
        let inventory = InventorySettings {
            cache_ttl_sec: inv_file
                .cache_ttl_sec
                .or(cli.cache_ttl_sec)
                .unwrap_or(DEFAULT_CACHE_TTL.as_secs()),
            serve_stale_on_error: inv_file.serve_stale_on_error.unwrap_or(true),
        };

        Ok(Self {
            inventory_path,
            port,
            logging_level,
            matching,
            inventory,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchingSettings {
    pub threshold: f64,
    /// Default cap on returned matches, `None` returns all of them.
    pub limit: Option<usize>,
    pub weights: MatchWeights,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            limit: None,
            weights: MatchWeights::default(),
        }
    }
}

impl MatchingSettings {
    fn resolve(cli: &CliConfig, file: MatchingConfig) -> Result<Self> {
        let defaults = MatchWeights::default();
        let weights = MatchWeights {
            genre: file.genre_weight.unwrap_or(defaults.genre),
            artist: file.artist_weight.unwrap_or(defaults.artist),
            era: file.era_weight.unwrap_or(defaults.era),
        };
        weights.validate()?;

        let threshold = file
            .threshold
            .or(cli.threshold)
            .unwrap_or(DEFAULT_THRESHOLD);
        if !threshold.is_finite() {
            bail!("threshold must be a finite number, got {}", threshold);
        }

        Ok(Self {
            threshold,
            limit: file.limit,
            weights,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventorySettings {
    pub cache_ttl_sec: u64,
    pub serve_stale_on_error: bool,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            cache_ttl_sec: DEFAULT_CACHE_TTL.as_secs(),
            serve_stale_on_error: true,
        }
    }
}

impl InventorySettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_sec)
    }

    pub fn stale_policy(&self) -> StalePolicy {
        if self.serve_stale_on_error {
            StalePolicy::ServeStale
        } else {
            StalePolicy::FailFast
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
