use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub inventory_path: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,

    // Feature configs
    pub matching: Option<MatchingConfig>,
    pub inventory: Option<InventoryConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MatchingConfig {
    pub threshold: Option<f64>,
    /// Default number of matches returned when a request doesn't ask for a limit.
    pub limit: Option<usize>,
    pub genre_weight: Option<f64>,
    pub artist_weight: Option<f64>,
    pub era_weight: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct InventoryConfig {
    pub cache_ttl_sec: Option<u64>,
    pub serve_stale_on_error: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
