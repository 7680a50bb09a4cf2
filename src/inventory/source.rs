//! Where inventory records come from.

use crate::records::{parse_inventory_json, InventoryRecord};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed inventory: {0}")]
    Malformed(String),

    #[error("Inventory unavailable: {0}")]
    Unavailable(String),
}

/// A producer of the full, current inventory.
///
/// Implementations are expected to block until the whole list is
/// available; partial results must be reported as errors.
pub trait InventorySource: Send + Sync {
    fn fetch(&self) -> Result<Vec<InventoryRecord>, InventoryError>;

    /// Human readable description for logs.
    fn describe(&self) -> String;
}

/// Reads an exported inventory (a JSON array of records) from disk.
pub struct JsonFileInventorySource {
    path: PathBuf,
}

impl JsonFileInventorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InventorySource for JsonFileInventorySource {
    fn fetch(&self) -> Result<Vec<InventoryRecord>, InventoryError> {
        let content = std::fs::read_to_string(&self.path)?;
        let records = parse_inventory_json(&content)
            .map_err(|err| InventoryError::Malformed(format!("{:?}: {}", self.path, err)))?;
        info!("Loaded {} inventory records from {:?}", records.len(), self.path);
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("file {:?}", self.path)
    }
}

/// Inventory that is already in memory, e.g. scraped by another process.
pub struct MemoryInventorySource {
    records: Vec<InventoryRecord>,
}

impl MemoryInventorySource {
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        Self { records }
    }
}

impl InventorySource for MemoryInventorySource {
    fn fetch(&self) -> Result<Vec<InventoryRecord>, InventoryError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}
