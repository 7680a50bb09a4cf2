//! Cratedigger Server Library
//!
//! Matches a record collection against a store's inventory and serves the
//! ranked results. This library exposes the internal modules for the
//! binaries, the integration tests and potential reuse.

pub mod config;
pub mod inventory;
pub mod matching;
pub mod records;
pub mod server;

// Re-export commonly used types for convenience
pub use inventory::{InventoryCache, InventorySource, JsonFileInventorySource};
pub use matching::{match_collection, MatchResult, MatchingEngine};
pub use records::{CollectionRecord, InventoryRecord};
pub use server::{make_app, run_server, RequestsLoggingLevel};
