//! Store inventory access: sources and the cache in front of them.

mod cache;
mod source;

pub use cache::{Freshness, InventoryCache, InventorySnapshot, StalePolicy, DEFAULT_CACHE_TTL};
pub use source::{InventoryError, InventorySource, JsonFileInventorySource, MemoryInventorySource};
