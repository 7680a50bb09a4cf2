//! Time-boxed inventory cache.
//!
//! The cache is an explicit object owned by whoever serves matches. Reads
//! go through [`InventoryCache::get`], which either returns the cached
//! snapshot or refreshes it from the source. What happens when a refresh
//! fails is decided by the [`StalePolicy`] the cache was built with.

use super::source::{InventoryError, InventorySource};
use crate::records::InventoryRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Behaviour when refreshing the cache fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Keep serving the previous snapshot, if there is one.
    #[default]
    ServeStale,
    /// Propagate the error even if an older snapshot exists.
    FailFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Served from cache within the TTL.
    Cached,
    /// Fetched from the source on this call.
    Fresh,
    /// The refresh failed and an expired snapshot was served instead.
    Stale,
}

#[derive(Debug, Clone)]
pub struct InventorySnapshot {
    pub records: Arc<Vec<InventoryRecord>>,
    pub fetched_at: DateTime<Utc>,
    pub freshness: Freshness,
}

struct CacheEntry {
    records: Arc<Vec<InventoryRecord>>,
    fetched_at: DateTime<Utc>,
    fetched_instant: Instant,
}

pub struct InventoryCache {
    source: Box<dyn InventorySource>,
    ttl: Duration,
    stale_policy: StalePolicy,
    entry: Option<CacheEntry>,
}

impl InventoryCache {
    pub fn new(source: Box<dyn InventorySource>, ttl: Duration, stale_policy: StalePolicy) -> Self {
        Self {
            source,
            ttl,
            stale_policy,
            entry: None,
        }
    }

    pub fn with_defaults(source: Box<dyn InventorySource>) -> Self {
        Self::new(source, DEFAULT_CACHE_TTL, StalePolicy::default())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stale_policy(&self) -> StalePolicy {
        self.stale_policy
    }

    /// Age of the cached snapshot, if any.
    pub fn age(&self) -> Option<Duration> {
        self.entry.as_ref().map(|e| e.fetched_instant.elapsed())
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.fetched_instant.elapsed() < self.ttl
    }

    fn snapshot(entry: &CacheEntry, freshness: Freshness) -> InventorySnapshot {
        InventorySnapshot {
            records: entry.records.clone(),
            fetched_at: entry.fetched_at,
            freshness,
        }
    }

    /// Return the cached inventory, refreshing it when expired or forced.
    pub fn get(&mut self, force_refresh: bool) -> Result<InventorySnapshot, InventoryError> {
        if !force_refresh {
            if let Some(entry) = self.entry.as_ref().filter(|e| self.is_fresh(e)) {
                info!("Returning cached inventory ({} records)", entry.records.len());
                return Ok(Self::snapshot(entry, Freshness::Cached));
            }
        }

        match self.source.fetch() {
            Ok(records) => {
                let entry = CacheEntry {
                    records: Arc::new(records),
                    fetched_at: Utc::now(),
                    fetched_instant: Instant::now(),
                };
                let snapshot = Self::snapshot(&entry, Freshness::Fresh);
                self.entry = Some(entry);
                Ok(snapshot)
            }
            Err(err) => match (&self.entry, self.stale_policy) {
                (Some(entry), StalePolicy::ServeStale) => {
                    warn!(
                        "Failed to refresh inventory from {}, serving snapshot from {}: {}",
                        self.source.describe(),
                        entry.fetched_at,
                        err
                    );
                    Ok(Self::snapshot(entry, Freshness::Stale))
                }
                _ => Err(InventoryError::Unavailable(format!(
                    "{}: {}",
                    self.source.describe(),
                    err
                ))),
            },
        }
    }
}
