use axum::extract::FromRef;

use crate::config::MatchingSettings;
use crate::inventory::InventoryCache;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::ServerConfig;

pub type GuardedInventoryCache = Arc<Mutex<InventoryCache>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub inventory: GuardedInventoryCache,
    pub matching: MatchingSettings,
    pub hash: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        inventory: InventoryCache,
        matching: MatchingSettings,
        hash: String,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            inventory: Arc::new(Mutex::new(inventory)),
            matching,
            hash,
        }
    }
}

impl FromRef<ServerState> for GuardedInventoryCache {
    fn from_ref(input: &ServerState) -> Self {
        input.inventory.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
