//! Test fixtures: collections, inventories and app builders

#![allow(dead_code)]

use axum::Router;
use cratedigger_server::config::MatchingSettings;
use cratedigger_server::inventory::{
    InventoryCache, InventorySource, MemoryInventorySource, StalePolicy,
};
use cratedigger_server::records::{parse_inventory_json, InventoryRecord};
use cratedigger_server::server::{make_app, ServerConfig};
use cratedigger_server::RequestsLoggingLevel;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub const TEST_HASH: &str = "test-hash";

/// A single Beatles record, the canonical typo-match scenario.
pub fn beatles_collection() -> Value {
    json!([
        {
            "artist": "The Beatles",
            "title": "Abbey Road",
            "year": 1969,
            "genres": ["rock"],
            "styles": ["pop rock"]
        }
    ])
}

/// A small collection spanning rock, jazz and electronic.
pub fn mixed_collection() -> Value {
    json!([
        {"artist": "The Beatles", "title": "Revolver", "year": 1966, "genres": ["rock"], "styles": ["psychedelic rock"]},
        {"artist": "Davis, Miles", "title": "Kind of Blue", "year": 1959, "genres": ["jazz"], "styles": ["modal"]},
        {"artist": "Kraftwerk (2)", "title": "Trans-Europe Express", "year": 1977, "genres": ["electronic"], "styles": ["krautrock"]},
        {"artist": "Björk", "title": "Homogenic", "year": 1997, "genres": ["electronic", "pop"], "styles": ["art pop"]}
    ])
}

/// The same records as Discogs collection items.
pub fn discogs_collection() -> Value {
    json!({
        "pagination": {"page": 1, "pages": 1},
        "releases": [
            {
                "id": 1001,
                "basic_information": {
                    "title": "Revolver",
                    "year": 1966,
                    "artists": [{"name": "The Beatles"}],
                    "labels": [{"name": "Parlophone"}],
                    "genres": ["Rock"],
                    "styles": ["Psychedelic Rock"]
                }
            },
            {
                "id": 1002,
                "basic_information": {
                    "title": "Unknown Pressing",
                    "year": 0,
                    "artists": [{"name": "Kraftwerk"}, {"name": "Karl Bartos"}],
                    "labels": [],
                    "genres": ["Electronic"],
                    "styles": []
                }
            }
        ]
    })
}

/// A store inventory with near matches, exact matches, and noise.
pub fn inventory() -> Value {
    json!([
        {"id": "inv-1", "artist": "The Beatless", "title": "Abbey Road", "year": 1969, "genres": ["rock"], "price": 29.99, "condition": "VG+"},
        {"id": "inv-2", "artist": "Miles Davis", "title": "Bitches Brew", "year": 1970, "genres": ["jazz"], "price": "$34.00"},
        {"id": "inv-3", "artist": "Kraftwerk", "title": "Computer World", "year": 1981, "genres": ["electronic"]},
        {"id": "inv-4", "artist": "Bjork", "title": "Post", "year": 1995, "genres": ["electronic", "pop"]},
        {"id": "inv-5", "artist": "Slayer", "title": "Reign in Blood", "year": 1986, "genres": ["metal"]},
        {"id": "inv-6", "artist": "", "title": "Mystery Crate", "genres": null, "shelf": "B4"},
        "not a record"
    ])
}

pub fn inventory_records() -> Vec<InventoryRecord> {
    parse_inventory_json(&inventory().to_string()).expect("fixture inventory parses")
}

/// Writes `value` as `name` inside a fresh temp dir. Keep the dir alive for the test.
pub fn write_json(name: &str, value: &Value) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, value.to_string()).expect("write fixture");
    (dir, path)
}

pub fn test_app_with_source(source: Box<dyn InventorySource>) -> Router {
    let cache = InventoryCache::new(source, Duration::from_secs(3600), StalePolicy::ServeStale);
    let config = ServerConfig {
        requests_logging_level: RequestsLoggingLevel::None,
        ..Default::default()
    };
    make_app(config, cache, MatchingSettings::default(), TEST_HASH.to_owned())
}

pub fn test_app() -> Router {
    test_app_with_source(Box::new(MemoryInventorySource::new(inventory_records())))
}
