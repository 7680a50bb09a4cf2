//! Parsing of collection and inventory documents.
//!
//! The top-level document must be list-like; anything else is rejected
//! before scoring. Inside the list every record is decoded on its own so a
//! single bad entry can't take the batch down with it.

use super::discogs::DiscogsCollectionItem;
use super::models::{CollectionRecord, InventoryRecord};
use crate::matching::MatchError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode_items<T: DeserializeOwned>(kind: &str, items: &[Value]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                warn!("Skipping {} entry #{}: expected an object, got {}", kind, index, describe(item));
                return None;
            }
            match T::deserialize(item) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("Skipping {} entry #{}: {}", kind, index, err);
                    None
                }
            }
        })
        .collect()
}

fn collection_item(item: &Value) -> Option<Result<CollectionRecord, serde_json::Error>> {
    if !item.is_object() {
        return None;
    }
    Some(if item.get("basic_information").is_some() {
        DiscogsCollectionItem::deserialize(item).map(CollectionRecord::from)
    } else {
        CollectionRecord::deserialize(item)
    })
}

/// Decode a collection from an already-parsed JSON value.
///
/// Accepts a plain array of records, an array of Discogs collection items
/// (or a mix of both), or a Discogs export object with a `releases` array.
pub fn collection_from_value(value: &Value) -> Result<Vec<CollectionRecord>, MatchError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("releases") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(MatchError::InvalidInput(
                    "collection must be an array of records".to_string(),
                ))
            }
        },
        other => {
            return Err(MatchError::InvalidInput(format!(
                "collection must be an array of records, got {}",
                describe(other)
            )))
        }
    };

    let records: Vec<CollectionRecord> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match collection_item(item) {
            Some(Ok(record)) => Some(record),
            Some(Err(err)) => {
                warn!("Skipping collection entry #{}: {}", index, err);
                None
            }
            None => {
                warn!(
                    "Skipping collection entry #{}: expected an object, got {}",
                    index,
                    describe(item)
                );
                None
            }
        })
        .collect();

    debug!("Decoded {} of {} collection entries", records.len(), items.len());
    Ok(records)
}

/// Decode an inventory from an already-parsed JSON value.
pub fn inventory_from_value(value: &Value) -> Result<Vec<InventoryRecord>, MatchError> {
    match value {
        Value::Array(items) => {
            let records: Vec<InventoryRecord> = decode_items("inventory", items);
            debug!("Decoded {} of {} inventory entries", records.len(), items.len());
            Ok(records)
        }
        other => Err(MatchError::InvalidInput(format!(
            "inventory must be an array of records, got {}",
            describe(other)
        ))),
    }
}

fn parse_document(kind: &str, json: &str) -> Result<Value, MatchError> {
    serde_json::from_str(json)
        .map_err(|err| MatchError::InvalidInput(format!("{} is not valid JSON: {}", kind, err)))
}

pub fn parse_collection_json(json: &str) -> Result<Vec<CollectionRecord>, MatchError> {
    collection_from_value(&parse_document("collection", json)?)
}

pub fn parse_inventory_json(json: &str) -> Result<Vec<InventoryRecord>, MatchError> {
    inventory_from_value(&parse_document("inventory", json)?)
}

pub fn load_collection_file(path: &Path) -> Result<Vec<CollectionRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read collection file: {:?}", path))?;
    parse_collection_json(&content)
        .with_context(|| format!("Failed to parse collection file: {:?}", path))
}

pub fn load_inventory_file(path: &Path) -> Result<Vec<InventoryRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read inventory file: {:?}", path))?;
    parse_inventory_json(&content)
        .with_context(|| format!("Failed to parse inventory file: {:?}", path))
}
