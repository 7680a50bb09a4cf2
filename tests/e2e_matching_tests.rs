//! End-to-end tests for matching through the public library API

mod common;

use common::{
    beatles_collection, discogs_collection, inventory, inventory_records, mixed_collection,
    write_json,
};
use cratedigger_server::matching::{match_collection, match_json, MatchError, MatchResult};
use cratedigger_server::records::{
    collection_from_value, load_collection_file, load_inventory_file,
};
use serde_json::json;

fn ids(matches: &[MatchResult]) -> Vec<&str> {
    matches
        .iter()
        .map(|m| m.record.id.as_deref().unwrap_or(""))
        .collect()
}

#[test]
fn test_typo_in_artist_still_matches() {
    let collection = collection_from_value(&beatles_collection()).unwrap();
    let matches = match_collection(&collection, &inventory_records(), 0.6).unwrap();

    assert_eq!(ids(&matches), vec!["inv-1"]);
    let best = &matches[0];
    assert_eq!(best.record.title, "Abbey Road");
    assert_eq!(best.match_details.genre_similarity, 1.0);
    assert_eq!(best.match_details.era_similarity, 1.0);
    assert!(best.match_details.artist_similarity > 0.9);
    assert!(best.match_details.artist_similarity < 1.0);
}

#[test]
fn test_name_variants_rank_and_tie_order() {
    // "Davis, Miles", "Kraftwerk (2)" and "Björk" all normalize onto the store's spelling
    let collection = collection_from_value(&mixed_collection()).unwrap();
    let matches = match_collection(&collection, &inventory_records(), 0.6).unwrap();

    // Miles Davis and Bjork tie at the maximum score and keep inventory order
    assert_eq!(ids(&matches), vec!["inv-2", "inv-4", "inv-1", "inv-3"]);
    assert!((matches[0].match_score - 1.2).abs() < 1e-9);
    assert!((matches[1].match_score - 1.2).abs() < 1e-9);
    for result in &matches {
        assert!(result.match_score >= 0.6);
    }
    for pair in matches.windows(2) {
        assert!(pair[0].match_score >= pair[1].match_score);
    }
}

#[test]
fn test_discogs_export_collection() {
    let collection = collection_from_value(&discogs_collection()).unwrap();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection[1].artist, "Kraftwerk, Karl Bartos");
    assert_eq!(collection[1].year, None);

    let matches = match_collection(&collection, &inventory_records(), 0.6).unwrap();
    assert_eq!(ids(&matches), vec!["inv-1", "inv-3"]);
}

#[test]
fn test_malformed_records_degrade_independently() {
    let matches = match_json(&beatles_collection(), &inventory(), 0.0).unwrap();

    // The bare string entry is skipped, every object yields a result
    assert_eq!(matches.len(), 6);

    let mystery = matches
        .iter()
        .find(|m| m.record.title == "Mystery Crate")
        .unwrap();
    assert_eq!(mystery.match_details.genre_similarity, 0.0);
    assert_eq!(mystery.match_details.artist_similarity, 0.0);
    assert_eq!(mystery.match_details.era_similarity, 0.5);
    assert!((mystery.match_score - 0.1).abs() < 1e-9);
}

#[test]
fn test_non_list_inputs_are_rejected() {
    assert!(matches!(
        match_json(&json!("The Beatles"), &inventory(), 0.6),
        Err(MatchError::InvalidInput(_))
    ));
    assert!(matches!(
        match_json(&beatles_collection(), &json!({"records": []}), 0.6),
        Err(MatchError::InvalidInput(_))
    ));
    assert!(matches!(
        match_json(&beatles_collection(), &inventory(), f64::NAN),
        Err(MatchError::InvalidThreshold(_))
    ));
}

#[test]
fn test_raising_threshold_never_adds_matches() {
    let collection = collection_from_value(&mixed_collection()).unwrap();
    let inventory = inventory_records();

    let mut previous: Option<Vec<String>> = None;
    for step in 0..=13 {
        let threshold = step as f64 * 0.1;
        let current: Vec<String> = match_collection(&collection, &inventory, threshold)
            .unwrap()
            .into_iter()
            .filter_map(|m| m.record.id)
            .collect();
        if let Some(previous) = &previous {
            assert!(current.iter().all(|id| previous.contains(id)));
        }
        previous = Some(current);
    }
    assert_eq!(previous, Some(vec![]));
}

#[test]
fn test_extra_inventory_fields_are_passed_through() {
    let matches = match_json(&beatles_collection(), &inventory(), 0.0).unwrap();
    let values: Vec<_> = matches
        .iter()
        .map(|m| serde_json::to_value(m).unwrap())
        .collect();

    let abbey_road = values.iter().find(|v| v["id"] == "inv-1").unwrap();
    assert_eq!(abbey_road["condition"], "VG+");
    assert_eq!(abbey_road["price"], 29.99);

    let bitches_brew = values.iter().find(|v| v["id"] == "inv-2").unwrap();
    assert_eq!(bitches_brew["price"], 34.0);

    let mystery = values.iter().find(|v| v["id"] == "inv-6").unwrap();
    assert_eq!(mystery["shelf"], "B4");
    assert!(mystery["matchDetails"].is_object());
}

#[test]
fn test_matching_from_files() {
    let (_collection_dir, collection_path) = write_json("collection.json", &mixed_collection());
    let (_inventory_dir, inventory_path) = write_json("inventory.json", &inventory());

    let collection = load_collection_file(&collection_path).unwrap();
    let inventory = load_inventory_file(&inventory_path).unwrap();
    assert_eq!(collection.len(), 4);
    assert_eq!(inventory.len(), 6);

    let first = match_collection(&collection, &inventory, 0.6).unwrap();
    let second = match_collection(&collection, &inventory, 0.6).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_bad_files_report_path() {
    let (_dir, path) = write_json("inventory.json", &json!({"not": "a list"}));
    let err = load_inventory_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("inventory.json"));
}
