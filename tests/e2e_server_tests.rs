//! End-to-end tests for the HTTP surface

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use common::{
    beatles_collection, discogs_collection, inventory_records, mixed_collection, test_app,
    test_app_with_source, TEST_HASH,
};
use cratedigger_server::inventory::{InventoryError, InventorySource};
use cratedigger_server::records::InventoryRecord;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

/// Serves the fixture inventory once, then fails every fetch.
struct FlakySource {
    fetches: Arc<AtomicUsize>,
}

impl InventorySource for FlakySource {
    fn fetch(&self) -> Result<Vec<InventoryRecord>, InventoryError> {
        if self.fetches.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(inventory_records())
        } else {
            Err(InventoryError::Malformed("listing page timed out".to_string()))
        }
    }

    fn describe(&self) -> String {
        "flaky store".to_string()
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_match(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/match")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_home_stats() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["hash"], TEST_HASH);
    assert!(body["uptime"].as_str().unwrap().starts_with("0d"));
}

#[tokio::test]
async fn test_inventory_is_cached_between_requests() {
    let app = test_app();

    let first = json_body(app.clone().oneshot(get("/v1/inventory")).await.unwrap()).await;
    assert_eq!(first["count"], 6);
    assert_eq!(first["freshness"], "fresh");

    let second = json_body(app.clone().oneshot(get("/v1/inventory")).await.unwrap()).await;
    assert_eq!(second["freshness"], "cached");
    assert_eq!(second["fetchedAt"], first["fetchedAt"]);

    let forced = json_body(
        app.oneshot(get("/v1/inventory?force_refresh=true"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(forced["freshness"], "fresh");
}

#[tokio::test]
async fn test_match_endpoint() {
    let response = test_app()
        .oneshot(post_match(json!({"collection": mixed_collection()})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["totalMatches"], 4);
    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 4);
    assert_eq!(matches[0]["id"], "inv-2");
    assert_eq!(matches[0]["matchDetails"]["artistSimilarity"], 1.0);
    assert!(body["inventoryFetchedAt"].is_string());

    let summary = &body["summary"];
    assert_eq!(summary["collectionSize"], 4);
    assert_eq!(summary["topGenres"][0], json!({"name": "electronic", "count": 2}));
    let decades: Vec<&str> = summary["decades"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(decades, vec!["1950s", "1960s", "1970s", "1990s"]);
}

#[tokio::test]
async fn test_match_threshold_and_limit() {
    let app = test_app();

    let everything = json_body(
        app.clone()
            .oneshot(post_match(
                json!({"collection": beatles_collection(), "threshold": 0.0}),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(everything["totalMatches"], 6);

    let top_two = json_body(
        app.oneshot(post_match(
            json!({"collection": beatles_collection(), "threshold": 0.0, "limit": 2}),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(top_two["totalMatches"], 6);
    assert_eq!(top_two["matches"].as_array().unwrap().len(), 2);
    assert_eq!(top_two["matches"][0], everything["matches"][0]);
    assert_eq!(top_two["matches"][1], everything["matches"][1]);
}

#[tokio::test]
async fn test_match_accepts_discogs_export() {
    let response = test_app()
        .oneshot(post_match(json!({"collection": discogs_collection()})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["totalMatches"], 2);
    assert_eq!(body["summary"]["collectionSize"], 2);
}

#[tokio::test]
async fn test_invalid_collection_is_bad_request() {
    let response = test_app()
        .oneshot(post_match(json!({"collection": {"artist": "The Beatles"}})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("collection"));
}

#[tokio::test]
async fn test_stale_inventory_is_served_after_failed_refresh() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let app = test_app_with_source(Box::new(FlakySource {
        fetches: fetches.clone(),
    }));

    let first = json_body(app.clone().oneshot(get("/v1/inventory")).await.unwrap()).await;
    assert_eq!(first["freshness"], "fresh");

    let response = app
        .clone()
        .oneshot(post_match(
            json!({"collection": beatles_collection(), "forceRefresh": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["inventoryFreshness"], "stale");
    assert_eq!(body["inventoryFetchedAt"], first["fetchedAt"]);
    assert_eq!(body["matches"][0]["id"], "inv-1");
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_no_inventory_is_service_unavailable() {
    let fetches = Arc::new(AtomicUsize::new(1));
    let app = test_app_with_source(Box::new(FlakySource { fetches }));

    let response = app
        .oneshot(post_match(json!({"collection": beatles_collection()})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("flaky store"));
}
