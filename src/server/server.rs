use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::config::MatchingSettings;
use crate::inventory::{Freshness, InventoryCache, InventoryError, InventorySnapshot};
use crate::matching::{CollectionSummary, MatchError, MatchResult, MatchingEngine, UserProfile};
use crate::records::collection_from_value;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug, Default)]
struct InventoryQuery {
    #[serde(default)]
    force_refresh: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InventoryStatus {
    count: usize,
    fetched_at: DateTime<Utc>,
    freshness: Freshness,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MatchRequestBody {
    pub collection: Value,
    pub threshold: Option<f64>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchResponse {
    matches: Vec<MatchResult>,
    total_matches: usize,
    inventory_fetched_at: DateTime<Utc>,
    inventory_freshness: Freshness,
    summary: CollectionSummary,
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        ApiError::Unavailable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unavailable(message) => {
                warn!("Inventory unavailable: {}", message);
                (StatusCode::SERVICE_UNAVAILABLE, message)
            }
            ApiError::Internal(message) => {
                error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn fetch_inventory(
    inventory: &GuardedInventoryCache,
    force_refresh: bool,
) -> Result<InventorySnapshot, InventoryError> {
    // A panic while holding the lock can't leave the cache half-updated
    let mut cache = match inventory.lock() {
        Ok(cache) => cache,
        Err(poisoned) => poisoned.into_inner(),
    };
    cache.get(force_refresh)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn get_inventory(
    State(inventory): State<GuardedInventoryCache>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<InventoryStatus>, ApiError> {
    let snapshot = tokio::task::spawn_blocking(move || {
        fetch_inventory(&inventory, query.force_refresh)
    })
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))??;

    Ok(Json(InventoryStatus {
        count: snapshot.records.len(),
        fetched_at: snapshot.fetched_at,
        freshness: snapshot.freshness,
    }))
}

fn run_match(
    inventory: &GuardedInventoryCache,
    matching: &MatchingSettings,
    body: MatchRequestBody,
) -> Result<MatchResponse, ApiError> {
    // Reject bad input before touching the inventory
    let collection = collection_from_value(&body.collection)?;
    let engine = MatchingEngine::new(
        matching.weights,
        body.threshold.unwrap_or(matching.threshold),
    )?;

    let snapshot = fetch_inventory(inventory, body.force_refresh)?;

    let profile = UserProfile::build(&collection);
    let mut matches = engine.match_profile(&profile, &snapshot.records);
    let total_matches = matches.len();
    if let Some(limit) = body.limit.or(matching.limit) {
        matches.truncate(limit);
    }
    debug!(
        "Returning {} of {} matches for a collection of {}",
        matches.len(),
        total_matches,
        collection.len()
    );

    Ok(MatchResponse {
        matches,
        total_matches,
        inventory_fetched_at: snapshot.fetched_at,
        inventory_freshness: snapshot.freshness,
        summary: CollectionSummary::from_profile(&profile, collection.len()),
    })
}

async fn post_match(
    State(state): State<ServerState>,
    Json(body): Json<MatchRequestBody>,
) -> Result<Json<MatchResponse>, ApiError> {
    let inventory = state.inventory.clone();
    let matching = state.matching.clone();
    let response = tokio::task::spawn_blocking(move || run_match(&inventory, &matching, body))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(response))
}

pub fn make_app(
    config: ServerConfig,
    inventory: InventoryCache,
    matching: MatchingSettings,
    hash: String,
) -> Router {
    let state = ServerState::new(config, inventory, matching, hash);

    Router::new()
        .route("/", get(home))
        .route("/v1/inventory", get(get_inventory))
        .route("/v1/match", post(post_match))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    config: ServerConfig,
    inventory: InventoryCache,
    matching: MatchingSettings,
    hash: String,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, inventory, matching, hash);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    Ok(axum::serve(listener, app).await?)
}
