//! Scoring, thresholding and ranking of inventory candidates.

use super::error::MatchError;
use super::profile::UserProfile;
use super::similarity::{artist_similarity, era_similarity, genre_similarity};
use crate::records::{collection_from_value, inventory_from_value, CollectionRecord, InventoryRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::debug;

/// Minimum score a candidate needs to be returned.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Per-dimension weights of the aggregate score.
///
/// The defaults sum to 1.2: era acts as a bonus on top of a genre/artist
/// base that already spans `[0, 1]`. They are applied as-is, never
/// renormalized, since that would move candidates across the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub genre: f64,
    pub artist: f64,
    pub era: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            genre: 0.5,
            artist: 0.5,
            era: 0.2,
        }
    }
}

impl MatchWeights {
    pub fn validate(&self) -> Result<(), MatchError> {
        for (name, weight) in [("genre", self.genre), ("artist", self.artist), ("era", self.era)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(MatchError::InvalidWeights(format!(
                    "{} weight must be a finite non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }

    /// Upper bound of any score produced with these weights.
    pub fn max_score(&self) -> f64 {
        self.genre + self.artist + self.era
    }
}

/// Breakdown of a match score. Each component lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    pub genre_similarity: f64,
    pub artist_similarity: f64,
    pub era_similarity: f64,
}

/// An inventory record that passed the threshold, with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub record: InventoryRecord,
    pub match_score: f64,
    pub match_details: MatchDetails,
}

#[derive(Debug, Clone)]
pub struct MatchingEngine {
    weights: MatchWeights,
    threshold: f64,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl MatchingEngine {
    pub fn new(weights: MatchWeights, threshold: f64) -> Result<Self, MatchError> {
        weights.validate()?;
        if !threshold.is_finite() {
            return Err(MatchError::InvalidThreshold(threshold));
        }
        Ok(Self { weights, threshold })
    }

    pub fn with_threshold(threshold: f64) -> Result<Self, MatchError> {
        Self::new(MatchWeights::default(), threshold)
    }

    pub fn weights(&self) -> MatchWeights {
        self.weights
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score a single candidate against an already-built profile.
    pub fn score(&self, profile: &UserProfile, candidate: &InventoryRecord) -> (f64, MatchDetails) {
        let details = MatchDetails {
            genre_similarity: genre_similarity(&profile.genre_counts, &candidate.genres),
            artist_similarity: artist_similarity(&profile.artist_counts, &candidate.artist),
            era_similarity: era_similarity(&profile.era_counts, candidate.year),
        };
        let score = self.weights.genre * details.genre_similarity
            + self.weights.artist * details.artist_similarity
            + self.weights.era * details.era_similarity;
        (score, details)
    }

    /// Rank `inventory` against a profile built from `collection`.
    ///
    /// Only candidates scoring at least the threshold are returned, best
    /// first. Equal scores keep their inventory order. Deterministic for a
    /// fixed input; an empty result is a valid outcome.
    pub fn match_inventory(
        &self,
        collection: &[CollectionRecord],
        inventory: &[InventoryRecord],
    ) -> Vec<MatchResult> {
        let profile = UserProfile::build(collection);
        self.match_profile(&profile, inventory)
    }

    pub fn match_profile(
        &self,
        profile: &UserProfile,
        inventory: &[InventoryRecord],
    ) -> Vec<MatchResult> {
        let mut matches: Vec<MatchResult> = inventory
            .iter()
            .filter_map(|candidate| {
                let (score, details) = self.score(profile, candidate);
                if score >= self.threshold {
                    Some(MatchResult {
                        record: candidate.clone(),
                        match_score: score,
                        match_details: details,
                    })
                } else {
                    None
                }
            })
            .collect();

        // Stable sort, ties stay in input order
        matches.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
        });

        debug!(
            "Matched {} of {} candidates (threshold {}, {} genres, {} artists, {} decades in profile)",
            matches.len(),
            inventory.len(),
            self.threshold,
            profile.genre_counts.len(),
            profile.artist_counts.len(),
            profile.era_counts.len()
        );

        matches
    }
}

/// Match with the default weights.
pub fn match_collection(
    collection: &[CollectionRecord],
    inventory: &[InventoryRecord],
    threshold: f64,
) -> Result<Vec<MatchResult>, MatchError> {
    Ok(MatchingEngine::with_threshold(threshold)?.match_inventory(collection, inventory))
}

/// Match loosely-typed JSON inputs. Both must be list-like, otherwise
/// nothing is scored.
pub fn match_json(
    collection: &Value,
    inventory: &Value,
    threshold: f64,
) -> Result<Vec<MatchResult>, MatchError> {
    let engine = MatchingEngine::with_threshold(threshold)?;
    let collection = collection_from_value(collection)?;
    let inventory = inventory_from_value(inventory)?;
    Ok(engine.match_inventory(&collection, &inventory))
}
