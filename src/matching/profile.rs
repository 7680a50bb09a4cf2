//! Frequency profile of a user's collection.

use super::normalize::normalize_artist_name;
use crate::records::CollectionRecord;
use std::collections::HashMap;

/// Separator between artist credits inside a collection record's `artist` field.
pub const COLLECTION_ARTIST_SEPARATOR: &str = ", ";

/// Start year of the decade containing `year` (1969 -> 1960, -5 -> -10).
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Counts over a whole collection. Built once per matching run and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    /// Lowercased genre or style -> occurrences.
    pub genre_counts: HashMap<String, u32>,
    /// Normalized artist name -> occurrences.
    pub artist_counts: HashMap<String, u32>,
    /// Decade start year -> number of dated records.
    pub era_counts: HashMap<i32, u32>,
}

impl UserProfile {
    pub fn build(collection: &[CollectionRecord]) -> Self {
        let mut profile = UserProfile::default();

        for record in collection {
            // Genres and styles share one namespace and are not deduplicated per record.
            for genre in record.genres.iter().chain(record.styles.iter()) {
                *profile.genre_counts.entry(genre.to_lowercase()).or_insert(0) += 1;
            }

            // Credits that normalize to nothing ("[Unknown Artist]") still count, under "".
            for credit in record.artist.split(COLLECTION_ARTIST_SEPARATOR) {
                let name = normalize_artist_name(credit);
                *profile.artist_counts.entry(name).or_insert(0) += 1;
            }

            if let Some(year) = record.year {
                *profile.era_counts.entry(decade_of(year)).or_insert(0) += 1;
            }
        }

        profile
    }

    /// Number of records that contributed a year.
    pub fn dated_records(&self) -> u32 {
        self.era_counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.genre_counts.is_empty() && self.artist_counts.is_empty() && self.era_counts.is_empty()
    }
}
