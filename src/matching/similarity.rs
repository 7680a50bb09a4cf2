//! Per-dimension similarity between one candidate and a user profile.
//!
//! Every function returns a value in `[0, 1]`.

use super::normalize::normalize_artist_name;
use super::profile::decade_of;
use std::collections::HashMap;

/// Era score for a candidate with no known year.
pub const UNKNOWN_ERA_SIMILARITY: f64 = 0.5;
/// Era score when a neighbouring decade is present in the profile.
pub const ADJACENT_ERA_SIMILARITY: f64 = 0.7;
/// Era score for a decade the profile doesn't touch at all.
pub const DISTANT_ERA_SIMILARITY: f64 = 0.3;
/// Share of the dated collection a decade needs for a full era score.
pub const FULL_ERA_SHARE: f64 = 0.25;

/// Dice coefficient over character bigrams.
///
/// Whitespace is ignored. Identical strings score 1.0 (two empty strings
/// included); otherwise a string shorter than two characters scores 0.
/// Repeated bigrams are matched at most as many times as they occur.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut a_bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *a_bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = a_bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2 * intersection) as f64 / (a.len() + b.len() - 2) as f64
}

/// Fraction of the candidate's genres the user already owns.
///
/// Not weighted by how often the user owns them.
pub fn genre_similarity(genre_counts: &HashMap<String, u32>, candidate_genres: &[String]) -> f64 {
    if candidate_genres.is_empty() {
        return 0.0;
    }
    let owned = candidate_genres
        .iter()
        .filter(|genre| genre_counts.contains_key(&genre.to_lowercase()))
        .count();
    owned as f64 / candidate_genres.len() as f64
}

/// Best fuzzy match of each candidate credit against the user's artists,
/// averaged across credits.
///
/// Only a missing artist scores 0 outright. A credit that normalizes to ""
/// is still compared, and matches an owned credit that did the same.
pub fn artist_similarity(artist_counts: &HashMap<String, u32>, candidate_artist: &str) -> f64 {
    if candidate_artist.is_empty() {
        return 0.0;
    }
    let normalized = normalize_artist_name(candidate_artist);

    let credits: Vec<&str> = normalized
        .split(|c: char| c == ',' || c == ';')
        .map(str::trim)
        .collect();

    let total: f64 = credits
        .iter()
        .map(|credit| {
            artist_counts
                .keys()
                .map(|owned| dice_coefficient(credit, owned))
                .fold(0.0, f64::max)
        })
        .sum();

    (total / credits.len() as f64).min(1.0)
}

/// How well the candidate's decade fits the user's collection.
pub fn era_similarity(era_counts: &HashMap<i32, u32>, candidate_year: Option<i32>) -> f64 {
    let Some(year) = candidate_year else {
        return UNKNOWN_ERA_SIMILARITY;
    };
    let decade = decade_of(year);
    let total: u32 = era_counts.values().sum();

    if let Some(&count) = era_counts.get(&decade) {
        if count > 0 && total > 0 {
            return (count as f64 / (total as f64 * FULL_ERA_SHARE)).min(1.0);
        }
    }

    let has_neighbour = [decade - 10, decade + 10]
        .iter()
        .any(|d| era_counts.get(d).is_some_and(|c| *c > 0));
    if has_neighbour {
        ADJACENT_ERA_SIMILARITY
    } else {
        DISTANT_ERA_SIMILARITY
    }
}
