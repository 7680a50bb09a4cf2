//! Collection overview handed to downstream consumers alongside the matches.
//!
//! Purely derived from the profile, so it is as deterministic as the
//! scoring path.

use super::profile::UserProfile;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// How many genres and artists the summary lists.
pub const SUMMARY_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry<K> {
    pub name: K,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub collection_size: usize,
    pub top_genres: Vec<CountEntry<String>>,
    pub top_artists: Vec<CountEntry<String>>,
    /// Every decade present, keyed by label ("1960s").
    pub decades: Vec<CountEntry<String>>,
}

/// Entries sorted by count descending, then by key ascending.
fn ranked<K: Ord + Hash + Clone>(counts: &HashMap<K, u32>, limit: Option<usize>) -> Vec<CountEntry<K>> {
    let mut entries: Vec<CountEntry<K>> = counts
        .iter()
        .map(|(name, count)| CountEntry {
            name: name.clone(),
            count: *count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

impl CollectionSummary {
    pub fn from_profile(profile: &UserProfile, collection_size: usize) -> Self {
        let decades = ranked(&profile.era_counts, None)
            .into_iter()
            .map(|entry| CountEntry {
                name: format!("{}s", entry.name),
                count: entry.count,
            })
            .collect();

        Self {
            collection_size,
            top_genres: ranked(&profile.genre_counts, Some(SUMMARY_TOP_N)),
            top_artists: ranked(&profile.artist_counts, Some(SUMMARY_TOP_N)),
            decades,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::CollectionRecord;

    #[test]
    fn test_summary_ordering() {
        let collection = vec![
            CollectionRecord::new("Radiohead", "OK Computer")
                .with_year(1997)
                .with_genres(&["Rock"]),
            CollectionRecord::new("Radiohead", "Kid A")
                .with_year(2000)
                .with_genres(&["Electronic", "Rock"]),
            CollectionRecord::new("Aphex Twin", "Drukqs")
                .with_year(2001)
                .with_genres(&["Electronic"]),
            CollectionRecord::new("Boards of Canada", "Geogaddi").with_genres(&["Electronic"]),
        ];
        let profile = UserProfile::build(&collection);
        let summary = CollectionSummary::from_profile(&profile, collection.len());

        assert_eq!(summary.collection_size, 4);
        assert_eq!(summary.top_genres[0], CountEntry { name: "electronic".to_string(), count: 3 });
        assert_eq!(summary.top_genres[1], CountEntry { name: "rock".to_string(), count: 2 });
        assert_eq!(summary.top_artists[0].name, "radiohead");
        // ties broken alphabetically
        assert_eq!(summary.top_artists[1].name, "aphex twin");
        assert_eq!(summary.top_artists[2].name, "boards of canada");
        assert_eq!(
            summary.decades,
            vec![
                CountEntry { name: "2000s".to_string(), count: 2 },
                CountEntry { name: "1990s".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_summary_truncates_to_top_n() {
        let collection: Vec<CollectionRecord> = (0..15)
            .map(|i| {
                let genre = format!("genre {}", (b'a' + i as u8) as char);
                CollectionRecord::new("Various", "Compilation").with_genres(&[genre.as_str()])
            })
            .collect();
        let profile = UserProfile::build(&collection);
        let summary = CollectionSummary::from_profile(&profile, collection.len());

        assert_eq!(summary.top_genres.len(), SUMMARY_TOP_N);
        assert_eq!(summary.top_genres[0].name, "genre a");
        assert_eq!(summary.top_artists.len(), 1);
        assert!(summary.decades.is_empty());
    }
}
