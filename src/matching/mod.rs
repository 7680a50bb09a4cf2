//! Collection-to-inventory matching.
//!
//! A [`UserProfile`] is built from the user's collection, then every
//! inventory candidate is scored on genre coverage, fuzzy artist
//! similarity and era proximity. Candidates above the threshold are
//! returned best first.

mod engine;
mod error;
mod normalize;
mod profile;
mod similarity;
mod summary;

pub use engine::{
    match_collection, match_json, MatchDetails, MatchResult, MatchWeights, MatchingEngine,
    DEFAULT_THRESHOLD,
};
pub use error::MatchError;
pub use normalize::normalize_artist_name;
pub use profile::{decade_of, UserProfile};
pub use similarity::{artist_similarity, dice_coefficient, era_similarity, genre_similarity};
pub use summary::{CollectionSummary, CountEntry};
