//! Conversion of Discogs collection export items into collection records.

use super::lenient;
use super::models::CollectionRecord;
use serde::Deserialize;

/// Separator used when joining multiple artist credits into one field.
pub const ARTIST_CREDIT_SEPARATOR: &str = ", ";

/// One item of a Discogs `collection/folders/{id}/releases` page.
#[derive(Debug, Deserialize)]
pub struct DiscogsCollectionItem {
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub id: Option<String>,
    pub basic_information: DiscogsBasicInformation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiscogsBasicInformation {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::year")]
    pub year: Option<i32>,
    pub artists: Vec<DiscogsNamed>,
    pub labels: Vec<DiscogsNamed>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub genres: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub styles: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiscogsNamed {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
}

impl From<DiscogsCollectionItem> for CollectionRecord {
    fn from(item: DiscogsCollectionItem) -> Self {
        let info = item.basic_information;
        let artist = info
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(ARTIST_CREDIT_SEPARATOR);

        CollectionRecord {
            id: item.id,
            artist,
            title: info.title,
            year: info.year,
            labels: info.labels.into_iter().map(|l| l.name).collect(),
            genres: info.genres,
            styles: info.styles,
        }
    }
}
