use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DisplayMetadata;

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Presentation metadata fetched for one title
///
/// This is also the value type of `movie_metadata.json`, keyed by MovieLens id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl MovieMetadata {
    pub fn has_poster(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn to_display(&self) -> DisplayMetadata {
        DisplayMetadata {
            overview: non_empty(self.overview.as_deref()),
            poster_url: non_empty(self.image_url.as_deref()),
            backdrop_url: non_empty(self.backdrop_url.as_deref()),
        }
    }
}

/// Full poster URL for a TMDB image path
pub fn poster_url(path: &str) -> String {
    format!("{}{}", POSTER_BASE_URL, path)
}

/// Full backdrop URL for a TMDB image path
pub fn backdrop_url(path: &str) -> String {
    format!("{}{}", BACKDROP_BASE_URL, path)
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
