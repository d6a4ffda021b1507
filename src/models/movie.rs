use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::derive;

/// Rating classification relative to the dataset's scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QualityBand {
    Excellent,
    Good,
    Average,
    Low,
    Unknown,
}

/// Quartile position of a movie's popularity signal within its catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PopularityBand {
    Popular,
    Average,
    Obscure,
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeCategory {
    Short,
    Medium,
    Long,
}

impl QualityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityBand::Excellent => "excellent",
            QualityBand::Good => "good",
            QualityBand::Average => "average",
            QualityBand::Low => "low",
            QualityBand::Unknown => "unknown",
        }
    }
}

impl PopularityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopularityBand::Popular => "popular",
            PopularityBand::Average => "average",
            PopularityBand::Obscure => "obscure",
            PopularityBand::Unknown => "unknown",
        }
    }
}

impl RuntimeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeCategory::Short => "short",
            RuntimeCategory::Medium => "medium",
            RuntimeCategory::Long => "long",
        }
    }
}

impl Display for QualityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for PopularityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for RuntimeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional presentation fields backfilled by metadata enrichment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplayMetadata {
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
}

/// A normalized catalog record
///
/// Derived fields (`decade`, `quality_band`, `runtime_category`) are computed by
/// the constructors. `popularity_band` is assigned by the dataset context, since
/// it depends on the whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub decade: Option<i32>,
    pub genres: Vec<String>,
    pub rating: f64,
    pub rating_count: u64,
    pub popularity: Option<f64>,
    pub runtime_minutes: Option<f64>,
    pub language: Option<String>,
    pub quality_band: QualityBand,
    pub popularity_band: Option<PopularityBand>,
    pub runtime_category: Option<RuntimeCategory>,
    #[serde(default)]
    pub display: DisplayMetadata,
    /// Origin dataset, set when catalogs are merged
    #[serde(default)]
    pub source: Option<String>,
}

impl Movie {
    /// Creates a record with its rating classified against `scale_max`
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        year: Option<i32>,
        genres: Vec<String>,
        rating: f64,
        rating_count: u64,
        scale_max: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year,
            decade: derive::decade(year),
            genres: derive::clean_genres(genres),
            rating,
            rating_count,
            popularity: None,
            runtime_minutes: None,
            language: None,
            quality_band: derive::quality_band(rating, scale_max),
            popularity_band: None,
            runtime_category: None,
            display: DisplayMetadata::default(),
            source: None,
        }
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_runtime(mut self, minutes: Option<f64>) -> Self {
        self.runtime_minutes = minutes.filter(|m| !m.is_nan());
        self.runtime_category = derive::runtime_category(self.runtime_minutes);
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }

    pub fn with_display(mut self, display: DisplayMetadata) -> Self {
        self.display = display;
        self
    }

    /// Rescales the rating and reclassifies it, used when merging catalogs
    pub fn rescaled(mut self, factor: f64, scale_max: f64) -> Self {
        self.rating *= factor;
        self.quality_band = derive::quality_band(self.rating, scale_max);
        self
    }

    /// Prefixes the id with its origin and records the source dataset
    pub fn namespaced(mut self, prefix: &str, source: &str) -> Self {
        self.id = format!("{}-{}", prefix, self.id);
        self.source = Some(source.to_string());
        self
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// Number of this movie's genres contained in `genres`
    pub fn genre_overlap(&self, genres: &[String]) -> usize {
        self.genres.iter().filter(|g| genres.contains(g)).count()
    }
}
