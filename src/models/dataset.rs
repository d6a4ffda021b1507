use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{derive, Movie, PopularityBand};
use crate::error::{AppError, AppResult};

const DEFAULT_YEAR_MIN: i32 = 1900;
const DEFAULT_YEAR_MAX: i32 = 2025;

/// Supported catalog sources
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    #[serde(rename = "movielens-100k")]
    MovieLens100k,
    #[serde(rename = "movielens")]
    MovieLens,
    #[serde(rename = "tmdb")]
    Tmdb,
    #[serde(rename = "merged")]
    Merged,
}

impl DatasetKind {
    /// Resolves a user-supplied dataset key, accepting the common aliases
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "movielens-100k" | "movielens_100k" | "ml-100k" => Some(DatasetKind::MovieLens100k),
            "movielens" => Some(DatasetKind::MovieLens),
            "tmdb" | "tmdb_5000" | "tmdb-5000" => Some(DatasetKind::Tmdb),
            "merged" | "combined" => Some(DatasetKind::Merged),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::MovieLens100k => "movielens-100k",
            DatasetKind::MovieLens => "movielens",
            DatasetKind::Tmdb => "tmdb",
            DatasetKind::Merged => "merged",
        }
    }

    /// Files that must be present in the data directory
    pub fn required_files(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::MovieLens100k => &["u.item", "u.data", "u.genre"],
            DatasetKind::MovieLens => &["movies.csv", "ratings.csv"],
            DatasetKind::Tmdb => &["tmdb_5000_movies.csv"],
            DatasetKind::Merged => &["u.item", "u.data", "u.genre", "tmdb_5000_movies.csv"],
        }
    }
}

impl Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which optional signals the loaded dataset provides at all
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capabilities {
    pub has_popularity: bool,
    pub has_runtime: bool,
    pub has_language: bool,
}

impl Capabilities {
    /// Detects capabilities from the fields the loader populated
    pub fn detect(movies: &[Movie]) -> Self {
        Self {
            has_popularity: movies.iter().any(|m| m.popularity.is_some()),
            has_runtime: movies.iter().any(|m| m.runtime_minutes.is_some()),
            has_language: movies.iter().any(|m| m.language.is_some()),
        }
    }
}

/// The loaded catalog plus everything derived from it
///
/// Built once per process and read-only afterwards. A context that failed to
/// load carries `error` and no movies.
#[derive(Debug, Clone)]
pub struct DatasetContext {
    pub dataset: Option<DatasetKind>,
    pub movies: Vec<Movie>,
    /// Sorted distinct genre vocabulary
    pub genres: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
    pub rating_scale_max: f64,
    pub capabilities: Capabilities,
    pub error: Option<String>,
}

impl DatasetContext {
    /// Builds a context, assigning popularity bands over the whole catalog
    pub fn new(dataset: DatasetKind, mut movies: Vec<Movie>, rating_scale_max: f64) -> Self {
        let capabilities = Capabilities::detect(&movies);

        if capabilities.has_popularity {
            let values: Vec<Option<f64>> = movies.iter().map(|m| m.popularity).collect();
            for (movie, band) in movies.iter_mut().zip(derive::popularity_bands(&values)) {
                movie.popularity_band = Some(band);
            }
        } else {
            for movie in movies.iter_mut() {
                movie.popularity_band = None;
            }
        }

        let mut genres: Vec<String> = movies.iter().flat_map(|m| m.genres.iter().cloned()).collect();
        genres.sort();
        genres.dedup();

        let years = movies.iter().filter_map(|m| m.year);
        let year_min = years.clone().min().unwrap_or(DEFAULT_YEAR_MIN);
        let year_max = years.max().unwrap_or(DEFAULT_YEAR_MAX);

        Self {
            dataset: Some(dataset),
            movies,
            genres,
            year_min,
            year_max,
            rating_scale_max,
            capabilities,
            error: None,
        }
    }

    /// A context for a dataset that could not be loaded
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            dataset: None,
            movies: Vec::new(),
            genres: Vec::new(),
            year_min: DEFAULT_YEAR_MIN,
            year_max: DEFAULT_YEAR_MAX,
            rating_scale_max: 0.0,
            capabilities: Capabilities::default(),
            error: Some(error.into()),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.error.is_none() && self.dataset.is_some() && !self.movies.is_empty()
    }

    /// Fails with [`AppError::NoDataset`] unless the catalog can be scored
    pub fn ensure_usable(&self) -> AppResult<()> {
        if self.is_usable() {
            return Ok(());
        }
        let message = self
            .error
            .clone()
            .unwrap_or_else(|| "The loaded catalog is empty".to_string());
        Err(AppError::NoDataset(message))
    }

    /// Count of movies per popularity band, for load-time logging
    pub fn popularity_summary(&self) -> [(PopularityBand, usize); 4] {
        let count = |band: PopularityBand| {
            self.movies
                .iter()
                .filter(|m| m.popularity_band == Some(band))
                .count()
        };
        [
            (PopularityBand::Popular, count(PopularityBand::Popular)),
            (PopularityBand::Average, count(PopularityBand::Average)),
            (PopularityBand::Obscure, count(PopularityBand::Obscure)),
            (PopularityBand::Unknown, count(PopularityBand::Unknown)),
        ]
    }
}
