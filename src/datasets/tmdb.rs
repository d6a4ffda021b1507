//! TMDB 5000 catalog (`tmdb_5000_movies.csv`).

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::{
    error::DatasetError,
    models::{
        derive,
        metadata::{backdrop_url, non_empty, poster_url},
        DisplayMetadata, Movie,
    },
};

pub const SCALE_MAX: f64 = 10.0;
pub const CATALOG_FILE: &str = "tmdb_5000_movies.csv";

/// One CSV row; every column is optional so trimmed exports still load
#[derive(Debug, Default, Deserialize)]
struct TmdbRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    movie_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    original_title: Option<String>,
    #[serde(default)]
    genres: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    vote_average: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    vote_count: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    popularity: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    runtime: Option<f64>,
    #[serde(default)]
    original_language: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_url: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
}

/// Genre names from the JSON column, e.g. `[{"id": 28, "name": "Action"}]`
///
/// Unparseable values yield no genres.
fn parse_genre_column(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Vec::new();
    };
    let entries: Vec<Value> = serde_json::from_str(raw).unwrap_or_default();
    let names: Vec<&str> = entries
        .iter()
        .filter_map(|entry| entry.get("name").and_then(Value::as_str))
        .collect();
    derive::clean_genres(names)
}

/// Year of an ISO release date, tolerating dates with only a leading year
fn release_year(raw: Option<&str>) -> Option<i32> {
    let raw = raw?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.year())
        .ok()
        .or_else(|| raw.get(..4).and_then(|year| year.parse().ok()))
}

impl TmdbRow {
    fn display(&self) -> DisplayMetadata {
        let poster = non_empty(self.image_url.as_deref()).or_else(|| {
            non_empty(self.poster_path.as_deref()).map(|path| poster_url(&path))
        });
        let backdrop = non_empty(self.backdrop_url.as_deref()).or_else(|| {
            non_empty(self.backdrop_path.as_deref()).map(|path| backdrop_url(&path))
        });
        DisplayMetadata {
            overview: non_empty(self.overview.as_deref()),
            poster_url: poster,
            backdrop_url: backdrop,
        }
    }

    fn into_movie(self) -> Movie {
        let title = non_empty(self.title.as_deref())
            .or_else(|| non_empty(self.original_title.as_deref()))
            .unwrap_or_else(|| "Unknown".to_string());
        let id = non_empty(self.id.as_deref())
            .or_else(|| non_empty(self.movie_id.as_deref()))
            .unwrap_or_else(|| title.clone());

        let vote_count = self.vote_count.filter(|v| v.is_finite()).unwrap_or(0.0);
        let rating = self.vote_average.filter(|v| v.is_finite()).unwrap_or(0.0);
        let popularity = self.popularity.filter(|p| p.is_finite()).unwrap_or(vote_count);

        Movie::new(
            id,
            title,
            release_year(self.release_date.as_deref()),
            parse_genre_column(self.genres.as_deref()),
            rating,
            vote_count.max(0.0) as u64,
            SCALE_MAX,
        )
        .with_popularity(popularity)
        .with_runtime(self.runtime)
        .with_language(self.original_language.clone())
        .with_display(self.display())
    }
}

/// Reads a TMDB-shaped CSV file
pub fn read_tmdb_file(path: &Path) -> Result<Vec<Movie>, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut movies = Vec::new();
    for row in reader.deserialize() {
        let row: TmdbRow = row?;
        movies.push(row.into_movie());
    }

    tracing::info!(
        path = %path.display(),
        movies = movies.len(),
        with_runtime = movies.iter().filter(|m| m.runtime_minutes.is_some()).count(),
        with_language = movies.iter().filter(|m| m.language.is_some()).count(),
        "Read TMDB catalog"
    );

    Ok(movies)
}

pub fn read_tmdb(data_dir: &Path) -> Result<Vec<Movie>, DatasetError> {
    read_tmdb_file(&data_dir.join(CATALOG_FILE))
}
