//! MovieLens sources: the 100K pipe-separated release and the CSV releases.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

use crate::{
    error::DatasetError,
    models::{derive, Movie, MovieMetadata},
};

pub const SCALE_MAX: f64 = 5.0;
pub const METADATA_FILE: &str = "movie_metadata.json";

#[derive(Debug, Default, Clone, Copy)]
struct RatingStats {
    sum: f64,
    count: u64,
}

impl RatingStats {
    fn add(&mut self, rating: f64) {
        self.sum += rating;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Reads a latin-1 encoded file, mapping every byte to the matching code point
pub(crate) fn read_latin1(path: &Path) -> Result<String, DatasetError> {
    let bytes = fs::read(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(bytes.iter().map(|&b| b as char).collect())
}

fn parse_error(file: &str, line: usize, reason: impl Into<String>) -> DatasetError {
    DatasetError::Parse {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

/// Genre names from `u.genre`, ordered by their flag index
fn read_genre_names(path: &Path) -> Result<Vec<String>, DatasetError> {
    let text = read_latin1(path)?;
    let mut entries: Vec<(u32, String)> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, id) = line
            .rsplit_once('|')
            .ok_or_else(|| parse_error("u.genre", index + 1, "expected name|id"))?;
        let id: u32 = id
            .trim()
            .parse()
            .map_err(|_| parse_error("u.genre", index + 1, format!("invalid genre id '{}'", id)))?;
        entries.push((id, name.trim().to_string()));
    }

    entries.sort_by_key(|(id, _)| *id);
    Ok(entries.into_iter().map(|(_, name)| name).collect())
}

/// Per-movie rating statistics from the tab-separated `u.data`
fn read_rating_stats_100k(path: &Path) -> Result<HashMap<String, RatingStats>, DatasetError> {
    let text = read_latin1(path)?;
    let mut stats: HashMap<String, RatingStats> = HashMap::new();

    for (index, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 3 {
            return Err(parse_error("u.data", index + 1, "expected user, item, rating"));
        }
        let rating: f64 = fields[2]
            .parse()
            .map_err(|_| parse_error("u.data", index + 1, format!("invalid rating '{}'", fields[2])))?;
        if !rating.is_finite() {
            tracing::debug!(line = index + 1, item = fields[1], "Skipping non-finite rating in u.data");
            continue;
        }
        stats.entry(fields[1].to_string()).or_default().add(rating);
    }

    Ok(stats)
}

/// Year of a 100K release date such as "01-Jan-1995"
fn release_year(raw: &str) -> Option<i32> {
    NaiveDate::parse_from_str(raw.trim(), "%d-%b-%Y")
        .ok()
        .map(|date| date.year())
}

/// Loads a `movie_metadata.json` file if enrichment has produced one
///
/// The file is optional, so a malformed file is logged and ignored rather than
/// failing the whole load.
pub fn read_metadata_file(path: &Path) -> HashMap<String, MovieMetadata> {
    let Ok(raw) = fs::read_to_string(path) else {
        return HashMap::new();
    };
    match serde_json::from_str(&raw) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed metadata file");
            HashMap::new()
        }
    }
}

/// Reads the MovieLens 100K release (`u.item`, `u.data`, `u.genre`)
pub fn read_movielens_100k(data_dir: &Path) -> Result<Vec<Movie>, DatasetError> {
    let genre_names = read_genre_names(&data_dir.join("u.genre"))?;
    let stats = read_rating_stats_100k(&data_dir.join("u.data"))?;
    let metadata = read_metadata_file(&data_dir.join(METADATA_FILE));
    let items = read_latin1(&data_dir.join("u.item"))?;

    let mut movies = Vec::new();
    for (index, line) in items.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < 2 {
            return Err(parse_error("u.item", index + 1, "expected id|title|..."));
        }

        let id = fields[0].trim();
        let title = fields[1].trim();
        let year = derive::parse_year_from_title(title)
            .or_else(|| fields.get(2).and_then(|raw| release_year(raw)));

        let genres: Vec<String> = genre_names
            .iter()
            .enumerate()
            .filter(|(flag, _)| fields.get(5 + flag).map(|f| f.trim()) == Some("1"))
            .map(|(_, name)| name.clone())
            .collect();

        let rating = stats.get(id).copied().unwrap_or_default();
        let mut movie = Movie::new(id, title, year, genres, rating.average(), rating.count, SCALE_MAX)
            .with_popularity(rating.count as f64);
        if let Some(meta) = metadata.get(id) {
            movie = movie.with_display(meta.to_display());
        }
        movies.push(movie);
    }

    tracing::info!(
        movies = movies.len(),
        rated = stats.len(),
        genres = genre_names.len(),
        enriched = metadata.len(),
        "Read MovieLens 100K catalog"
    );

    Ok(movies)
}

#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "movieId")]
    movie_id: String,
    title: String,
    #[serde(default)]
    genres: String,
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "movieId")]
    movie_id: String,
    rating: f64,
}

/// Reads a MovieLens CSV release (`movies.csv`, `ratings.csv`)
pub fn read_movielens_csv(data_dir: &Path) -> Result<Vec<Movie>, DatasetError> {
    let mut stats: HashMap<String, RatingStats> = HashMap::new();
    let mut ratings = csv::Reader::from_path(data_dir.join("ratings.csv"))?;
    for row in ratings.deserialize() {
        let row: RatingRow = row?;
        if !row.rating.is_finite() {
            tracing::debug!(movie_id = %row.movie_id, "Skipping non-finite rating in ratings.csv");
            continue;
        }
        stats.entry(row.movie_id).or_default().add(row.rating);
    }

    let mut reader = csv::Reader::from_path(data_dir.join("movies.csv"))?;
    let mut movies = Vec::new();
    for row in reader.deserialize() {
        let row: MovieRow = row?;
        let rating = stats.get(&row.movie_id).copied().unwrap_or_default();
        let year = derive::parse_year_from_title(&row.title);
        movies.push(
            Movie::new(
                row.movie_id,
                row.title,
                year,
                derive::split_genres(&row.genres),
                rating.average(),
                rating.count,
                SCALE_MAX,
            )
            .with_popularity(rating.count as f64),
        );
    }

    tracing::info!(
        movies = movies.len(),
        rated = stats.len(),
        "Read MovieLens CSV catalog"
    );

    Ok(movies)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::{fs, path::Path};

    pub const U_GENRE: &str = "unknown|0\nAction|1\nComedy|2\nDrama|3\nRomance|4\n\n";

    pub const U_ITEM: &str = "\
1|Toy Story (1995)|01-Jan-1995||http://example.com|0|0|1|0|0
2|GoldenEye (1995)|01-Jan-1995||http://example.com|0|1|0|0|0
3|Untitled|15-Mar-1972||http://example.com|1|0|0|0|0
4|Caf\u{e9} Society (1998)|||http://example.com|0|0|1|1|1
";

    pub const U_DATA: &str = "1\t1\t5\t881250949\n2\t1\t4\t881250949\n1\t2\t3\t881250950\n3\t4\t2\t881250951\n";

    /// Writes a MovieLens 100K fixture, encoding `u.item` as latin-1
    pub fn write_100k(dir: &Path) {
        fs::write(dir.join("u.genre"), U_GENRE).unwrap();
        let latin1: Vec<u8> = U_ITEM.chars().map(|c| c as u8).collect();
        fs::write(dir.join("u.item"), latin1).unwrap();
        fs::write(dir.join("u.data"), U_DATA).unwrap();
    }
}
