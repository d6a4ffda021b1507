//! Dataset ingestion: turns source files in a data directory into a
//! [`DatasetContext`].

pub mod movielens;
pub mod tmdb;

use std::path::Path;

use crate::{
    error::DatasetError,
    models::{DatasetContext, DatasetKind, Movie},
};

/// MovieLens ratings are doubled to sit on the TMDB 10-point scale when merged
const MERGED_RATING_FACTOR: f64 = 2.0;

/// Picks the first dataset whose files are all present, in preference order
pub fn detect_dataset(data_dir: &Path) -> Option<DatasetKind> {
    [
        DatasetKind::MovieLens100k,
        DatasetKind::MovieLens,
        DatasetKind::Tmdb,
    ]
    .into_iter()
    .find(|kind| missing_files(data_dir, *kind).is_empty())
}

fn missing_files(data_dir: &Path, kind: DatasetKind) -> Vec<String> {
    kind.required_files()
        .iter()
        .filter(|name| !data_dir.join(name).is_file())
        .map(|name| name.to_string())
        .collect()
}

/// Loads a dataset, folding any failure into an unavailable context.
///
/// `dataset` selects a source by key; `None` auto-detects one.
pub fn load_data(data_dir: &Path, dataset: Option<&str>) -> DatasetContext {
    match load(data_dir, dataset) {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(
                data_dir = %data_dir.display(),
                dataset = dataset.unwrap_or("auto"),
                error = %e,
                "Dataset unavailable"
            );
            DatasetContext::unavailable(e.to_string())
        }
    }
}

pub fn load(data_dir: &Path, dataset: Option<&str>) -> Result<DatasetContext, DatasetError> {
    let kind = match dataset.map(str::trim).filter(|key| !key.is_empty()) {
        Some(key) => {
            let kind = DatasetKind::from_key(key)
                .ok_or_else(|| DatasetError::UnknownDataset(key.to_string()))?;
            let missing = missing_files(data_dir, kind);
            if !missing.is_empty() {
                return Err(DatasetError::MissingFiles {
                    dataset: kind.to_string(),
                    missing,
                });
            }
            kind
        }
        None => detect_dataset(data_dir).ok_or(DatasetError::NotFound)?,
    };

    load_kind(data_dir, kind)
}

fn load_kind(data_dir: &Path, kind: DatasetKind) -> Result<DatasetContext, DatasetError> {
    let context = match kind {
        DatasetKind::MovieLens100k => DatasetContext::new(
            kind,
            movielens::read_movielens_100k(data_dir)?,
            movielens::SCALE_MAX,
        ),
        DatasetKind::MovieLens => DatasetContext::new(
            kind,
            movielens::read_movielens_csv(data_dir)?,
            movielens::SCALE_MAX,
        ),
        DatasetKind::Tmdb => {
            DatasetContext::new(kind, tmdb::read_tmdb(data_dir)?, tmdb::SCALE_MAX)
        }
        DatasetKind::Merged => DatasetContext::new(kind, read_merged(data_dir)?, tmdb::SCALE_MAX),
    };

    let [popular, average, obscure, unknown] = context.popularity_summary();
    tracing::info!(
        dataset = %kind,
        movies = context.movies.len(),
        genres = context.genres.len(),
        year_min = context.year_min,
        year_max = context.year_max,
        has_popularity = context.capabilities.has_popularity,
        has_runtime = context.capabilities.has_runtime,
        has_language = context.capabilities.has_language,
        popular = popular.1,
        average = average.1,
        obscure = obscure.1,
        unknown = unknown.1,
        "Loaded dataset"
    );

    Ok(context)
}

/// MovieLens 100K rescaled to the 10-point scale, followed by TMDB
fn read_merged(data_dir: &Path) -> Result<Vec<Movie>, DatasetError> {
    let classic = movielens::read_movielens_100k(data_dir)?
        .into_iter()
        .map(|movie| {
            movie
                .rescaled(MERGED_RATING_FACTOR, tmdb::SCALE_MAX)
                .namespaced("ml", DatasetKind::MovieLens100k.as_str())
        });
    let modern = tmdb::read_tmdb(data_dir)?
        .into_iter()
        .map(|movie| movie.namespaced("tmdb", DatasetKind::Tmdb.as_str()));

    Ok(classic.chain(modern).collect())
}
