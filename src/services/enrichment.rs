//! Offline backfill of poster, backdrop and overview fields.
//!
//! Two targets are supported: a TMDB-shaped CSV, rewritten in place with
//! `image_url`, `backdrop_url` and `overview` columns, and the MovieLens 100K
//! `u.item`, whose metadata goes to `movie_metadata.json`.

use anyhow::Context;
use csv::StringRecord;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    datasets::{movielens, tmdb},
    models::{derive, MovieMetadata},
    services::providers::MetadataProvider,
};

pub const MODERN_CATALOG_FILE: &str = "modern_movies.csv";
const ENRICHED_COLUMNS: [&str; 3] = ["image_url", "backdrop_url", "overview"];
/// `movie_metadata.json` is rewritten after this many lookups
const SAVE_EVERY: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub looked_up: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Search title with any parenthesised suffix removed: "Heat (1995)" -> "Heat"
pub fn clean_title(raw: &str) -> String {
    raw.split('(').next().unwrap_or_default().trim().to_string()
}

/// Looks a title up, logging and absorbing provider failures
async fn lookup(
    provider: &dyn MetadataProvider,
    title: &str,
    year: Option<i32>,
    summary: &mut EnrichmentSummary,
) -> Option<MovieMetadata> {
    summary.looked_up += 1;
    match provider.search_movie(title, year).await {
        Ok(Some(metadata)) => {
            summary.enriched += 1;
            Some(metadata)
        }
        Ok(None) => {
            tracing::debug!(title = %title, year = ?year, "No metadata match");
            None
        }
        Err(e) => {
            tracing::warn!(
                provider = provider.name(),
                title = %title,
                error = %e,
                "Metadata lookup failed"
            );
            summary.failed += 1;
            None
        }
    }
}

fn column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
}

fn field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Backfills display columns of a TMDB-shaped CSV in place.
///
/// Rows that already carry an `image_url` are copied unchanged. The output is
/// written to a sibling temp file that replaces the original once complete.
pub async fn enrich_modern_csv(
    provider: &dyn MetadataProvider,
    path: &Path,
) -> anyhow::Result<EnrichmentSummary> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut headers = reader.headers()?.clone();
    for name in ENRICHED_COLUMNS {
        if !headers.iter().any(|h| h == name) {
            headers.push_field(name);
        }
    }

    let title_col = column(&headers, &["title", "item_title"]);
    let year_col = column(&headers, &["year", "release_year"]);
    let image_col = column(&headers, &["image_url"]);
    let backdrop_col = column(&headers, &["backdrop_url"]);
    let overview_col = column(&headers, &["overview"]);

    let temp = temp_path(path);
    let mut writer = csv::Writer::from_path(&temp)
        .with_context(|| format!("Failed to create {}", temp.display()))?;
    writer.write_record(&headers)?;

    let mut summary = EnrichmentSummary::default();
    for record in reader.records() {
        let record = record?;
        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        fields.resize(headers.len(), String::new());

        if field(&record, image_col).is_some() {
            summary.skipped += 1;
            writer.write_record(&fields)?;
            continue;
        }

        let raw_title = field(&record, title_col).unwrap_or_default();
        let year = field(&record, year_col)
            .and_then(|y| y.parse().ok())
            .or_else(|| derive::parse_year_from_title(raw_title));
        let title = clean_title(raw_title);

        if let Some(metadata) = lookup(provider, &title, year, &mut summary).await {
            let updates = [
                (image_col, metadata.image_url),
                (backdrop_col, metadata.backdrop_url),
                (overview_col, metadata.overview),
            ];
            for (index, value) in updates {
                if let (Some(index), Some(value)) = (index, value) {
                    fields[index] = value;
                }
            }
        }
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    drop(writer);
    fs::rename(&temp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        looked_up = summary.looked_up,
        enriched = summary.enriched,
        skipped = summary.skipped,
        failed = summary.failed,
        "Enriched modern catalog"
    );

    Ok(summary)
}

fn save_metadata(path: &Path, metadata: &BTreeMap<String, MovieMetadata>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Fetches metadata for `u.item` titles into a JSON file keyed by movie id.
///
/// Ids that already have a poster are skipped, so interrupted runs resume.
pub async fn enrich_classic(
    provider: &dyn MetadataProvider,
    item_path: &Path,
    metadata_path: &Path,
) -> anyhow::Result<EnrichmentSummary> {
    let mut metadata: BTreeMap<String, MovieMetadata> =
        movielens::read_metadata_file(metadata_path).into_iter().collect();

    let items = movielens::read_latin1(item_path)?;
    let mut summary = EnrichmentSummary::default();

    for line in items.lines() {
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() < 2 {
            continue;
        }
        let movie_id = parts[0].trim();
        let raw_title = parts[1].trim();

        if metadata.get(movie_id).is_some_and(MovieMetadata::has_poster) {
            summary.skipped += 1;
            continue;
        }

        let year = derive::parse_year_from_title(raw_title);
        if let Some(found) = lookup(provider, &clean_title(raw_title), year, &mut summary).await {
            metadata.insert(movie_id.to_string(), found);
        }

        if summary.looked_up % SAVE_EVERY == 0 {
            save_metadata(metadata_path, &metadata)?;
        }
    }

    save_metadata(metadata_path, &metadata)?;

    tracing::info!(
        path = %metadata_path.display(),
        entries = metadata.len(),
        looked_up = summary.looked_up,
        enriched = summary.enriched,
        skipped = summary.skipped,
        failed = summary.failed,
        "Enriched classic catalog"
    );

    Ok(summary)
}

/// Enriches every supported source found in `data_dir`
pub async fn enrich_data_dir(
    provider: &dyn MetadataProvider,
    data_dir: &Path,
) -> anyhow::Result<Vec<(PathBuf, EnrichmentSummary)>> {
    let mut done = Vec::new();

    let modern = [MODERN_CATALOG_FILE, tmdb::CATALOG_FILE]
        .into_iter()
        .map(|name| data_dir.join(name))
        .find(|path| path.is_file());
    if let Some(path) = modern {
        let summary = enrich_modern_csv(provider, &path).await?;
        done.push((path, summary));
    }

    let item_path = data_dir.join("u.item");
    if item_path.is_file() {
        let metadata_path = data_dir.join(movielens::METADATA_FILE);
        let summary = enrich_classic(provider, &item_path, &metadata_path).await?;
        done.push((metadata_path, summary));
    }

    if done.is_empty() {
        tracing::warn!(data_dir = %data_dir.display(), "No catalog files to enrich");
    }

    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, services::providers::MockMetadataProvider};

    fn heat_metadata() -> MovieMetadata {
        MovieMetadata {
            image_url: Some("https://image.tmdb.org/t/p/w500/heat.jpg".to_string()),
            backdrop_url: None,
            overview: Some("A heist.".to_string()),
            rating: Some(7.9),
            fetched_at: None,
        }
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Heat (1995)"), "Heat");
        assert_eq!(clean_title("Seven (Se7en) (1995)"), "Seven");
        assert_eq!(clean_title("  Alien "), "Alien");
    }

    #[tokio::test]
    async fn test_enrich_modern_csv_skips_rows_with_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MODERN_CATALOG_FILE);
        fs::write(
            &path,
            "id,title,release_year,image_url\n1,Heat,1995,\n2,Alien,1979,https://example.com/alien.jpg\n",
        )
        .unwrap();

        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search_movie()
            .withf(|title, year| title.to_string() == "Heat" && *year == Some(1995))
            .times(1)
            .returning(|_, _| Ok(Some(heat_metadata())));
        provider.expect_name().return_const("mock");

        let summary = enrich_modern_csv(&provider, &path).await.unwrap();
        assert_eq!(summary.looked_up, 1);
        assert_eq!(summary.enriched, 1);
        assert_eq!(summary.skipped, 1);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["id", "title", "release_year", "image_url", "backdrop_url", "overview"]
        );
        let rows: Vec<StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][3], "https://image.tmdb.org/t/p/w500/heat.jpg");
        assert_eq!(&rows[0][5], "A heist.");
        assert_eq!(&rows[1][3], "https://example.com/alien.jpg");
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_enrich_classic_resumes_and_absorbs_failures() {
        let dir = tempfile::tempdir().unwrap();
        let item_path = dir.path().join("u.item");
        let metadata_path = dir.path().join(movielens::METADATA_FILE);
        fs::write(
            &item_path,
            "1|Toy Story (1995)|01-Jan-1995||url|0\n2|Heat (1995)|01-Jan-1995||url|0\n3|Broken (1990)|||url|0\n",
        )
        .unwrap();
        fs::write(
            &metadata_path,
            r#"{"1": {"image_url": "https://example.com/toy.jpg"}}"#,
        )
        .unwrap();

        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search_movie()
            .times(2)
            .returning(|title, _| match title {
                "Heat" => Ok(Some(heat_metadata())),
                _ => Err(AppError::ExternalApi("TMDB API returned status 500".to_string())),
            });
        provider.expect_name().return_const("mock");

        let summary = enrich_classic(&provider, &item_path, &metadata_path).await.unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.looked_up, 2);
        assert_eq!(summary.enriched, 1);
        assert_eq!(summary.failed, 1);

        let saved: BTreeMap<String, MovieMetadata> =
            serde_json::from_str(&fs::read_to_string(&metadata_path).unwrap()).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved["2"].overview.as_deref(), Some("A heist."));
    }

    #[tokio::test]
    async fn test_enrich_data_dir_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockMetadataProvider::new();
        let done = enrich_data_dir(&provider, dir.path()).await.unwrap();
        assert!(done.is_empty());
    }
}
