/// TMDB search API provider
///
/// Uses `/search/movie` and takes the first result, which TMDB orders by
/// relevance.
use crate::{
    error::{AppError, AppResult},
    models::{
        metadata::{backdrop_url, non_empty, poster_url},
        MovieMetadata,
    },
    services::providers::MetadataProvider,
};
use chrono::Utc;
use reqwest::Client as HttpClient;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn convert_result(&self, result: SearchResult) -> MovieMetadata {
        MovieMetadata {
            image_url: non_empty(result.poster_path.as_deref()).map(|path| poster_url(&path)),
            backdrop_url: non_empty(result.backdrop_path.as_deref()).map(|path| backdrop_url(&path)),
            overview: non_empty(result.overview.as_deref()),
            rating: result.vote_average,
            fetched_at: Some(Utc::now()),
        }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movie(&self, title: &str, year: Option<i32>) -> AppResult<Option<MovieMetadata>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search title cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search/movie", self.api_url);
        let mut query = vec![
            ("api_key", self.api_key.clone()),
            ("query", title.to_string()),
        ];
        if let Some(year) = year {
            query.push(("year", year.to_string()));
        }

        let response = self.http_client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response.json().await?;
        let metadata = search
            .results
            .into_iter()
            .next()
            .map(|result| self.convert_result(result));

        tracing::debug!(
            title = %title,
            year = ?year,
            found = metadata.is_some(),
            "TMDB search completed"
        );

        Ok(metadata)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
