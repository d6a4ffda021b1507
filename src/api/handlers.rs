use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    engine::{select_explanations, ScoredMovie},
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{DatasetKind, Firing, PreferenceInput},
};

use super::AppState;

// Response types

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub dataset: Option<DatasetKind>,
    pub movies: usize,
    pub genres: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
    pub rating_scale_max: f64,
    pub has_popularity: bool,
    pub has_runtime: bool,
    pub has_language: bool,
    pub rules: usize,
}

#[derive(Debug, Serialize)]
pub struct InferenceSummary {
    pub facts: usize,
    pub rules: usize,
    pub candidates: usize,
    pub scored: usize,
    pub rule_errors: usize,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub rating: f64,
    pub rating_count: u64,
    pub popularity: Option<f64>,
    pub runtime: Option<f64>,
    pub language: Option<String>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub score: f64,
    pub fired_count: usize,
    pub why: Vec<Firing>,
}

impl From<&ScoredMovie<'_>> for RecommendationResponse {
    fn from(scored: &ScoredMovie<'_>) -> Self {
        let movie = scored.movie;
        Self {
            id: movie.id.clone(),
            title: movie.title.clone(),
            year: movie.year,
            genres: movie.genres.clone(),
            rating: movie.rating,
            rating_count: movie.rating_count,
            popularity: movie.popularity,
            runtime: movie.runtime_minutes,
            language: movie.language.clone(),
            overview: movie.display.overview.clone(),
            poster_url: movie.display.poster_url.clone(),
            backdrop_url: movie.display.backdrop_url.clone(),
            score: scored.score(),
            fired_count: scored.trace.fired.len(),
            why: select_explanations(&scored.trace.fired)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub dataset: Option<DatasetKind>,
    pub summary: InferenceSummary,
    pub message: Option<String>,
    pub results: Vec<RecommendationResponse>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Describes the loaded dataset so front ends can build their preference forms
pub async fn config(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ConfigResponse>> {
    let engine = &state.engine;
    let context = engine.context();
    context.ensure_usable()?;

    tracing::debug!(request_id = %request_id, "Serving dataset config");

    Ok(Json(ConfigResponse {
        dataset: context.dataset,
        movies: context.movies.len(),
        genres: context.genres.clone(),
        year_min: context.year_min,
        year_max: context.year_max,
        rating_scale_max: context.rating_scale_max,
        has_popularity: context.capabilities.has_popularity,
        has_runtime: context.capabilities.has_runtime,
        has_language: context.capabilities.has_language,
        rules: engine.rules().len(),
    }))
}

/// Runs inference for one set of preferences
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<PreferenceInput>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    let Json(input) = payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    let engine = &state.engine;
    let (prefs, inference) = engine.recommend(&input)?;

    let results: Vec<RecommendationResponse> = inference
        .top(prefs.top_k)
        .iter()
        .map(RecommendationResponse::from)
        .collect();

    tracing::info!(
        request_id = %request_id,
        candidates = inference.candidates,
        returned = results.len(),
        rule_errors = inference.rule_errors,
        "Recommendation request completed"
    );

    Ok(Json(RecommendResponse {
        dataset: engine.context().dataset,
        summary: InferenceSummary {
            facts: inference.facts,
            rules: inference.rule_count,
            candidates: inference.candidates,
            scored: inference.results.len(),
            rule_errors: inference.rule_errors,
        },
        message: inference.message.clone(),
        results,
    }))
}
