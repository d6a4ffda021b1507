use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("No dataset loaded: {0}")]
    NoDataset(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NoDataset(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Errors raised while reading a dataset from disk
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("Unknown dataset '{0}'. Use movielens_100k, movielens, tmdb_5000 or merged.")]
    UnknownDataset(String),

    #[error("Missing dataset files for {dataset}: {}. Place the files in the data/ folder.", .missing.join(", "))]
    MissingFiles {
        dataset: String,
        missing: Vec<String>,
    },

    #[error(
        "Dataset not found. Place MovieLens 100K (u.item/u.data/u.genre), \
         MovieLens movies.csv + ratings.csv, or TMDB tmdb_5000_movies.csv in the data/ folder."
    )]
    NotFound,

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed {file} line {line}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },
}

/// Per-candidate rule evaluation failure
///
/// Raised when a record breaks a derived-field invariant that a rule relies on.
/// The scorer recovers by treating the rule as not fired for that candidate.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Rule {rule_id} found inconsistent record {movie_id}: {field}")]
    InconsistentRecord {
        rule_id: String,
        movie_id: String,
        field: &'static str,
    },
}
