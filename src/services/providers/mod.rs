/// Movie metadata provider abstraction
///
/// Enrichment looks titles up through this trait so the TMDB client can be
/// swapped for another source, or mocked in tests.
use crate::{error::AppResult, models::MovieMetadata};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Searches for a title, optionally narrowed by release year
    ///
    /// Returns the best match's presentation metadata, or `None` when the
    /// provider has no match.
    async fn search_movie(&self, title: &str, year: Option<i32>) -> AppResult<Option<MovieMetadata>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
