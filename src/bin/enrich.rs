//! Backfills poster, backdrop and overview metadata from TMDB
//!
//! Usage:
//!   movie-expert-enrich [--data-dir <dir>]
//!
//! Requires TMDB_API_KEY in the environment or a `.env` file.

use clap::Parser;
use movie_expert::{config::Config, services::enrichment, services::TmdbProvider};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "movie-expert-enrich")]
#[command(about = "Fetch display metadata for the local movie catalogs")]
#[command(version)]
struct Cli {
    /// Directory holding the dataset files (defaults to DATA_DIR or ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    movie_expert::init_tracing("warn,movie_expert=info");
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let api_key = config.require_tmdb_api_key()?.to_string();
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data_dir.clone());

    let provider = TmdbProvider::new(api_key, config.tmdb_api_url.clone());
    let done = enrichment::enrich_data_dir(&provider, &data_dir).await?;

    for (path, summary) in done {
        println!(
            "{}: {} looked up, {} enriched, {} already had images, {} failed",
            path.display(),
            summary.looked_up,
            summary.enriched,
            summary.skipped,
            summary.failed
        );
    }

    Ok(())
}
