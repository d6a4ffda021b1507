//! Interactive recommendation session
//!
//! Usage:
//!   movie-expert-cli [--dataset <key>] [--data-dir <dir>]
//!
//! Examples:
//!   movie-expert-cli --dataset tmdb
//!   movie-expert-cli --dataset merged --data-dir ./data

use anyhow::Context;
use clap::Parser;
use movie_expert::{
    config::Config,
    datasets,
    engine::{select_explanations, RuleEngine},
    models::{DatasetContext, PreferenceInput},
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "movie-expert-cli")]
#[command(about = "Rule-based movie recommendations from the terminal")]
#[command(version)]
struct Cli {
    /// Dataset to load: movielens-100k, movielens, tmdb or merged (auto-detected if omitted)
    #[arg(short, long)]
    dataset: Option<String>,

    /// Directory holding the dataset files (defaults to DATA_DIR or ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    movie_expert::init_tracing("warn");
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::from_env()?;
    let data_dir = cli.data_dir.unwrap_or(config.data_dir);
    let dataset = cli.dataset.or(config.dataset);

    let context = datasets::load_data(&data_dir, dataset.as_deref());
    if let Some(error) = &context.error {
        eprintln!("{}", error);
        return Ok(ExitCode::FAILURE);
    }

    let engine = RuleEngine::new(Arc::new(context));
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let preferences = ask_preferences(&mut input, engine.context())?;

    let (prefs, inference) = engine.recommend(&preferences)?;
    if let Some(message) = &inference.message {
        println!("{}", message);
        return Ok(ExitCode::SUCCESS);
    }

    println!("\nTOP RECOMMENDATIONS");
    for (rank, result) in inference.top(prefs.top_k).iter().enumerate() {
        let movie = result.movie;
        let year = movie.year.map_or_else(|| "Unknown".to_string(), |y| y.to_string());
        let genres = if movie.genres.is_empty() {
            "Unknown".to_string()
        } else {
            movie.genres.join(", ")
        };
        println!("{}. {} ({})", rank + 1, movie.title, year);
        println!("   Genres: {}", genres);
        println!("   Rating: {:.2} | Count: {}", movie.rating, movie.rating_count);
        println!(
            "   Score: {:.2} | Rules fired: {}",
            result.score(),
            result.trace.fired.len()
        );
        for firing in select_explanations(&result.trace.fired) {
            println!("   Why: {} ({})", firing.explanation, firing.rule_id);
        }
        println!("{}", "-".repeat(60));
    }

    Ok(ExitCode::SUCCESS)
}

fn prompt(input: &mut impl BufRead, label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Comma separated genres, keeping only names from the vocabulary
fn parse_genre_list(raw: &str, vocabulary: &[String]) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|genre| vocabulary.iter().any(|known| known == genre))
        .map(str::to_string)
        .collect()
}

/// Parses a number, treating blank or malformed input as "use the default"
fn parse_number<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

fn ask_genres(input: &mut impl BufRead, label: &str, vocabulary: &[String]) -> anyhow::Result<Vec<String>> {
    if vocabulary.is_empty() {
        return Ok(Vec::new());
    }
    println!("{}", label);
    println!("{}", vocabulary.join(", "));
    let raw = prompt(input, "Comma-separated (or blank): ")?;
    Ok(parse_genre_list(&raw, vocabulary))
}

fn ask_preferences(input: &mut impl BufRead, context: &DatasetContext) -> anyhow::Result<PreferenceInput> {
    let preferred_genres = ask_genres(input, "Preferred genres:", &context.genres)?;
    let excluded_genres = ask_genres(input, "Excluded genres:", &context.genres)?;

    let bounds = format!("[{}-{}]", context.year_min, context.year_max);
    let year_start = parse_number(&prompt(input, &format!("Year start {}: ", bounds))?)
        .unwrap_or(context.year_min);
    let year_end = parse_number(&prompt(input, &format!("Year end {}: ", bounds))?)
        .unwrap_or(context.year_max);

    let min_rating = parse_number(&prompt(
        input,
        &format!("Minimum rating (0-{}): ", context.rating_scale_max),
    )?);
    let top_k = parse_number(&prompt(input, "Top K (default 10): ")?);

    let capabilities = context.capabilities;
    let popularity_preference = if capabilities.has_popularity {
        Some(prompt(input, "Popularity preference (any/popular/obscure) [any]: ")?)
    } else {
        None
    };
    let runtime_max = if capabilities.has_runtime {
        parse_number(&prompt(input, "Max runtime in minutes (blank to skip): ")?)
    } else {
        None
    };
    let language = if capabilities.has_language {
        Some(prompt(input, "Language preference (e.g., en; blank to skip): ")?)
    } else {
        None
    };

    Ok(PreferenceInput {
        preferred_genres,
        excluded_genres,
        year_range: Some((year_start, year_end)),
        min_rating,
        popularity_preference,
        runtime_max,
        language,
        top_k,
    })
}
