//! Derived classifications computed at ingestion time and read by the rules.

use regex::Regex;
use std::sync::LazyLock;

use super::{PopularityBand, QualityBand, RuntimeCategory};

static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d{4})\)\s*$").unwrap());

/// Genre labels that mean "no genre" and are never stored
const GENRE_SENTINELS: [&str; 2] = ["unknown", "(no genres listed)"];

/// Classifies a rating against the thresholds of its scale.
///
/// Scales up to 5 use 4.2 / 3.5 / 2.5; anything larger uses 8.0 / 7.0 / 5.5.
pub fn quality_band(rating: f64, scale_max: f64) -> QualityBand {
    if rating.is_nan() {
        return QualityBand::Unknown;
    }
    let (excellent, good, average) = if scale_max <= 5.0 {
        (4.2, 3.5, 2.5)
    } else {
        (8.0, 7.0, 5.5)
    };
    if rating >= excellent {
        QualityBand::Excellent
    } else if rating >= good {
        QualityBand::Good
    } else if rating >= average {
        QualityBand::Average
    } else {
        QualityBand::Low
    }
}

pub fn runtime_category(minutes: Option<f64>) -> Option<RuntimeCategory> {
    let minutes = minutes.filter(|m| !m.is_nan())?;
    Some(if minutes < 90.0 {
        RuntimeCategory::Short
    } else if minutes <= 120.0 {
        RuntimeCategory::Medium
    } else {
        RuntimeCategory::Long
    })
}

pub fn decade(year: Option<i32>) -> Option<i32> {
    year.map(|y| y.div_euclid(10) * 10)
}

/// Quantile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending and free of NaN.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Bands every value by its quartile position within the whole column.
///
/// Values at or above the 75th percentile are popular, values at or below the
/// 25th are obscure. Missing values are unknown.
pub fn popularity_bands(values: &[Option<f64>]) -> Vec<PopularityBand> {
    let mut present: Vec<f64> = values.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    present.sort_by(f64::total_cmp);

    let (Some(q1), Some(q3)) = (quantile(&present, 0.25), quantile(&present, 0.75)) else {
        return vec![PopularityBand::Unknown; values.len()];
    };

    values
        .iter()
        .map(|value| match value {
            Some(v) if v.is_nan() => PopularityBand::Unknown,
            Some(v) if *v >= q3 => PopularityBand::Popular,
            Some(v) if *v <= q1 => PopularityBand::Obscure,
            Some(_) => PopularityBand::Average,
            None => PopularityBand::Unknown,
        })
        .collect()
}

/// Extracts the year from titles like "Toy Story (1995)"
pub fn parse_year_from_title(title: &str) -> Option<i32> {
    TRAILING_YEAR
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Trims labels, drops sentinels and duplicates, keeps first-seen order
pub fn clean_genres<I, S>(genres: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cleaned: Vec<String> = Vec::new();
    for genre in genres {
        let genre = genre.as_ref().trim();
        if genre.is_empty()
            || GENRE_SENTINELS
                .iter()
                .any(|sentinel| genre.eq_ignore_ascii_case(sentinel))
        {
            continue;
        }
        if !cleaned.iter().any(|g| g == genre) {
            cleaned.push(genre.to_string());
        }
    }
    cleaned
}

/// Splits a pipe-separated genre list such as "Action|Comedy"
pub fn split_genres(raw: &str) -> Vec<String> {
    clean_genres(raw.split('|'))
}

pub fn clamp<T: PartialOrd>(value: T, lo: T, hi: T) -> T {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}
