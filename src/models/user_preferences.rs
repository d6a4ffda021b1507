use serde::{Deserialize, Serialize};

use super::{derive, DatasetContext, PopularityBand};

pub const DEFAULT_TOP_K: usize = 10;
pub const MAX_TOP_K: usize = 50;

/// Whether the user wants well-known titles, hidden gems or either
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PopularityPreference {
    #[default]
    Any,
    Popular,
    Obscure,
}

impl PopularityPreference {
    /// Parses user input, falling back to `Any` for anything unrecognized
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "popular" => PopularityPreference::Popular,
            "obscure" => PopularityPreference::Obscure,
            _ => PopularityPreference::Any,
        }
    }

    /// The band this preference asks for, if it asks for one
    pub fn band(&self) -> Option<PopularityBand> {
        match self {
            PopularityPreference::Any => None,
            PopularityPreference::Popular => Some(PopularityBand::Popular),
            PopularityPreference::Obscure => Some(PopularityBand::Obscure),
        }
    }
}

/// Raw preferences as submitted by a front end, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreferenceInput {
    #[serde(alias = "preferredGenres")]
    pub preferred_genres: Vec<String>,
    #[serde(alias = "excludedGenres")]
    pub excluded_genres: Vec<String>,
    #[serde(alias = "yearRange")]
    pub year_range: Option<(i32, i32)>,
    #[serde(alias = "minRating")]
    pub min_rating: Option<f64>,
    #[serde(alias = "popularityPref")]
    pub popularity_preference: Option<String>,
    #[serde(alias = "runtimeMax")]
    pub runtime_max: Option<f64>,
    pub language: Option<String>,
    #[serde(alias = "topK")]
    pub top_k: Option<i64>,
}

/// Validated preferences for one query
///
/// Every numeric field is already clamped to the bounds of the dataset it was
/// normalized against.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Preferences {
    pub preferred_genres: Vec<String>,
    pub excluded_genres: Vec<String>,
    /// Inclusive, ordered `(lo, hi)`
    pub year_range: (i32, i32),
    pub min_rating: f64,
    pub popularity: PopularityPreference,
    pub runtime_max: Option<f64>,
    pub language: Option<String>,
    pub top_k: usize,
}

impl PreferenceInput {
    /// Clamps and cleans the raw input against the dataset's bounds
    pub fn normalize(&self, context: &DatasetContext) -> Preferences {
        let (start, end) = self
            .year_range
            .unwrap_or((context.year_min, context.year_max));
        let start = derive::clamp(start, context.year_min, context.year_max);
        let end = derive::clamp(end, context.year_min, context.year_max);

        let min_rating = self
            .min_rating
            .filter(|r| r.is_finite())
            .map(|r| derive::clamp(r, 0.0, context.rating_scale_max.max(0.0)))
            .unwrap_or(0.0);

        let top_k = self
            .top_k
            .map(|k| derive::clamp(k, 1, MAX_TOP_K as i64) as usize)
            .unwrap_or(DEFAULT_TOP_K);

        Preferences {
            preferred_genres: derive::clean_genres(&self.preferred_genres),
            excluded_genres: derive::clean_genres(&self.excluded_genres),
            year_range: (start.min(end), start.max(end)),
            min_rating,
            popularity: self
                .popularity_preference
                .as_deref()
                .map(PopularityPreference::parse)
                .unwrap_or_default(),
            runtime_max: self.runtime_max.filter(|r| r.is_finite() && *r > 0.0),
            language: self
                .language
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            top_k,
        }
    }
}

impl Preferences {
    /// Preferences that restrict nothing beyond the dataset's own bounds
    pub fn unrestricted(context: &DatasetContext) -> Self {
        PreferenceInput::default().normalize(context)
    }

    pub fn has_genre_restriction(&self) -> bool {
        !self.preferred_genres.is_empty()
    }

    pub fn prefers_genre(&self, genre: &str) -> bool {
        self.preferred_genres.iter().any(|g| g == genre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DatasetKind, Movie};

    fn context() -> DatasetContext {
        DatasetContext::new(
            DatasetKind::MovieLens100k,
            vec![
                Movie::new("1", "A (1980)", Some(1980), vec!["Drama".to_string()], 3.0, 1, 5.0),
                Movie::new("2", "B (2010)", Some(2010), vec!["Comedy".to_string()], 4.0, 1, 5.0),
            ],
            5.0,
        )
    }

    #[test]
    fn test_defaults_cover_dataset_bounds() {
        let prefs = Preferences::unrestricted(&context());
        assert_eq!(prefs.year_range, (1980, 2010));
        assert_eq!(prefs.min_rating, 0.0);
        assert_eq!(prefs.popularity, PopularityPreference::Any);
        assert_eq!(prefs.top_k, DEFAULT_TOP_K);
        assert!(!prefs.has_genre_restriction());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let input = PreferenceInput {
            year_range: Some((2050, 1900)),
            min_rating: Some(9.0),
            top_k: Some(500),
            ..Default::default()
        };
        let prefs = input.normalize(&context());
        assert_eq!(prefs.year_range, (1980, 2010));
        assert_eq!(prefs.min_rating, 5.0);
        assert_eq!(prefs.top_k, MAX_TOP_K);

        let input = PreferenceInput {
            min_rating: Some(-1.0),
            top_k: Some(-3),
            ..Default::default()
        };
        let prefs = input.normalize(&context());
        assert_eq!(prefs.min_rating, 0.0);
        assert_eq!(prefs.top_k, 1);
    }

    #[test]
    fn test_blank_optional_constraints_become_none() {
        let input = PreferenceInput {
            runtime_max: Some(0.0),
            language: Some("   ".to_string()),
            popularity_preference: Some("trending".to_string()),
            ..Default::default()
        };
        let prefs = input.normalize(&context());
        assert_eq!(prefs.runtime_max, None);
        assert_eq!(prefs.language, None);
        assert_eq!(prefs.popularity, PopularityPreference::Any);
    }

    #[test]
    fn test_deserializes_camel_case_aliases() {
        let input: PreferenceInput = serde_json::from_str(
            r#"{"preferredGenres": ["Drama"], "yearRange": [1990, 2000], "popularityPref": "obscure", "topK": 5}"#,
        )
        .unwrap();
        let prefs = input.normalize(&context());
        assert_eq!(prefs.preferred_genres, vec!["Drama".to_string()]);
        assert_eq!(prefs.year_range, (1990, 2000));
        assert_eq!(prefs.popularity, PopularityPreference::Obscure);
        assert_eq!(prefs.top_k, 5);
    }
}
