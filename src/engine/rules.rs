//! Rule base construction and the rule interpreter.
//!
//! Every rule is a [`RuleKind`] value carrying its parameters. Ids, descriptions
//! and deltas are derived from the kind, and a single match in
//! [`Rule::evaluate`] decides whether a rule fires for a candidate.

use crate::{
    error::RuleError,
    models::{
        DatasetContext, Evidence, Firing, Movie, PopularityBand, Preferences, QualityBand,
        RuntimeCategory,
    },
};

/// Per-genre boost rules are created for this many vocabulary genres
pub const GENRE_RULE_LIMIT: usize = 15;
/// Affinity rules are created for this many vocabulary genres
pub const AFFINITY_RULE_LIMIT: usize = 10;
/// Padding stops once the rule base reaches this size
pub const MIN_RULE_COUNT: usize = 30;

const COMBO_PAIRS: [(&str, &str); 5] = [
    ("Action", "Sci-Fi"),
    ("Drama", "Romance"),
    ("Animation", "Family"),
    ("Comedy", "Romance"),
    ("Adventure", "Fantasy"),
];

const DECADE_BOOSTS: [i32; 5] = [1970, 1980, 1990, 2000, 2010];

const PADDING_PAIRS: [(&str, &str); 5] = [
    ("Thriller", "Mystery"),
    ("Crime", "Drama"),
    ("Horror", "Thriller"),
    ("Documentary", "History"),
    ("Music", "Romance"),
];

/// What a rule checks, with the parameters it was instantiated with
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// Candidate has the genre and the user either named it or named none
    GenreBoost { genre: String },
    /// Candidate matches at least two preferred genres
    MultiGenre,
    Quality { band: QualityBand },
    PopularityBand { band: PopularityBand },
    /// Candidate's band is the one the user explicitly asked for
    PopularityPreference,
    RecentDecade,
    ClassicDecade,
    Runtime { category: RuntimeCategory },
    LanguageMatch,
    /// Both genres present on a good or excellent title
    Combo { first: String, second: String },
    Decade { decade: i32 },
    /// Genre presence, regardless of preferences
    Affinity { genre: String },
    ExcellentAndPopular,
    Pairing { first: String, second: String },
    GenrePresence { genre: String },
}

impl RuleKind {
    pub fn id(&self) -> String {
        match self {
            RuleKind::GenreBoost { genre } => format!("GENRE_{}", genre),
            RuleKind::MultiGenre => "GENRE_MULTI".to_string(),
            RuleKind::Quality { band } => format!("QUALITY_{}", band.as_str().to_uppercase()),
            RuleKind::PopularityBand { band } => {
                format!("POPULARITY_{}", band.as_str().to_uppercase())
            }
            RuleKind::PopularityPreference => "POPULARITY_PREF".to_string(),
            RuleKind::RecentDecade => "DECADE_RECENT".to_string(),
            RuleKind::ClassicDecade => "DECADE_CLASSIC".to_string(),
            RuleKind::Runtime { category } => {
                format!("RUNTIME_{}", category.as_str().to_uppercase())
            }
            RuleKind::LanguageMatch => "LANGUAGE_MATCH".to_string(),
            RuleKind::Combo { first, second } => format!("COMBO_{}_{}", first, second),
            RuleKind::Decade { decade } => format!("DECADE_{}", decade),
            RuleKind::Affinity { genre } => format!("AFFINITY_{}", genre),
            RuleKind::ExcellentAndPopular => "HIGH_SCORE_POPULAR".to_string(),
            RuleKind::Pairing { first, second } => format!("PAIR_{}_{}", first, second),
            RuleKind::GenrePresence { genre } => format!("FILLER_{}", genre),
        }
    }

    pub fn description(&self) -> String {
        match self {
            RuleKind::GenreBoost { genre } => format!("Boost for genre {}", genre),
            RuleKind::MultiGenre => "Boost for multiple preferred genres".to_string(),
            RuleKind::Quality { band } => match band {
                QualityBand::Excellent => "Excellent quality".to_string(),
                QualityBand::Good => "Good quality".to_string(),
                _ => "Average quality".to_string(),
            },
            RuleKind::PopularityBand { band } => match band {
                PopularityBand::Popular => "Popular title".to_string(),
                _ => "Obscure gem".to_string(),
            },
            RuleKind::PopularityPreference => "Matches popularity preference".to_string(),
            RuleKind::RecentDecade => "Boost for recent decades".to_string(),
            RuleKind::ClassicDecade => "Boost for classic decades".to_string(),
            RuleKind::Runtime { category } => runtime_label(*category).to_string(),
            RuleKind::LanguageMatch => "Matches language".to_string(),
            RuleKind::Combo { first, second } => format!("Strong combo {}+{}", first, second),
            RuleKind::Decade { decade } => format!("Boost for {}s", decade),
            RuleKind::Affinity { genre } => format!("Affinity for {}", genre),
            RuleKind::ExcellentAndPopular => "High rating and popular".to_string(),
            RuleKind::Pairing { first, second } => format!("Pairing {}+{}", first, second),
            RuleKind::GenrePresence { genre } => format!("Genre presence {}", genre),
        }
    }

    /// Score added when the rule fires
    pub fn delta(&self) -> f64 {
        match self {
            RuleKind::GenreBoost { .. } => 1.5,
            RuleKind::MultiGenre => 2.0,
            RuleKind::Quality { band } => match band {
                QualityBand::Excellent => 3.0,
                QualityBand::Good => 2.0,
                QualityBand::Average => 0.5,
                QualityBand::Low | QualityBand::Unknown => 0.0,
            },
            RuleKind::PopularityBand { band } => match band {
                PopularityBand::Popular => 1.5,
                PopularityBand::Obscure => 1.0,
                PopularityBand::Average | PopularityBand::Unknown => 0.0,
            },
            RuleKind::PopularityPreference => 1.5,
            RuleKind::RecentDecade => 1.0,
            RuleKind::ClassicDecade => 0.8,
            RuleKind::Runtime { category } => match category {
                RuntimeCategory::Short => 0.7,
                RuntimeCategory::Medium => 1.0,
                RuntimeCategory::Long => 0.5,
            },
            RuleKind::LanguageMatch => 2.0,
            RuleKind::Combo { .. } => 2.5,
            RuleKind::Decade { .. } => 0.8,
            RuleKind::Affinity { .. } => 0.6,
            RuleKind::ExcellentAndPopular => 2.0,
            RuleKind::Pairing { .. } => 1.1,
            RuleKind::GenrePresence { .. } => 0.4,
        }
    }
}

fn runtime_label(category: RuntimeCategory) -> &'static str {
    match category {
        RuntimeCategory::Short => "Short runtime",
        RuntimeCategory::Medium => "Medium runtime",
        RuntimeCategory::Long => "Long runtime",
    }
}

/// A single entry of the rule base
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: String,
    pub description: String,
    /// Documentary; the delta applied on firing comes from the kind
    pub weight: f64,
    pub kind: RuleKind,
}

impl Rule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            id: kind.id(),
            description: kind.description(),
            weight: kind.delta(),
            kind,
        }
    }

    /// Evaluates the rule against one candidate.
    ///
    /// Returns the firing record when the rule matches, `None` when it does not,
    /// and an error when the candidate breaks an invariant the rule depends on.
    pub fn evaluate(&self, movie: &Movie, prefs: &Preferences) -> Result<Option<Firing>, RuleError> {
        Ok(self.interpret(movie, prefs)?.map(|(explanation, evidence)| Firing {
            rule_id: self.id.clone(),
            description: self.description.clone(),
            delta: self.kind.delta(),
            explanation,
            evidence,
        }))
    }

    pub fn matches(&self, movie: &Movie, prefs: &Preferences) -> Result<bool, RuleError> {
        Ok(self.interpret(movie, prefs)?.is_some())
    }

    fn interpret(
        &self,
        movie: &Movie,
        prefs: &Preferences,
    ) -> Result<Option<(String, Evidence)>, RuleError> {
        let fired = match &self.kind {
            RuleKind::GenreBoost { genre } => (movie.has_genre(genre)
                && (!prefs.has_genre_restriction() || prefs.prefers_genre(genre)))
            .then(|| genre_evidence(format!("Matches genre {}", genre), genre)),

            RuleKind::MultiGenre => (prefs.has_genre_restriction()
                && movie.genre_overlap(&prefs.preferred_genres) >= 2)
                .then(|| {
                    (
                        "Matches multiple preferred genres".to_string(),
                        Evidence::Genres {
                            genres: movie.genres.clone(),
                        },
                    )
                }),

            RuleKind::Quality { band } => (movie.quality_band == *band).then(|| {
                let explanation = match band {
                    QualityBand::Excellent => "High quality rating",
                    QualityBand::Good => "Good rating",
                    _ => "Average rating",
                };
                rating_evidence(explanation, movie)
            }),

            RuleKind::PopularityBand { band } => {
                (self.popularity_band(movie)? == *band).then(|| {
                    let explanation = match band {
                        PopularityBand::Popular => "Popular with many ratings",
                        _ => "Obscure gem",
                    };
                    (
                        explanation.to_string(),
                        Evidence::Popularity {
                            popularity: movie.popularity,
                        },
                    )
                })
            }

            RuleKind::PopularityPreference => {
                let band = self.popularity_band(movie)?;
                (prefs.popularity.band() == Some(band)).then(|| {
                    (
                        "Matches popularity preference".to_string(),
                        Evidence::Band { band },
                    )
                })
            }

            RuleKind::RecentDecade => self
                .decade(movie)?
                .filter(|d| *d >= 2000)
                .map(|decade| ("Recent decade".to_string(), Evidence::Decade { decade })),

            RuleKind::ClassicDecade => self
                .decade(movie)?
                .filter(|d| *d <= 1980)
                .map(|decade| ("Classic decade".to_string(), Evidence::Decade { decade })),

            RuleKind::Runtime { category } => {
                (self.runtime_category(movie)? == Some(*category)).then(|| {
                    (
                        runtime_label(*category).to_string(),
                        Evidence::Runtime {
                            runtime: movie.runtime_minutes,
                        },
                    )
                })
            }

            RuleKind::LanguageMatch => match (&prefs.language, &movie.language) {
                (Some(wanted), Some(language)) if wanted == language => Some((
                    "Matches language preference".to_string(),
                    Evidence::Language {
                        language: Some(language.clone()),
                    },
                )),
                _ => None,
            },

            RuleKind::Combo { first, second } => (movie.has_genre(first)
                && movie.has_genre(second)
                && matches!(movie.quality_band, QualityBand::Good | QualityBand::Excellent))
            .then(|| {
                (
                    format!("Strong combo: {} + {}", first, second),
                    Evidence::Combo {
                        genres: vec![first.clone(), second.clone()],
                        rating: movie.rating,
                    },
                )
            }),

            RuleKind::Decade { decade } => (self.decade(movie)? == Some(*decade)).then(|| {
                (
                    format!("Released in {}s", decade),
                    Evidence::Decade { decade: *decade },
                )
            }),

            RuleKind::Affinity { genre } | RuleKind::GenrePresence { genre } => movie
                .has_genre(genre)
                .then(|| genre_evidence(format!("Has genre {}", genre), genre)),

            RuleKind::ExcellentAndPopular => (movie.quality_band == QualityBand::Excellent
                && movie.popularity_band == Some(PopularityBand::Popular))
            .then(|| rating_evidence("Highly rated and popular", movie)),

            RuleKind::Pairing { first, second } => (movie.has_genre(first)
                && movie.has_genre(second))
            .then(|| {
                (
                    format!("Pairing {} and {}", first, second),
                    Evidence::Genres {
                        genres: vec![first.clone(), second.clone()],
                    },
                )
            }),
        };
        Ok(fired)
    }

    fn inconsistent(&self, movie: &Movie, field: &'static str) -> RuleError {
        RuleError::InconsistentRecord {
            rule_id: self.id.clone(),
            movie_id: movie.id.clone(),
            field,
        }
    }

    /// Decade, checked against the year it is derived from
    fn decade(&self, movie: &Movie) -> Result<Option<i32>, RuleError> {
        if movie.year.is_some() != movie.decade.is_some() {
            return Err(self.inconsistent(movie, "decade"));
        }
        Ok(movie.decade)
    }

    /// Runtime category, checked against the runtime it is derived from
    fn runtime_category(&self, movie: &Movie) -> Result<Option<RuntimeCategory>, RuleError> {
        if movie.runtime_minutes.is_some() != movie.runtime_category.is_some() {
            return Err(self.inconsistent(movie, "runtime_category"));
        }
        Ok(movie.runtime_category)
    }

    /// Popularity band; only called by rules built for datasets with popularity
    fn popularity_band(&self, movie: &Movie) -> Result<PopularityBand, RuleError> {
        movie
            .popularity_band
            .ok_or_else(|| self.inconsistent(movie, "popularity_band"))
    }
}

fn genre_evidence(explanation: String, genre: &str) -> (String, Evidence) {
    (
        explanation,
        Evidence::Genre {
            genre: genre.to_string(),
        },
    )
}

fn rating_evidence(explanation: &str, movie: &Movie) -> (String, Evidence) {
    (
        explanation.to_string(),
        Evidence::Rating {
            rating: movie.rating,
        },
    )
}

/// Builds the ordered rule base for a dataset.
///
/// Popularity, runtime and language rules only exist when the dataset has the
/// matching capability. The trailing pair and genre-presence rules pad the base
/// towards [`MIN_RULE_COUNT`].
pub fn build_rules(context: &DatasetContext) -> Vec<Rule> {
    let capabilities = context.capabilities;
    let genres = &context.genres;
    let mut kinds: Vec<RuleKind> = Vec::new();

    kinds.extend(
        genres
            .iter()
            .take(GENRE_RULE_LIMIT)
            .map(|genre| RuleKind::GenreBoost {
                genre: genre.clone(),
            }),
    );
    kinds.push(RuleKind::MultiGenre);
    kinds.extend(
        [QualityBand::Excellent, QualityBand::Good, QualityBand::Average]
            .into_iter()
            .map(|band| RuleKind::Quality { band }),
    );

    if capabilities.has_popularity {
        kinds.push(RuleKind::PopularityBand {
            band: PopularityBand::Popular,
        });
        kinds.push(RuleKind::PopularityBand {
            band: PopularityBand::Obscure,
        });
        kinds.push(RuleKind::PopularityPreference);
    }

    kinds.push(RuleKind::RecentDecade);
    kinds.push(RuleKind::ClassicDecade);

    if capabilities.has_runtime {
        kinds.extend(
            [RuntimeCategory::Short, RuntimeCategory::Medium, RuntimeCategory::Long]
                .into_iter()
                .map(|category| RuleKind::Runtime { category }),
        );
    }

    if capabilities.has_language {
        kinds.push(RuleKind::LanguageMatch);
    }

    kinds.extend(COMBO_PAIRS.iter().map(|(first, second)| RuleKind::Combo {
        first: first.to_string(),
        second: second.to_string(),
    }));
    kinds.extend(DECADE_BOOSTS.iter().map(|&decade| RuleKind::Decade { decade }));

    // Overlaps GenreBoost for the leading genres, so those count twice.
    kinds.extend(
        genres
            .iter()
            .take(AFFINITY_RULE_LIMIT)
            .map(|genre| RuleKind::Affinity {
                genre: genre.clone(),
            }),
    );
    kinds.push(RuleKind::ExcellentAndPopular);

    for (first, second) in PADDING_PAIRS {
        if kinds.len() >= MIN_RULE_COUNT {
            break;
        }
        kinds.push(RuleKind::Pairing {
            first: first.to_string(),
            second: second.to_string(),
        });
    }

    for genre in genres {
        if kinds.len() >= MIN_RULE_COUNT {
            break;
        }
        kinds.push(RuleKind::GenrePresence {
            genre: genre.clone(),
        });
    }

    let rules: Vec<Rule> = kinds.into_iter().map(Rule::new).collect();

    tracing::debug!(
        rule_count = rules.len(),
        genres = genres.len(),
        has_popularity = capabilities.has_popularity,
        has_runtime = capabilities.has_runtime,
        has_language = capabilities.has_language,
        "Built rule base"
    );

    rules
}
