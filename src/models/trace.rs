use serde::Serialize;

use super::PopularityBand;

/// Facts a rule looked at when it fired
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Evidence {
    Genre { genre: String },
    Combo { genres: Vec<String>, rating: f64 },
    Genres { genres: Vec<String> },
    Rating { rating: f64 },
    Popularity { popularity: Option<f64> },
    Band { band: PopularityBand },
    Decade { decade: i32 },
    Runtime { runtime: Option<f64> },
    Language { language: Option<String> },
}

/// One rule's match against one candidate
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Firing {
    pub rule_id: String,
    pub description: String,
    pub delta: f64,
    pub explanation: String,
    pub evidence: Evidence,
}

/// Running score and firing trail for a single candidate
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ScoringTrace {
    pub score: f64,
    pub fired: Vec<Firing>,
}

impl ScoringTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the firing's delta and appends it to the trail
    pub fn record(mut self, firing: Firing) -> Self {
        self.score += firing.delta;
        self.fired.push(firing);
        self
    }
}
