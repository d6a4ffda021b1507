use crate::{
    error::RuleError,
    models::{Movie, Preferences, ScoringTrace},
};

use super::rules::Rule;

/// A candidate together with the trace it accumulated
#[derive(Debug, Clone)]
pub struct ScoredMovie<'a> {
    pub movie: &'a Movie,
    pub trace: ScoringTrace,
}

impl ScoredMovie<'_> {
    pub fn score(&self) -> f64 {
        self.trace.score
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoringReport<'a> {
    pub results: Vec<ScoredMovie<'a>>,
    /// Rule evaluations that failed and were treated as non-matches
    pub rule_errors: usize,
}

/// Applies one rule to a candidate's trace.
///
/// A firing adds its delta and record to the returned trace. A rule error leaves
/// the trace as it was and is handed back alongside it.
pub fn apply(
    rule: &Rule,
    movie: &Movie,
    prefs: &Preferences,
    trace: ScoringTrace,
) -> (ScoringTrace, Option<RuleError>) {
    match rule.evaluate(movie, prefs) {
        Ok(Some(firing)) => (trace.record(firing), None),
        Ok(None) => (trace, None),
        Err(err) => (trace, Some(err)),
    }
}

/// Runs every candidate through every rule, in rule-base order
pub fn score<'a>(candidates: &[&'a Movie], prefs: &Preferences, rules: &[Rule]) -> ScoringReport<'a> {
    let mut rule_errors = 0;

    let results = candidates
        .iter()
        .map(|&movie| {
            let mut trace = ScoringTrace::new();
            for rule in rules {
                let (next, error) = apply(rule, movie, prefs, trace);
                trace = next;
                if let Some(err) = error {
                    tracing::debug!(rule_id = %rule.id, movie_id = %movie.id, error = %err, "Rule evaluation failed");
                    rule_errors += 1;
                }
            }
            ScoredMovie { movie, trace }
        })
        .collect();

    ScoringReport {
        results,
        rule_errors,
    }
}
