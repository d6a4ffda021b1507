//! Rule-based inference over a loaded catalog.
//!
//! The pipeline is hard filter, forward-chaining scoring, ranking. Callers
//! truncate to top-K and pick explanations per shown result.

pub mod explain;
pub mod filters;
pub mod ranker;
pub mod rules;
pub mod scorer;

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{DatasetContext, PreferenceInput, Preferences},
};

pub use explain::{select_explanations, MAX_EXPLANATIONS};
pub use filters::apply_hard_filters;
pub use ranker::rank;
pub use rules::{build_rules, Rule, RuleKind};
pub use scorer::{apply, score, ScoredMovie, ScoringReport};

pub const NO_RESULTS_MESSAGE: &str =
    "No results after hard filters. Try loosening year range, rating, or genres.";

/// Outcome of one recommendation query
#[derive(Debug, Clone)]
pub struct Inference<'a> {
    /// Catalog size the query ran against
    pub facts: usize,
    pub rule_count: usize,
    /// Movies that survived the hard filters
    pub candidates: usize,
    /// Ranked best first, not truncated
    pub results: Vec<ScoredMovie<'a>>,
    pub rule_errors: usize,
    /// Advisory shown when nothing survived the hard filters
    pub message: Option<String>,
}

impl<'a> Inference<'a> {
    pub fn top(&self, k: usize) -> &[ScoredMovie<'a>] {
        &self.results[..k.min(self.results.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A dataset context with its rule base, built once and shared across queries
#[derive(Debug, Clone)]
pub struct RuleEngine {
    context: Arc<DatasetContext>,
    rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new(context: Arc<DatasetContext>) -> Self {
        let rules = if context.is_usable() {
            build_rules(&context)
        } else {
            Vec::new()
        };
        Self { context, rules }
    }

    pub fn context(&self) -> &DatasetContext {
        &self.context
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn infer(&self, prefs: &Preferences) -> AppResult<Inference<'_>> {
        run(&self.context, &self.rules, prefs)
    }

    /// Normalizes raw input against this engine's dataset, then infers
    pub fn recommend(&self, input: &PreferenceInput) -> AppResult<(Preferences, Inference<'_>)> {
        self.context.ensure_usable()?;
        let prefs = input.normalize(&self.context);
        let inference = self.infer(&prefs)?;
        Ok((prefs, inference))
    }
}

/// One-shot inference that builds the rule base for this call only
pub fn infer<'a>(context: &'a DatasetContext, prefs: &Preferences) -> AppResult<Inference<'a>> {
    context.ensure_usable()?;
    let rules = build_rules(context);
    run(context, &rules, prefs)
}

fn run<'a>(context: &'a DatasetContext, rules: &[Rule], prefs: &Preferences) -> AppResult<Inference<'a>> {
    context.ensure_usable()?;

    let candidates = apply_hard_filters(&context.movies, prefs, context);
    tracing::debug!(
        facts = context.movies.len(),
        candidates = candidates.len(),
        "Applied hard filters"
    );

    if candidates.is_empty() {
        return Ok(Inference {
            facts: context.movies.len(),
            rule_count: rules.len(),
            candidates: 0,
            results: Vec::new(),
            rule_errors: 0,
            message: Some(NO_RESULTS_MESSAGE.to_string()),
        });
    }

    let ScoringReport {
        mut results,
        rule_errors,
    } = score(&candidates, prefs, rules);
    rank(&mut results);

    if rule_errors > 0 {
        tracing::warn!(rule_errors, "Some rule evaluations failed and were skipped");
    }

    Ok(Inference {
        facts: context.movies.len(),
        rule_count: rules.len(),
        candidates: candidates.len(),
        results,
        rule_errors,
        message: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{DatasetKind, Movie};

    fn context() -> DatasetContext {
        let movie = |id: &str, year: i32, genres: &[&str], rating: f64| {
            Movie::new(
                id,
                format!("Movie {}", id),
                Some(year),
                genres.iter().map(|g| g.to_string()).collect(),
                rating,
                20,
                5.0,
            )
        };
        DatasetContext::new(
            DatasetKind::MovieLens,
            vec![
                movie("1", 1994, &["Comedy", "Romance"], 4.3),
                movie("2", 1999, &["Drama"], 3.1),
                movie("3", 2004, &["Comedy"], 2.0),
            ],
            5.0,
        )
    }

    #[test]
    fn test_infer_ranks_all_candidates() {
        let ctx = context();
        let prefs = Preferences::unrestricted(&ctx);
        let inference = infer(&ctx, &prefs).unwrap();
        assert_eq!(inference.facts, 3);
        assert_eq!(inference.candidates, 3);
        assert_eq!(inference.results[0].movie.id, "1");
        assert!(inference.message.is_none());
        assert_eq!(inference.top(2).len(), 2);
        assert_eq!(inference.top(10).len(), 3);
    }

    #[test]
    fn test_empty_candidates_yield_message() {
        let ctx = context();
        let mut prefs = Preferences::unrestricted(&ctx);
        prefs.preferred_genres = vec!["Comedy".to_string()];
        prefs.excluded_genres = vec!["Comedy".to_string()];
        let inference = infer(&ctx, &prefs).unwrap();
        assert!(inference.is_empty());
        assert_eq!(inference.message.as_deref(), Some(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn test_unavailable_dataset_is_refused() {
        let ctx = DatasetContext::unavailable("Dataset not found");
        let prefs = Preferences::unrestricted(&ctx);
        assert!(matches!(infer(&ctx, &prefs), Err(AppError::NoDataset(_))));

        let engine = RuleEngine::new(Arc::new(ctx));
        assert!(engine.rules().is_empty());
        assert!(matches!(
            engine.recommend(&PreferenceInput::default()),
            Err(AppError::NoDataset(_))
        ));
    }

    #[test]
    fn test_engine_matches_one_shot_inference() {
        let engine = RuleEngine::new(Arc::new(context()));
        let prefs = Preferences::unrestricted(engine.context());
        let shared: Vec<String> = engine
            .infer(&prefs)
            .unwrap()
            .results
            .iter()
            .map(|r| r.movie.id.clone())
            .collect();
        let ctx = context();
        let once: Vec<String> = infer(&ctx, &prefs)
            .unwrap()
            .results
            .iter()
            .map(|r| r.movie.id.clone())
            .collect();
        assert_eq!(shared, once);
        assert_eq!(engine.rules().len(), build_rules(engine.context()).len());
    }
}
