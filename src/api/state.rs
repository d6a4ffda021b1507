use std::sync::Arc;

use crate::{engine::RuleEngine, models::DatasetContext};

/// Shared application state
///
/// The engine is read-only once built, so requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RuleEngine>,
}

impl AppState {
    /// Builds the rule base for a loaded dataset context
    pub fn new(context: DatasetContext) -> Self {
        Self {
            engine: Arc::new(RuleEngine::new(Arc::new(context))),
        }
    }
}
