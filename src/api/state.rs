use std::sync::Arc;

use crate::services::{DetailEnricher, RecommendationEngine};

/// Shared application state
///
/// The engine is read-only after startup, so it is shared without a lock.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub enricher: Arc<dyn DetailEnricher>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, enricher: Arc<dyn DetailEnricher>) -> Self {
        Self {
            engine: Arc::new(engine),
            enricher,
        }
    }
}
