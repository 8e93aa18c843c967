use std::sync::Arc;

use crate::analysis::orchestrator::Orchestrator;
use crate::analysis::store::AnalysisStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// PostgreSQL-backed when DATABASE_URL is set, in-memory otherwise.
    pub store: Arc<dyn AnalysisStore>,
    pub orchestrator: Orchestrator,
}
