use std::sync::Arc;

use sqlx::PgPool;

use crate::insights::cache::InsightCache;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Insight cache over Redis or process memory, chosen at startup.
    pub insight_cache: InsightCache,
    /// Text generator behind every insight request. `LlmClient` in production.
    pub llm: Arc<dyn TextGenerator>,
}
