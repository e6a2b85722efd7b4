use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Every stage, its providers and the shared cache.
    pub pipeline: Arc<Pipeline>,
    pub config: Config,
}
