use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness plus which providers were constructed at startup.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let pipeline = &state.pipeline;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "skillpath-api",
        "cache_backend": pipeline.cache.backend_name(),
        "providers": {
            "language_model": pipeline.resume.has_model(),
            "occupation_lookup": pipeline.roles.has_lookup(),
            "job_postings": pipeline.skills.has_postings(),
            "statistics": pipeline.forecast.has_statistics(),
            "statistics_registered": state.config.bls_api_key.is_some(),
            "video_search": pipeline.resources.has_search(),
        }
    }))
}
