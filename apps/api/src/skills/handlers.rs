use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::skill::SkillsReport;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SkillsRequest {
    pub role: String,
    #[serde(default)]
    pub soc_code: Option<String>,
    #[serde(default)]
    pub min_sample_size: Option<usize>,
}

/// POST /api/v1/skills
///
/// Ranks the skills currently demanded in postings for a role.
pub async fn handle_market_skills(
    State(state): State<AppState>,
    Json(request): Json<SkillsRequest>,
) -> Result<Json<SkillsReport>, AppError> {
    if request.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }

    let report = state
        .pipeline
        .skills
        .extract(
            &request.role,
            request.soc_code.as_deref(),
            request.min_sample_size,
        )
        .await?;

    Ok(Json(report))
}
