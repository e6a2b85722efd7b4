use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resource::LearningRecommendation;
use crate::models::resume::ExperienceLevel;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResourcesRequest {
    pub skills: Vec<String>,
    #[serde(default)]
    pub user_level: Option<String>,
}

/// POST /api/v1/resources
///
/// Finds up to three trusted videos for each of the first five skills.
pub async fn handle_find_resources(
    State(state): State<AppState>,
    Json(request): Json<ResourcesRequest>,
) -> Result<Json<Vec<LearningRecommendation>>, AppError> {
    if request.skills.iter().all(|s| s.trim().is_empty()) {
        return Err(AppError::Validation("skills cannot be empty".to_string()));
    }
    let level = match request.user_level.as_deref() {
        None => ExperienceLevel::default(),
        Some(raw) => ExperienceLevel::parse(raw).ok_or_else(|| {
            AppError::Validation(format!("unknown user_level '{raw}'"))
        })?,
    };

    let recommendations = state.pipeline.resources.find(&request.skills, level).await?;
    Ok(Json(recommendations))
}
