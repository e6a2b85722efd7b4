use axum::{extract::State, Json};
use serde::Deserialize;

use super::evaluator::GapRequest;
use crate::errors::AppError;
use crate::models::gap::GapReport;
use crate::state::AppState;

/// Market skills may be plain names or full skill objects from `/api/v1/skills`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MarketSkillRef {
    Name(String),
    Skill { name: String },
}

impl MarketSkillRef {
    fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Skill { name } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EvaluateGapsRequest {
    pub resume_skills: Vec<String>,
    pub market_skills: Vec<MarketSkillRef>,
    #[serde(default)]
    pub role_outlook: String,
    #[serde(default)]
    pub time_budget_weeks: Option<u32>,
}

/// POST /api/v1/gaps/evaluate
///
/// Compares resume skills with the ranked market skills. Always answers:
/// invalid model output falls back to the rules evaluator.
pub async fn handle_evaluate_gaps(
    State(state): State<AppState>,
    Json(request): Json<EvaluateGapsRequest>,
) -> Result<Json<GapReport>, AppError> {
    if request.market_skills.is_empty() {
        return Err(AppError::Validation(
            "market_skills must contain at least one skill".to_string(),
        ));
    }

    let request = GapRequest {
        resume_skills: request.resume_skills,
        market_skills: request
            .market_skills
            .into_iter()
            .map(MarketSkillRef::into_name)
            .collect(),
        role_outlook: request.role_outlook,
        time_budget_weeks: request.time_budget_weeks,
    };

    Ok(Json(state.pipeline.gaps.evaluate(&request).await))
}
