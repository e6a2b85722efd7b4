use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::forecast::GrowthForecast;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub soc_code: Option<String>,
    pub job_title: String,
}

/// POST /api/v1/forecast
///
/// Always answers: an estimated forecast is returned when no live series is usable.
pub async fn handle_forecast(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Result<Json<GrowthForecast>, AppError> {
    if request.job_title.trim().is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }

    let forecast = state
        .pipeline
        .forecast
        .forecast(request.soc_code.as_deref(), &request.job_title)
        .await?;

    Ok(Json(forecast))
}
