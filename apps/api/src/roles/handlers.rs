use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::occupation::OccupationMapping;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MapRoleRequest {
    pub title: String,
}

/// POST /api/v1/roles/map
pub async fn handle_map_role(
    State(state): State<AppState>,
    Json(request): Json<MapRoleRequest>,
) -> Result<Json<OccupationMapping>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let mapping = state.pipeline.roles.map(&request.title).await?;
    Ok(Json(mapping))
}
