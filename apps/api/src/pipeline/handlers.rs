use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::export::{export, ExportFormat};
use super::{AnalysisReport, AnalysisRequest, ResumeUpload};
use crate::errors::AppError;
use crate::models::resume::ExperienceLevel;
use crate::resume::handlers::read_upload_form;
use crate::state::AppState;

/// POST /api/v1/analysis
///
/// Multipart: `target_role`, optional `experience_level`, `time_budget_weeks`,
/// `known_skills` (comma separated) and `file`. Runs every stage; stage
/// failures are listed in `issues` rather than failing the request.
pub async fn handle_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let form = read_upload_form(multipart).await?;

    let target_role = form
        .field("target_role")
        .ok_or_else(|| AppError::Validation("target_role cannot be empty".to_string()))?
        .to_string();
    let experience_level = form
        .field("experience_level")
        .map(|raw| {
            ExperienceLevel::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown experience_level '{raw}'")))
        })
        .transpose()?;
    let time_budget_weeks = form
        .field("time_budget_weeks")
        .map(|raw| {
            raw.parse::<u32>().map_err(|_| {
                AppError::Validation(format!("time_budget_weeks must be a whole number, got '{raw}'"))
            })
        })
        .transpose()?;
    let known_skills = form
        .field("known_skills")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let resume = form.file.as_ref().map(|file| ResumeUpload {
        bytes: file.bytes.clone(),
        declared_format: form.field("format").map(str::to_string),
        file_name: file.file_name.clone(),
    });

    let report = state
        .pipeline
        .analyze(AnalysisRequest {
            target_role,
            resume,
            experience_level,
            time_budget_weeks,
            known_skills,
        })
        .await?;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: Option<String>,
}

/// POST /api/v1/export?format=json|csv
///
/// Body: an `AnalysisReport` as returned by `/api/v1/analysis`.
pub async fn handle_export(
    Query(query): Query<ExportQuery>,
    Json(report): Json<AnalysisReport>,
) -> Result<impl IntoResponse, AppError> {
    let raw = query.format.as_deref().unwrap_or("json");
    let format = ExportFormat::parse(raw)
        .ok_or_else(|| AppError::Validation(format!("unsupported export format '{raw}'")))?;

    let body = export(&report, format).map_err(|e| AppError::Internal(e.into()))?;
    let disposition = format!(
        "attachment; filename=\"skillpath-{}.{}\"",
        report.report_id,
        format.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// DELETE /api/v1/cache
pub async fn handle_clear_cache(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let cache = &state.pipeline.cache;
    cache
        .clear()
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("cache could not be cleared: {e}")))?;
    info!(backend = cache.backend_name(), "cache cleared");

    Ok(Json(json!({
        "cleared": true,
        "backend": cache.backend_name(),
    })))
}
