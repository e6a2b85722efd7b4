use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Pipeline stages, as reported in `StageIssue.stage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    RoleMapping,
    MarketSkills,
    Forecast,
    Resume,
    GapEvaluation,
    Resources,
}

/// Errors a stage surfaces to its caller. Upstream outages and malformed
/// upstream output never reach this type: they are absorbed by the stage's fallback.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("not configured: {0}")]
    Configuration(String),

    #[error("could not parse document: {0}")]
    Parse(String),

    #[error("unsupported input: {0}")]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    InsufficientData,
    Configuration,
    ParseFailure,
    Unsupported,
    LowConfidence,
}

/// A degraded or missing stage contribution, attached to the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageIssue {
    pub stage: Stage,
    pub kind: IssueKind,
    pub message: String,
}

impl StageIssue {
    pub fn new(stage: Stage, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            message: message.into(),
        }
    }

    pub fn from_error(stage: Stage, err: &StageError) -> Self {
        let kind = match err {
            StageError::InsufficientData(_) => IssueKind::InsufficientData,
            StageError::Configuration(_) => IssueKind::Configuration,
            StageError::Parse(_) => IssueKind::ParseFailure,
            StageError::Unsupported(_) => IssueKind::Unsupported,
        };
        Self::new(stage, kind, err.to_string())
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StageError> for AppError {
    fn from(err: StageError) -> Self {
        match err {
            StageError::Unsupported(msg) => AppError::Validation(msg),
            StageError::Configuration(msg) => AppError::ServiceUnavailable(msg),
            StageError::InsufficientData(_) | StageError::Parse(_) => {
                AppError::UnprocessableEntity(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NOT_CONFIGURED",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
