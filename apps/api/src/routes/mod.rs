pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::forecast::handlers::handle_forecast;
use crate::gaps::handlers::handle_evaluate_gaps;
use crate::pipeline::handlers::{handle_analysis, handle_clear_cache, handle_export};
use crate::resources::handlers::handle_find_resources;
use crate::resume::handlers::handle_parse_resume;
use crate::roles::handlers::handle_map_role;
use crate::skills::handlers::handle_market_skills;
use crate::state::AppState;

/// Upload limit for routes that accept a resume file.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Individual stages
        .route("/api/v1/roles/map", post(handle_map_role))
        .route("/api/v1/skills", post(handle_market_skills))
        .route("/api/v1/forecast", post(handle_forecast))
        .route(
            "/api/v1/resume/parse",
            post(handle_parse_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/gaps/evaluate", post(handle_evaluate_gaps))
        .route("/api/v1/resources", post(handle_find_resources))
        // Full pipeline
        .route(
            "/api/v1/analysis",
            post(handle_analysis).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/export", post(handle_export))
        .route("/api/v1/cache", delete(handle_clear_cache))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::cache::TtlCache;
    use crate::config::{CacheTtls, Config, SkillsSettings};
    use crate::forecast::Forecaster;
    use crate::gaps::GapEngine;
    use crate::pipeline::Pipeline;
    use crate::resources::ResourceFinder;
    use crate::resume::ResumeParser;
    use crate::roles::RoleMapper;
    use crate::skills::SkillsExtractor;

    fn test_state() -> AppState {
        let cache = TtlCache::in_memory();
        let pipeline = Pipeline {
            roles: RoleMapper::new(None, cache.clone(), 60),
            skills: SkillsExtractor::new(None, None, cache.clone(), SkillsSettings::default(), 60),
            forecast: Forecaster::new(None, cache.clone(), 60),
            resume: ResumeParser::new(None, true),
            gaps: GapEngine::new(None),
            resources: ResourceFinder::new(None, cache.clone(), 60),
            cache,
        };
        AppState {
            pipeline: Arc::new(pipeline),
            config: Config {
                port: 0,
                rust_log: "info".into(),
                redis_url: None,
                anthropic_api_key: None,
                adzuna_app_id: None,
                adzuna_app_key: None,
                careeronestop_user_id: None,
                careeronestop_token: None,
                bls_api_key: None,
                youtube_api_key: None,
                upstream_timeout_secs: 10,
                llm_timeout_secs: 120,
                skills: SkillsSettings::default(),
                ttl: CacheTtls::default(),
                redact_email: true,
            },
        }
    }

    async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
        let response = build_router(test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_providers() {
        let response = build_router(test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cache_backend"], "memory");
        assert_eq!(body["providers"]["language_model"], false);
    }

    #[tokio::test]
    async fn test_role_map_falls_back_to_local_table() {
        let (status, body) = post_json("/api/v1/roles/map", json!({"title": "Data Scientist"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["soc_code"], "15-2051");
        assert_eq!(body["source"], "local-fallback");
    }

    #[tokio::test]
    async fn test_empty_title_is_a_validation_error() {
        let (status, body) = post_json("/api/v1/roles/map", json!({"title": "  "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_gap_evaluation_route() {
        let (status, body) = post_json(
            "/api/v1/gaps/evaluate",
            json!({
                "resume_skills": ["Python", "Docker", "SQL"],
                "market_skills": ["Python", {"name": "AWS", "category": "cloud"}, "Kubernetes", "Docker", "CI/CD"],
                "role_outlook": "High growth (Future-safe)"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommended_learning_path"], json!(["AWS", "Kubernetes", "CI/CD"]));
        assert_eq!(body["analysis_method"], "rules-fallback");
    }

    #[tokio::test]
    async fn test_skills_without_postings_source_is_unavailable() {
        let (status, body) = post_json("/api/v1/skills", json!({"role": "Data Scientist"})).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
    }

    fn multipart_upload(file_name: &str, content: &[u8]) -> (String, Vec<u8>) {
        let boundary = "skillpath-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/plain\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    async fn post_upload(path: &str, content: &[u8]) -> StatusCode {
        let (content_type, body) = multipart_upload("resume.txt", content);
        build_router(test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header("content-type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_resume_upload_above_default_body_limit_is_read() {
        let content = "Python developer\n".repeat(200_000).into_bytes();
        assert!(content.len() > 2 * 1024 * 1024);

        // No document model is configured, so a fully read upload ends there.
        assert_eq!(
            post_upload("/api/v1/resume/parse", &content).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_resume_upload_above_max_is_rejected() {
        let content = vec![b'a'; MAX_UPLOAD_BYTES + 1];
        assert_ne!(post_upload("/api/v1/resume/parse", &content).await, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_export_rejects_unknown_format() {
        let report = serde_json::to_value(crate::pipeline::AnalysisReport::new("Nurse")).unwrap();
        let (status, _) = post_json("/api/v1/export?format=xml", report).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
