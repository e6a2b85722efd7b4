//! Runs the stages in order and folds their results into one report.
//!
//! A failing stage never aborts the run: its error becomes a `StageIssue` and
//! the later stages work with whatever partial data exists.

use bytes::Bytes;
use tracing::{info, warn};

use super::report::AnalysisReport;
use crate::cache::TtlCache;
use crate::errors::{IssueKind, Stage, StageError, StageIssue};
use crate::forecast::Forecaster;
use crate::gaps::{GapEngine, GapRequest};
use crate::models::resume::ExperienceLevel;
use crate::resources::ResourceFinder;
use crate::resume::ResumeParser;
use crate::roles::RoleMapper;
use crate::skills::normalize::dedup_skill_names;
use crate::skills::SkillsExtractor;

/// Every stage plus the cache they share.
pub struct Pipeline {
    pub roles: RoleMapper,
    pub skills: SkillsExtractor,
    pub forecast: Forecaster,
    pub resume: ResumeParser,
    pub gaps: GapEngine,
    pub resources: ResourceFinder,
    pub cache: TtlCache,
}

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub bytes: Bytes,
    pub declared_format: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub target_role: String,
    pub resume: Option<ResumeUpload>,
    /// Overrides the level detected on the resume.
    pub experience_level: Option<ExperienceLevel>,
    pub time_budget_weeks: Option<u32>,
    /// Skills the user claims in addition to the resume.
    pub known_skills: Vec<String>,
}

impl Pipeline {
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisReport, StageError> {
        let target_role = request.target_role.trim();
        if target_role.is_empty() {
            return Err(StageError::Unsupported("target role must not be empty".into()));
        }
        let mut report = AnalysisReport::new(target_role);

        // Role mapping
        if !self.roles.has_lookup() {
            report.issues.push(StageIssue::new(
                Stage::RoleMapping,
                IssueKind::Configuration,
                "occupation lookup not configured; using the local title table",
            ));
        }
        match self.roles.map(target_role).await {
            Ok(mapping) => {
                if mapping.soc_code.is_none() {
                    report.issues.push(StageIssue::new(
                        Stage::RoleMapping,
                        IssueKind::LowConfidence,
                        mapping.notes.clone(),
                    ));
                }
                report.occupation = Some(mapping);
            }
            Err(e) => record(&mut report, Stage::RoleMapping, e),
        }
        let soc_code = report
            .occupation
            .as_ref()
            .and_then(|m| m.soc_code.clone());
        let official_title = report
            .occupation
            .as_ref()
            .map(|m| m.official_title.clone())
            .unwrap_or_else(|| target_role.to_string());

        // Market skills
        if self.skills.has_postings() && !self.skills.has_analyzer() {
            report.issues.push(StageIssue::new(
                Stage::MarketSkills,
                IssueKind::Configuration,
                "language model not configured; skills come from keyword extraction",
            ));
        }
        match self.skills.extract(target_role, soc_code.as_deref(), None).await {
            Ok(skills) => report.market_skills = Some(skills),
            Err(e) => record(&mut report, Stage::MarketSkills, e),
        }

        // Long-term forecast
        if !self.forecast.has_statistics() {
            report.issues.push(StageIssue::new(
                Stage::Forecast,
                IssueKind::Configuration,
                "statistics source not configured; using sector estimates",
            ));
        }
        match self.forecast.forecast(soc_code.as_deref(), &official_title).await {
            Ok(forecast) => {
                if forecast.low_confidence {
                    report.issues.push(StageIssue::new(
                        Stage::Forecast,
                        IssueKind::LowConfidence,
                        forecast
                            .note
                            .clone()
                            .unwrap_or_else(|| "forecast has low confidence".to_string()),
                    ));
                }
                report.forecast = Some(forecast);
            }
            Err(e) => record(&mut report, Stage::Forecast, e),
        }

        // Resume
        if let Some(upload) = &request.resume {
            match self
                .resume
                .parse_document(
                    &upload.bytes,
                    upload.declared_format.as_deref(),
                    upload.file_name.as_deref(),
                )
                .await
            {
                Ok(profile) => report.resume = Some(profile),
                Err(e) => record(&mut report, Stage::Resume, e),
            }
        }
        report.user_level = request
            .experience_level
            .or_else(|| report.resume.as_ref().map(|r| r.candidate.experience_level))
            .unwrap_or_default();

        // Gap evaluation
        let market_skills: Vec<String> = report
            .market_skills
            .as_ref()
            .map(|s| s.top_skills.iter().map(|skill| skill.name.clone()).collect())
            .unwrap_or_default();
        if market_skills.is_empty() {
            report.issues.push(StageIssue::new(
                Stage::GapEvaluation,
                IssueKind::InsufficientData,
                "no market skills available to compare against",
            ));
        } else {
            if !self.gaps.has_model() {
                report.issues.push(StageIssue::new(
                    Stage::GapEvaluation,
                    IssueKind::Configuration,
                    "language model not configured; using rules evaluation",
                ));
            }
            let gap_request = GapRequest {
                resume_skills: merge_skills(
                    report
                        .resume
                        .as_ref()
                        .map(|r| r.skill_names())
                        .unwrap_or_default(),
                    &request.known_skills,
                ),
                market_skills,
                role_outlook: report.role_outlook(),
                time_budget_weeks: request.time_budget_weeks,
            };
            report.gaps = Some(self.gaps.evaluate(&gap_request).await);
        }

        // Resources
        let path = report
            .gaps
            .as_ref()
            .map(|g| g.recommended_learning_path.clone())
            .unwrap_or_default();
        if !path.is_empty() {
            match self.resources.find(&path, report.user_level).await {
                Ok(plan) => report.learning_plan = plan,
                Err(e) => record(&mut report, Stage::Resources, e),
            }
        }

        info!(
            report_id = %report.report_id,
            issues = report.issues.len(),
            gaps = report.gaps.as_ref().map_or(0, |g| g.gap_analysis.len()),
            "analysis complete"
        );
        Ok(report)
    }
}

fn record(report: &mut AnalysisReport, stage: Stage, err: StageError) {
    warn!(stage = ?stage, error = %err, "stage degraded");
    report.issues.push(StageIssue::from_error(stage, &err));
}

/// Union of resume and user-declared skills in canonical spelling.
fn merge_skills(resume_skills: Vec<String>, known_skills: &[String]) -> Vec<String> {
    dedup_skill_names(resume_skills.iter().chain(known_skills))
}
