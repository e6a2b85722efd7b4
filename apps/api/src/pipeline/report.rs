use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StageIssue;
use crate::models::forecast::GrowthForecast;
use crate::models::gap::GapReport;
use crate::models::occupation::OccupationMapping;
use crate::models::resource::LearningRecommendation;
use crate::models::resume::{ExperienceLevel, ResumeProfile};
use crate::models::skill::SkillsReport;

/// Aggregated result of one analysis run. A stage that failed leaves its
/// field `null` and explains why in `issues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report_id: Uuid,
    pub target_role: String,
    pub user_level: ExperienceLevel,
    pub occupation: Option<OccupationMapping>,
    pub market_skills: Option<SkillsReport>,
    pub forecast: Option<GrowthForecast>,
    pub resume: Option<ResumeProfile>,
    pub gaps: Option<GapReport>,
    #[serde(default)]
    pub learning_plan: Vec<LearningRecommendation>,
    #[serde(default)]
    pub issues: Vec<StageIssue>,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn new(target_role: impl Into<String>) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            target_role: target_role.into(),
            user_level: ExperienceLevel::default(),
            occupation: None,
            market_skills: None,
            forecast: None,
            resume: None,
            gaps: None,
            learning_plan: Vec::new(),
            issues: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Outlook text fed to the gap evaluator.
    pub fn role_outlook(&self) -> String {
        self.forecast
            .as_ref()
            .map(|f| f.category.label().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
