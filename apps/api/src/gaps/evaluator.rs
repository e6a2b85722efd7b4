//! Gap evaluation. The model evaluator runs first when configured; any output
//! that fails validation selects the rules evaluator, so callers always get a
//! report in the canonical shape.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::prompts::{GAP_EVALUATION_PROMPT_TEMPLATE, GAP_EVALUATION_ROLE};
use super::rules::{
    considered_market_skills, evaluate_rules, matching_summary, outlook_label,
    resume_skill_set, skill_key, DEFAULT_ESTIMATED_WEEKS, MAX_LEARNING_PATH,
};
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::gap::{GapItem, GapMethod, GapReport, Priority};

/// Input to every evaluator. `market_skills` is ordered, most demanded first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GapRequest {
    pub resume_skills: Vec<String>,
    pub market_skills: Vec<String>,
    pub role_outlook: String,
    #[serde(default)]
    pub time_budget_weeks: Option<u32>,
}

#[derive(Debug, Error)]
pub enum GapEvaluationError {
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("invalid evaluation: {0}")]
    Invalid(String),
}

#[async_trait]
pub trait GapEvaluator: Send + Sync {
    async fn evaluate(&self, request: &GapRequest) -> Result<GapReport, GapEvaluationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Model-backed evaluator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireGapReport {
    #[serde(default)]
    role_outlook: Option<String>,
    #[serde(default)]
    gap_analysis: Vec<WireGapItem>,
    #[serde(default)]
    recommended_learning_path: Vec<String>,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct WireGapItem {
    skill: String,
    market_rank: i64,
    priority: String,
    #[serde(default)]
    reasoning: String,
}

pub struct LlmGapEvaluator(pub LlmClient);

#[async_trait]
impl GapEvaluator for LlmGapEvaluator {
    async fn evaluate(&self, request: &GapRequest) -> Result<GapReport, GapEvaluationError> {
        let market = considered_market_skills(&request.market_skills)
            .iter()
            .map(|(rank, name)| format!("[{rank}] {name}"))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = GAP_EVALUATION_PROMPT_TEMPLATE
            .replace("{resume_skills}", &request.resume_skills.join(", "))
            .replace("{market_skills}", &market)
            .replace("{role_outlook}", &outlook_label(&request.role_outlook));

        let wire: WireGapReport = self
            .0
            .call_json(&prompt, &system_prompt(GAP_EVALUATION_ROLE))
            .await?;
        validate_model_report(wire, request)
    }
}

/// Accepts a model report only if it could have come from the rules
/// evaluator's shape: known priorities, the rank each skill actually holds,
/// confidence in [0, 1], no gap the candidate already has, and a bounded path
/// drawn from the reported gaps.
fn validate_model_report(
    wire: WireGapReport,
    request: &GapRequest,
) -> Result<GapReport, GapEvaluationError> {
    let invalid = |msg: String| Err(GapEvaluationError::Invalid(msg));

    if !(0.0..=1.0).contains(&wire.confidence) {
        return invalid(format!("confidence {} outside [0, 1]", wire.confidence));
    }
    if wire.recommended_learning_path.len() > MAX_LEARNING_PATH {
        return invalid(format!(
            "learning path has {} entries",
            wire.recommended_learning_path.len()
        ));
    }
    if wire
        .recommended_learning_path
        .iter()
        .any(|s| s.trim().is_empty())
    {
        return invalid("learning path contains an empty entry".into());
    }

    let held = resume_skill_set(&request.resume_skills);
    let market: HashMap<String, u32> = considered_market_skills(&request.market_skills)
        .into_iter()
        .map(|(rank, name)| (skill_key(&name), rank))
        .collect();

    let mut gaps = Vec::with_capacity(wire.gap_analysis.len());
    for item in wire.gap_analysis {
        let skill = item.skill.trim().to_string();
        if skill.is_empty() {
            return invalid("gap with empty skill name".into());
        }
        if item.market_rank < 1 {
            return invalid(format!("'{skill}' has market rank {}", item.market_rank));
        }
        let Some(priority) = Priority::parse(&item.priority) else {
            return invalid(format!("'{skill}' has unknown priority '{}'", item.priority));
        };
        let key = skill_key(&skill);
        if held.contains(&key) {
            return invalid(format!("'{skill}' is already on the resume"));
        }
        let Some(&rank) = market.get(&key) else {
            return invalid(format!("'{skill}' is not a considered market skill"));
        };
        if item.market_rank != i64::from(rank) {
            return invalid(format!(
                "'{skill}' reported at rank {} but holds rank {rank}",
                item.market_rank
            ));
        }
        gaps.push(GapItem {
            skill,
            market_rank: rank,
            priority,
            reasoning: item.reasoning.trim().to_string(),
        });
    }
    gaps.sort_by_key(|g| (g.priority, g.market_rank));

    let gap_keys: HashSet<String> = gaps.iter().map(|g| skill_key(&g.skill)).collect();
    if let Some(stray) = wire
        .recommended_learning_path
        .iter()
        .find(|s| !gap_keys.contains(&skill_key(s)))
    {
        return invalid(format!("learning path entry '{}' is not a reported gap", stray.trim()));
    }

    let (matching_skills, match_score) = matching_summary(request);
    Ok(GapReport {
        role_outlook: wire
            .role_outlook
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| outlook_label(&request.role_outlook)),
        gap_analysis: gaps,
        recommended_learning_path: wire
            .recommended_learning_path
            .into_iter()
            .map(|s| s.trim().to_string())
            .collect(),
        estimated_time_weeks: request.time_budget_weeks.unwrap_or(DEFAULT_ESTIMATED_WEEKS),
        confidence: wire.confidence,
        matching_skills,
        match_score,
        analysis_method: GapMethod::Llm,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct GapEngine {
    primary: Option<Arc<dyn GapEvaluator>>,
}

impl GapEngine {
    pub fn new(primary: Option<Arc<dyn GapEvaluator>>) -> Self {
        Self { primary }
    }

    pub fn has_model(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn evaluate(&self, request: &GapRequest) -> GapReport {
        if let Some(primary) = &self.primary {
            match primary.evaluate(request).await {
                Ok(report) => {
                    info!(stage = "gap-evaluation", gaps = report.gap_analysis.len(), method = "llm", "gap evaluation ready");
                    return report;
                }
                Err(e) => warn!(stage = "gap-evaluation", error = %e, "model evaluation rejected, using rules"),
            }
        }
        let report = evaluate_rules(request);
        info!(stage = "gap-evaluation", gaps = report.gap_analysis.len(), method = "rules-fallback", "gap evaluation ready");
        report
    }
}
