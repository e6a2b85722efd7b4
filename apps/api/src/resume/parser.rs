//! Resume parsing. Extraction is delegated to the document model; this module
//! validates what comes back and never fills gaps with invented data.
//! Results are never cached and their contents are never logged.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::loader::{extract_text_blocking, resolve_format};
use super::prompts::{RESUME_EXTRACTION_PROMPT_TEMPLATE, RESUME_EXTRACTION_ROLE};
use crate::errors::StageError;
use crate::llm_client::prompts::{system_prompt, SKILL_NORMALIZATION_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::{
    Candidate, EducationEntry, ExperienceLevel, Proficiency, ProjectEntry, ResumeProfile,
    ResumeSkill, RoleEntry,
};
use crate::skills::normalize::canonical_skill_name;

const DEFAULT_PARSING_CONFIDENCE: f64 = 0.7;

#[async_trait]
pub trait DocumentModel: Send + Sync {
    async fn extract(&self, resume_text: &str) -> Result<Value, LlmError>;
}

pub struct LlmResumeModel(pub LlmClient);

#[async_trait]
impl DocumentModel for LlmResumeModel {
    async fn extract(&self, resume_text: &str) -> Result<Value, LlmError> {
        let prompt = RESUME_EXTRACTION_PROMPT_TEMPLATE
            .replace("{normalization}", SKILL_NORMALIZATION_INSTRUCTION)
            .replace("{resume_text}", resume_text);
        self.0
            .call_json(&prompt, &system_prompt(RESUME_EXTRACTION_ROLE))
            .await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format returned by the model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireResume {
    candidate: Option<WireCandidate>,
    #[serde(default, alias = "roles")]
    roles_detected: Option<Vec<WireRole>>,
    #[serde(default)]
    skills: Option<Vec<WireSkill>>,
    #[serde(default)]
    projects: Option<Vec<WireProject>>,
    #[serde(default)]
    education: Option<Vec<WireEducation>>,
    #[serde(default)]
    meta: Option<WireMeta>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    experience_level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireRole {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    start_year: Option<i32>,
    #[serde(default)]
    end_year: Option<i32>,
    #[serde(default)]
    responsibilities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct WireSkill {
    name: String,
    #[serde(default)]
    proficiency: Option<String>,
    #[serde(default)]
    last_used_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct WireProject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "technologies")]
    tech_stack: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct WireEducation {
    #[serde(default)]
    degree: Option<String>,
    #[serde(default)]
    major: Option<String>,
    #[serde(default)]
    institution: Option<String>,
    #[serde(default)]
    grad_year: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireMeta {
    #[serde(default)]
    parsing_confidence: Option<f64>,
}

fn clean(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn duration(start: Option<i32>, end: Option<i32>) -> Option<String> {
    match (start, end) {
        (Some(s), Some(e)) => Some(format!("{s}-{e}")),
        (Some(s), None) => Some(format!("{s}-present")),
        (None, Some(e)) => Some(format!("until {e}")),
        (None, None) => None,
    }
}

fn year_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Converts model output into a validated profile. Skill names are
/// re-canonicalized and de-duplicated case-insensitively.
pub fn validate_profile(raw: Value, redact_email: bool) -> Result<ResumeProfile, StageError> {
    let wire: WireResume = serde_json::from_value(raw)
        .map_err(|e| StageError::Parse(format!("model output does not match the resume schema: {e}")))?;

    let candidate = wire
        .candidate
        .ok_or_else(|| StageError::Parse("model output has no candidate section".into()))?;

    let mut seen = std::collections::HashSet::new();
    let skills: Vec<ResumeSkill> = wire
        .skills
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| {
            let name = canonical_skill_name(&s.name);
            if name.is_empty() || !seen.insert(name.to_lowercase()) {
                return None;
            }
            Some(ResumeSkill {
                name,
                proficiency: s.proficiency.as_deref().and_then(Proficiency::parse),
                last_used_year: s.last_used_year,
            })
        })
        .collect();

    let roles: Vec<RoleEntry> = wire
        .roles_detected
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.title.as_deref().map_or(false, |t| !t.trim().is_empty()))
        .map(|r| RoleEntry {
            title: clean(r.title),
            company: clean(r.company),
            duration: duration(r.start_year, r.end_year),
            highlights: r.responsibilities.unwrap_or_default(),
        })
        .collect();

    if skills.is_empty() && roles.is_empty() {
        return Err(StageError::Parse(
            "model output contains neither skills nor roles".into(),
        ));
    }

    let projects = wire
        .projects
        .unwrap_or_default()
        .into_iter()
        .filter(|p| p.name.as_deref().map_or(false, |n| !n.trim().is_empty()))
        .map(|p| ProjectEntry {
            name: clean(p.name),
            description: clean(p.description),
            technologies: p
                .tech_stack
                .unwrap_or_default()
                .iter()
                .map(|t| canonical_skill_name(t))
                .collect(),
        })
        .collect();

    let education = wire
        .education
        .unwrap_or_default()
        .into_iter()
        .filter(|e| e.institution.is_some() || e.degree.is_some())
        .map(|e| EducationEntry {
            institution: clean(e.institution),
            degree: clean(e.degree),
            field: e.major.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
            year: year_text(e.grad_year),
        })
        .collect();

    let parsing_confidence = wire
        .meta
        .and_then(|m| m.parsing_confidence)
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_PARSING_CONFIDENCE);

    Ok(ResumeProfile {
        candidate: Candidate {
            name: clean(candidate.name),
            email: if redact_email {
                None
            } else {
                candidate.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty())
            },
            location: clean(candidate.location),
            experience_level: candidate
                .experience_level
                .as_deref()
                .and_then(ExperienceLevel::parse)
                .unwrap_or_default(),
        },
        skills,
        roles,
        projects,
        education,
        parsing_confidence,
    })
}

pub struct ResumeParser {
    model: Option<Arc<dyn DocumentModel>>,
    redact_email: bool,
}

impl ResumeParser {
    pub fn new(model: Option<Arc<dyn DocumentModel>>, redact_email: bool) -> Self {
        Self {
            model,
            redact_email,
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Reads an uploaded document and parses it.
    pub async fn parse_document(
        &self,
        bytes: &[u8],
        declared_format: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<ResumeProfile, StageError> {
        let format = resolve_format(declared_format, file_name)?;
        let text = extract_text_blocking(bytes.to_vec(), format).await?;
        self.parse_text(&text).await
    }

    pub async fn parse_text(&self, text: &str) -> Result<ResumeProfile, StageError> {
        if text.trim().is_empty() {
            return Err(StageError::InsufficientData("resume is empty".into()));
        }
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| StageError::Configuration("no document model is configured".into()))?;

        let raw = model.extract(text).await.map_err(|e| {
            warn!(stage = "resume", error = %e, "document model call failed");
            StageError::Parse(format!("document model did not return structured output: {e}"))
        })?;

        let profile = validate_profile(raw, self.redact_email)?;
        info!(
            stage = "resume",
            skills = profile.skills.len(),
            roles = profile.roles.len(),
            confidence = profile.parsing_confidence,
            "resume parsed"
        );
        Ok(profile)
    }
}
