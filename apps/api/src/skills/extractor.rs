//! Short-term skills: sample current postings, extract and rank skill mentions.
//!
//! Model extraction is tried first. Unusable model output (transport error,
//! non-JSON, or zero valid skills) selects the keyword extractor instead.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::keywords::{classify_skill, extract_keyword_skills};
use super::normalize::canonical_skill_name;
use super::prompts::{SKILL_EXTRACTION_PROMPT_TEMPLATE, SKILL_EXTRACTION_ROLE};
use crate::cache::{cache_key, ns, TtlCache};
use crate::confidence::confidence;
use crate::config::SkillsSettings;
use crate::errors::StageError;
use crate::llm_client::prompts::{system_prompt, SKILL_NORMALIZATION_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::skill::{ExtractionMethod, Skill, SkillCategory, SkillsReport};
use crate::providers::PostingsSource;

/// Fewer usable descriptions than this is not enough to rank anything.
pub const MIN_USABLE_DESCRIPTIONS: usize = 10;
/// Descriptions sent to the model per extraction call.
pub const MODEL_SAMPLE_SIZE: usize = 10;
pub const MAX_RANKED_SKILLS: usize = 20;

/// Skill as the model reports it. Every field except `name` is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSkill {
    pub name: String,
    #[serde(rename = "type", alias = "category", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub mention_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SkillsPayload {
    #[serde(default)]
    skills: Vec<RawSkill>,
}

#[async_trait]
pub trait SkillAnalyzer: Send + Sync {
    async fn analyze(&self, descriptions: &[String]) -> Result<Vec<RawSkill>, LlmError>;
}

pub struct LlmSkillAnalyzer(pub LlmClient);

#[async_trait]
impl SkillAnalyzer for LlmSkillAnalyzer {
    async fn analyze(&self, descriptions: &[String]) -> Result<Vec<RawSkill>, LlmError> {
        let prompt = SKILL_EXTRACTION_PROMPT_TEMPLATE
            .replace("{count}", &descriptions.len().to_string())
            .replace("{normalization}", SKILL_NORMALIZATION_INSTRUCTION)
            .replace("{descriptions}", &descriptions.join("\n---\n"));
        let payload: SkillsPayload = self
            .0
            .call_json(&prompt, &system_prompt(SKILL_EXTRACTION_ROLE))
            .await?;
        Ok(payload.skills)
    }
}

pub struct SkillsExtractor {
    postings: Option<Arc<dyn PostingsSource>>,
    analyzer: Option<Arc<dyn SkillAnalyzer>>,
    cache: TtlCache,
    settings: SkillsSettings,
    ttl_seconds: u64,
}

impl SkillsExtractor {
    pub fn new(
        postings: Option<Arc<dyn PostingsSource>>,
        analyzer: Option<Arc<dyn SkillAnalyzer>>,
        cache: TtlCache,
        settings: SkillsSettings,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            postings,
            analyzer,
            cache,
            settings,
            ttl_seconds,
        }
    }

    pub fn has_postings(&self) -> bool {
        self.postings.is_some()
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    pub async fn extract(
        &self,
        role: &str,
        soc_code: Option<&str>,
        min_sample_size: Option<usize>,
    ) -> Result<SkillsReport, StageError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(StageError::Unsupported("role must not be empty".into()));
        }
        let target = min_sample_size
            .unwrap_or(self.settings.min_sample_size)
            .max(1);

        let key = cache_key(ns::SKILLS, &[role, &target.to_string()]);
        if let Some(cached) = self.cache.get::<SkillsReport>(&key).await {
            return Ok(cached);
        }

        let postings = self.postings.as_ref().ok_or_else(|| {
            StageError::Configuration("no job-postings source is configured".into())
        })?;

        let descriptions = self.collect_descriptions(postings.as_ref(), role, target).await;
        if descriptions.len() < MIN_USABLE_DESCRIPTIONS {
            return Err(StageError::InsufficientData(format!(
                "only {} usable job postings found for '{role}' (need at least {MIN_USABLE_DESCRIPTIONS})",
                descriptions.len()
            )));
        }

        let (skills, method) = self.extract_skills(&descriptions).await;
        let top_skills = rank_skills(skills, self.settings.min_skill_frequency);

        let report = SkillsReport {
            role: role.to_string(),
            soc_code: soc_code.map(str::to_string),
            top_skills,
            sample_size: descriptions.len(),
            data_source: format!(
                "{} job postings (last {} days)",
                postings.name(),
                self.settings.postings_max_age_days
            ),
            confidence: confidence(descriptions.len()),
            analysis_method: method,
            generated_at: Utc::now(),
            cache_ttl_seconds: self.ttl_seconds,
        };

        self.cache.set(&key, &report, self.ttl_seconds).await;
        info!(
            stage = "market-skills",
            sample_size = report.sample_size,
            skills = report.top_skills.len(),
            confidence = report.confidence,
            method = ?report.analysis_method,
            "market skills ranked"
        );
        Ok(report)
    }

    /// Pages until `target` descriptions, an empty page, or the page limit.
    /// A failing page ends collection with whatever was gathered.
    async fn collect_descriptions(
        &self,
        source: &dyn PostingsSource,
        role: &str,
        target: usize,
    ) -> Vec<String> {
        let mut descriptions = Vec::new();
        for page in 1..=self.settings.max_posting_pages.max(1) {
            match source
                .fetch_page(role, self.settings.postings_max_age_days, page)
                .await
            {
                Ok(batch) if batch.is_empty() => break,
                Ok(batch) => {
                    descriptions.extend(batch.into_iter().filter(|d| !d.trim().is_empty()));
                    debug!(page, collected = descriptions.len(), "postings page fetched");
                    if descriptions.len() >= target {
                        break;
                    }
                }
                Err(e) => {
                    warn!(stage = "market-skills", page, error = %e, "postings fetch failed, stopping pagination");
                    break;
                }
            }
        }
        descriptions.truncate(target);
        descriptions
    }

    async fn extract_skills(&self, descriptions: &[String]) -> (Vec<Skill>, ExtractionMethod) {
        if let Some(analyzer) = &self.analyzer {
            let sample = &descriptions[..descriptions.len().min(MODEL_SAMPLE_SIZE)];
            match analyzer.analyze(sample).await {
                Ok(raw) => {
                    let skills = from_raw_skills(raw, sample.len());
                    if !skills.is_empty() {
                        return (skills, ExtractionMethod::Model);
                    }
                    warn!(stage = "market-skills", "model returned no usable skills, using keyword extraction");
                }
                Err(e) => {
                    warn!(stage = "market-skills", error = %e, "model extraction failed, using keyword extraction");
                }
            }
        }
        (
            extract_keyword_skills(descriptions),
            ExtractionMethod::KeywordFallback,
        )
    }
}

/// Validates model skills: drops blank names, canonicalizes, clamps frequency,
/// and derives missing mention counts from the sample size.
pub fn from_raw_skills(raw: Vec<RawSkill>, sampled: usize) -> Vec<Skill> {
    raw.into_iter()
        .filter_map(|r| {
            let name = canonical_skill_name(&r.name);
            if name.is_empty() {
                return None;
            }
            let frequency = r.frequency.filter(|f| f.is_finite())?.clamp(0.0, 100.0);
            let category = r
                .kind
                .as_deref()
                .and_then(SkillCategory::parse)
                .unwrap_or_else(|| classify_skill(&name));
            let mention_count = r
                .mention_count
                .unwrap_or_else(|| (frequency / 100.0 * sampled as f64).round() as u32);
            Some(Skill {
                name,
                category,
                frequency: frequency.round() as u32,
                mention_count,
            })
        })
        .collect()
}

/// Merges case/synonym duplicates (max frequency, summed mentions), drops
/// skills under `min_frequency`, sorts by frequency then mentions, keeps 20.
pub fn rank_skills(skills: Vec<Skill>, min_frequency: u32) -> Vec<Skill> {
    let mut merged: Vec<Skill> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for skill in skills {
        let name = canonical_skill_name(&skill.name);
        let key = name.to_lowercase();
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut merged[i];
                existing.frequency = existing.frequency.max(skill.frequency);
                existing.mention_count += skill.mention_count;
            }
            None => {
                index.insert(key, merged.len());
                merged.push(Skill { name, ..skill });
            }
        }
    }

    merged.retain(|s| s.frequency >= min_frequency);
    merged.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then(b.mention_count.cmp(&a.mention_count))
            .then_with(|| a.name.cmp(&b.name))
    });
    merged.truncate(MAX_RANKED_SKILLS);
    merged
}
