use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse bucket a skill belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Language,
    Framework,
    Library,
    Tool,
    Cloud,
    #[serde(alias = "db")]
    Database,
    Concept,
}

impl SkillCategory {
    /// Lenient parse used for model output, which is not always consistent about labels.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "language" | "programming language" => Some(Self::Language),
            "framework" => Some(Self::Framework),
            "library" | "lib" => Some(Self::Library),
            "tool" | "tooling" => Some(Self::Tool),
            "cloud" | "platform" => Some(Self::Cloud),
            "database" | "db" => Some(Self::Database),
            "concept" => Some(Self::Concept),
            _ => None,
        }
    }
}

/// A market-demanded skill ranked by how many sampled postings mention it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(alias = "type")]
    pub category: SkillCategory,
    /// Percentage of sampled postings mentioning the skill (0–100).
    pub frequency: u32,
    pub mention_count: u32,
}

/// How the skill list was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    Model,
    KeywordFallback,
}

/// Result of the short-term skills stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsReport {
    pub role: String,
    pub soc_code: Option<String>,
    pub top_skills: Vec<Skill>,
    /// Number of postings the ranking was computed from.
    pub sample_size: usize,
    pub data_source: String,
    pub confidence: f64,
    pub analysis_method: ExtractionMethod,
    pub generated_at: DateTime<Utc>,
    pub cache_ttl_seconds: u64,
}
