use serde::{Deserialize, Serialize};

/// Ordering matters: `High < Medium < Low` is the learning-path sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapItem {
    pub skill: String,
    /// 1-based position in the market ranking.
    pub market_rank: u32,
    pub priority: Priority,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapMethod {
    Llm,
    RulesFallback,
}

/// Canonical gap-evaluation output. Both evaluator paths produce this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub role_outlook: String,
    pub gap_analysis: Vec<GapItem>,
    /// At most five skill names, in learning order.
    pub recommended_learning_path: Vec<String>,
    pub estimated_time_weeks: u32,
    pub confidence: f64,
    pub matching_skills: Vec<String>,
    /// Percentage of considered market skills already held.
    pub match_score: u32,
    pub analysis_method: GapMethod,
}
