use serde::{Deserialize, Serialize};

/// Where a mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingSource {
    Api,
    LocalFallback,
}

/// A free-text job title resolved to an official occupation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationMapping {
    pub official_title: String,
    /// `None` when nothing matched and manual mapping is needed.
    pub soc_code: Option<String>,
    pub alternate_titles: Vec<String>,
    pub confidence: f64,
    pub source: MappingSource,
    pub notes: String,
}

/// One occupation returned by the external lookup, before the best-match policy runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationCandidate {
    pub title: String,
    /// O*NET style code, e.g. `15-2051.01`.
    pub code: String,
    #[serde(default)]
    pub alternate_titles: Vec<String>,
}
