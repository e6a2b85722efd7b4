use std::sync::Arc;

use tracing::{info, warn};

use super::local_table;
use crate::cache::{cache_key, ns, TtlCache};
use crate::errors::StageError;
use crate::models::occupation::{MappingSource, OccupationCandidate, OccupationMapping};
use crate::providers::OccupationLookup;

/// Query phrase → hints looked for in a candidate's title or code. Ordered.
const PRIORITY_KEYWORDS: &[(&str, &[&str])] = &[
    ("data scientist", &["data scien", "15-2051"]),
    ("software engineer", &["software dev", "software eng", "15-1252"]),
    ("machine learning", &["data scien", "15-2051"]),
    ("cloud engineer", &["network", "cloud", "15-1244"]),
    ("devops", &["software dev", "15-1252"]),
    (
        "data analyst",
        &["data anal", "operations research", "15-2041"],
    ),
    ("web developer", &["web dev", "15-1254"]),
];

const EXACT_CONFIDENCE: f64 = 1.0;
const PRIORITY_CONFIDENCE: f64 = 0.9;
const FIRST_RESULT_CONFIDENCE: f64 = 0.75;

pub struct RoleMapper {
    lookup: Option<Arc<dyn OccupationLookup>>,
    cache: TtlCache,
    ttl_seconds: u64,
}

impl RoleMapper {
    pub fn new(
        lookup: Option<Arc<dyn OccupationLookup>>,
        cache: TtlCache,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            lookup,
            cache,
            ttl_seconds,
        }
    }

    pub fn has_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    /// Resolves a free-text title. Only lookup-backed mappings are cached so a
    /// recovered upstream is picked up on the next call.
    pub async fn map(&self, title: &str) -> Result<OccupationMapping, StageError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StageError::Unsupported("job title must not be empty".into()));
        }

        let key = cache_key(ns::ROLE_MAP, &[title]);
        if let Some(cached) = self.cache.get::<OccupationMapping>(&key).await {
            return Ok(cached);
        }

        let mapping = match &self.lookup {
            Some(lookup) => match lookup.search(title).await {
                Ok(candidates) => match select_best_match(title, &candidates) {
                    Some(mapping) => {
                        self.cache.set(&key, &mapping, self.ttl_seconds).await;
                        mapping
                    }
                    None => {
                        warn!(stage = "role-mapping", "lookup returned no usable candidates, using local table");
                        local_table::lookup(title)
                    }
                },
                Err(e) => {
                    warn!(stage = "role-mapping", error = %e, "occupation lookup failed, using local table");
                    local_table::lookup(title)
                }
            },
            None => local_table::lookup(title),
        };

        info!(
            stage = "role-mapping",
            soc = mapping.soc_code.as_deref().unwrap_or("none"),
            confidence = mapping.confidence,
            source = ?mapping.source,
            "role mapped"
        );
        Ok(mapping)
    }
}

/// `15-2051.01` → `15-2051`.
pub fn format_soc_code(onet_code: &str) -> String {
    onet_code
        .split('.')
        .next()
        .unwrap_or(onet_code)
        .trim()
        .to_string()
}

fn is_usable(candidate: &OccupationCandidate) -> bool {
    !candidate.title.trim().is_empty() && !candidate.code.trim().is_empty()
}

fn to_mapping(candidate: &OccupationCandidate, confidence: f64, notes: String) -> OccupationMapping {
    OccupationMapping {
        official_title: candidate.title.trim().to_string(),
        soc_code: Some(format_soc_code(&candidate.code)),
        alternate_titles: candidate.alternate_titles.clone(),
        confidence,
        source: MappingSource::Api,
        notes,
    }
}

/// Tie-break over lookup candidates in the order they were returned: the
/// first candidate that is either an exact title match or a priority keyword
/// hit wins, otherwise the first candidate. `None` when no candidate is usable.
pub fn select_best_match(
    query: &str,
    candidates: &[OccupationCandidate],
) -> Option<OccupationMapping> {
    let usable: Vec<&OccupationCandidate> = candidates.iter().filter(|c| is_usable(c)).collect();
    let first = *usable.first()?;
    let query_lower = crate::cache::normalize_query(query);

    for candidate in &usable {
        if crate::cache::normalize_query(&candidate.title) == query_lower {
            return Some(to_mapping(candidate, EXACT_CONFIDENCE, "Exact match found".into()));
        }
        if let Some(phrase) = priority_hit(&query_lower, candidate) {
            return Some(to_mapping(
                candidate,
                PRIORITY_CONFIDENCE,
                format!("Matched via priority keywords: {phrase}"),
            ));
        }
    }

    Some(to_mapping(
        first,
        FIRST_RESULT_CONFIDENCE,
        "Best available match from lookup results".into(),
    ))
}

/// First priority phrase in the query whose hints appear in the candidate.
fn priority_hit(query_lower: &str, candidate: &OccupationCandidate) -> Option<&'static str> {
    let title = candidate.title.to_lowercase();
    PRIORITY_KEYWORDS
        .iter()
        .filter(|(phrase, _)| query_lower.contains(phrase))
        .find(|(_, hints)| {
            hints
                .iter()
                .any(|hint| title.contains(hint) || candidate.code.contains(hint))
        })
        .map(|(phrase, _)| *phrase)
}
