//! Static title → occupation table used when the lookup is unavailable or unhelpful.

use crate::models::occupation::{MappingSource, OccupationMapping};

struct KnownTitle {
    key: &'static str,
    official_title: &'static str,
    soc_code: &'static str,
    confidence: f64,
}

const fn known(
    key: &'static str,
    official_title: &'static str,
    soc_code: &'static str,
    confidence: f64,
) -> KnownTitle {
    KnownTitle {
        key,
        official_title,
        soc_code,
        confidence,
    }
}

/// Order matters for substring matching: the first hit wins.
const KNOWN_TITLES: &[KnownTitle] = &[
    known("data scientist", "Data Scientists", "15-2051", 0.85),
    known("machine learning engineer", "Data Scientists", "15-2051", 0.80),
    known("ml engineer", "Data Scientists", "15-2051", 0.80),
    known("software engineer", "Software Developers", "15-1252", 0.85),
    known("software developer", "Software Developers", "15-1252", 0.90),
    known("developer", "Software Developers", "15-1252", 0.75),
    known("full stack developer", "Software Developers", "15-1252", 0.85),
    known("frontend developer", "Web Developers", "15-1254", 0.85),
    known("backend developer", "Software Developers", "15-1252", 0.85),
    known("web developer", "Web Developers", "15-1254", 0.90),
    known("devops engineer", "Software Developers", "15-1252", 0.75),
    known("mlops engineer", "Software Developers", "15-1252", 0.70),
    known(
        "cloud engineer",
        "Network and Computer Systems Administrators",
        "15-1244",
        0.80,
    ),
    known("cloud architect", "Computer Network Architects", "15-1241", 0.85),
    known("data analyst", "Data Analysts", "15-2051", 0.85),
    known("data engineer", "Database Architects", "15-1243", 0.80),
    known("business analyst", "Management Analysts", "13-1111", 0.80),
    known(
        "product manager",
        "Computer and Information Systems Managers",
        "11-3021",
        0.75,
    ),
];

const SUBSTRING_PENALTY: f64 = 0.1;
const NO_MATCH_CONFIDENCE: f64 = 0.3;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mapping(entry: &KnownTitle, confidence: f64, notes: String) -> OccupationMapping {
    OccupationMapping {
        official_title: entry.official_title.to_string(),
        soc_code: Some(entry.soc_code.to_string()),
        alternate_titles: Vec::new(),
        confidence,
        source: MappingSource::LocalFallback,
        notes,
    }
}

/// Exact match first, then substring in either direction (penalized), then
/// the input title unchanged with no code.
pub fn lookup(title: &str) -> OccupationMapping {
    let normalized = crate::cache::normalize_query(title);

    if let Some(entry) = KNOWN_TITLES.iter().find(|e| e.key == normalized) {
        return mapping(
            entry,
            entry.confidence,
            "Matched via local occupation table".to_string(),
        );
    }

    if let Some(entry) = KNOWN_TITLES
        .iter()
        .find(|e| normalized.contains(e.key) || e.key.contains(normalized.as_str()))
    {
        return mapping(
            entry,
            round2(entry.confidence - SUBSTRING_PENALTY),
            format!("Partial match: '{}' -> '{}'", title.trim(), entry.key),
        );
    }

    OccupationMapping {
        official_title: title.trim().to_string(),
        soc_code: None,
        alternate_titles: Vec::new(),
        confidence: NO_MATCH_CONFIDENCE,
        source: MappingSource::LocalFallback,
        notes: "No match found. Manual mapping recommended.".to_string(),
    }
}
