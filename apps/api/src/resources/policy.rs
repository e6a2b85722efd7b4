//! Selection policy for learning resources: trusted channels, per-level
//! queries, quality filter, difficulty inference and ranking.

use chrono::{Duration, NaiveDate};

use crate::models::resource::{Difficulty, Resource, VideoCandidate};
use crate::models::resume::ExperienceLevel;

/// Trusted channels as (display name, channel id). Only the first
/// `SEARCHED_CHANNELS` are queried per skill.
pub const TRUSTED_CHANNELS: &[(&str, &str)] = &[
    ("freeCodeCamp", "UC8butISFwT-Wl7EV0hUK0BQ"),
    ("Google Cloud Tech", "UCTMRxtyHoE3LPcrl-kT4AQQ"),
    ("CS50", "UCcabW7890RKdqK30I2r-0Aa"),
    ("MIT OCW", "UCEBb1b_L6zDS3xTUrIALZOw"),
    ("Coursera", "UC4Snw5yrSDMXys31I18U3gg"),
    ("Traversy Media", "UC29ju8bIPH5as8OGnQzwJyA"),
    ("Programming with Mosh", "UCWv7vMbMWH4-V0ZXdmDpPBA"),
];

pub const SEARCHED_CHANNELS: usize = 5;
pub const RESULTS_PER_CHANNEL: u32 = 2;

pub const MAX_AGE_DAYS: i64 = 5 * 365;
pub const MIN_VIEWS: u64 = 100_000;
pub const MIN_VIEWS_RECENT: u64 = 50_000;

const BEGINNER_CUES: &[&str] = &["beginner", "introduction", "basics", "101", "crash course"];
const ADVANCED_CUES: &[&str] = &["advanced", "expert", "mastery", "deep dive"];
const INTERMEDIATE_CUES: &[&str] = &["intermediate", "beyond basics"];

pub fn level_query(skill: &str, level: ExperienceLevel) -> String {
    let suffix = match level {
        ExperienceLevel::Student => "beginner tutorial basics introduction",
        ExperienceLevel::Junior => "beginner tutorial project",
        ExperienceLevel::Mid => "intermediate advanced tutorial",
        ExperienceLevel::Senior => "advanced expert mastery deep dive",
    };
    format!("{} {suffix}", skill.trim())
}

/// Upload age is a hard gate. Within it, 100k views qualify outright and
/// 50k views qualify as the relaxed allowance for recent uploads.
pub fn passes_quality_filter(candidate: &VideoCandidate, today: NaiveDate) -> bool {
    let recent = candidate.upload_date >= today - Duration::days(MAX_AGE_DAYS);
    if !recent {
        return false;
    }
    candidate.views >= MIN_VIEWS || candidate.views >= MIN_VIEWS_RECENT
}

pub fn infer_difficulty(title: &str, level: ExperienceLevel) -> Difficulty {
    let title = title.to_lowercase();
    let has_any = |cues: &[&str]| cues.iter().any(|cue| title.contains(cue));

    if has_any(BEGINNER_CUES) {
        Difficulty::Beginner
    } else if has_any(ADVANCED_CUES) {
        Difficulty::Advanced
    } else if has_any(INTERMEDIATE_CUES) {
        Difficulty::Intermediate
    } else {
        match level {
            ExperienceLevel::Student | ExperienceLevel::Junior => Difficulty::Beginner,
            ExperienceLevel::Mid => Difficulty::Intermediate,
            ExperienceLevel::Senior => Difficulty::Advanced,
        }
    }
}

pub fn recommendation_reason(duration_minutes: u32, views: u64, level: ExperienceLevel) -> String {
    let mut parts = vec![match duration_minutes {
        181.. => "Comprehensive deep dive",
        61..=180 => "Thorough tutorial",
        _ => "Concise introduction",
    }
    .to_string()];
    if views > 1_000_000 {
        parts.push("highly popular".to_string());
    } else if views > 500_000 {
        parts.push("well-received".to_string());
    }
    parts.push(format!("suitable for {} level", level.as_str().to_lowercase()));
    parts.join("; ")
}

pub fn to_resource(candidate: VideoCandidate, level: ExperienceLevel) -> Resource {
    Resource {
        url: format!("https://www.youtube.com/watch?v={}", candidate.video_id),
        difficulty: infer_difficulty(&candidate.title, level),
        reason: recommendation_reason(candidate.duration_minutes, candidate.views, level),
        title: candidate.title,
        channel: candidate.channel,
        duration_minutes: candidate.duration_minutes,
        views: candidate.views,
        upload_date: candidate.upload_date,
    }
}

/// Filters, converts and keeps the `max_results` most viewed candidates.
/// Duplicate video ids (the same video found via two channels) are dropped.
pub fn select_resources(
    candidates: Vec<VideoCandidate>,
    level: ExperienceLevel,
    today: NaiveDate,
    max_results: usize,
) -> Vec<Resource> {
    let mut seen = std::collections::HashSet::new();
    let mut kept: Vec<VideoCandidate> = candidates
        .into_iter()
        .filter(|c| passes_quality_filter(c, today))
        .filter(|c| seen.insert(c.video_id.clone()))
        .collect();
    kept.sort_by(|a, b| b.views.cmp(&a.views));
    kept.into_iter()
        .take(max_results)
        .map(|c| to_resource(c, level))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn candidate(id: &str, title: &str, views: u64, years_old: i64) -> VideoCandidate {
        VideoCandidate {
            video_id: id.to_string(),
            title: title.to_string(),
            channel: "freeCodeCamp".to_string(),
            views,
            duration_minutes: 90,
            upload_date: today() - Duration::days(years_old * 365),
        }
    }

    #[test]
    fn test_filter_relaxed_allowance_for_recent_upload() {
        assert!(passes_quality_filter(&candidate("a", "t", 80_000, 2), today()));
    }

    #[test]
    fn test_filter_rejects_old_moderate_views() {
        assert!(!passes_quality_filter(&candidate("a", "t", 80_000, 6), today()));
    }

    #[test]
    fn test_filter_age_gate_is_hard() {
        assert!(!passes_quality_filter(&candidate("a", "t", 200_000, 6), today()));
    }

    #[test]
    fn test_filter_rejects_low_views() {
        assert!(!passes_quality_filter(&candidate("a", "t", 49_999, 1), today()));
    }

    #[test]
    fn test_difficulty_title_cues_beat_level() {
        assert_eq!(
            infer_difficulty("Docker Crash Course", ExperienceLevel::Senior),
            Difficulty::Beginner
        );
        assert_eq!(
            infer_difficulty("Kubernetes Deep Dive", ExperienceLevel::Student),
            Difficulty::Advanced
        );
        assert_eq!(
            infer_difficulty("SQL beyond basics", ExperienceLevel::Junior),
            Difficulty::Beginner
        );
        assert_eq!(
            infer_difficulty("Intermediate Rust", ExperienceLevel::Junior),
            Difficulty::Intermediate
        );
    }

    #[test]
    fn test_difficulty_defaults_by_level() {
        assert_eq!(infer_difficulty("AWS", ExperienceLevel::Junior), Difficulty::Beginner);
        assert_eq!(infer_difficulty("AWS", ExperienceLevel::Mid), Difficulty::Intermediate);
        assert_eq!(infer_difficulty("AWS", ExperienceLevel::Senior), Difficulty::Advanced);
    }

    #[test]
    fn test_reason_mentions_length_popularity_and_level() {
        assert_eq!(
            recommendation_reason(200, 2_000_000, ExperienceLevel::Mid),
            "Comprehensive deep dive; highly popular; suitable for mid level"
        );
        assert_eq!(
            recommendation_reason(30, 10_000, ExperienceLevel::Student),
            "Concise introduction; suitable for student level"
        );
    }

    #[test]
    fn test_select_ranks_by_views_and_truncates() {
        let picked = select_resources(
            vec![
                candidate("a", "A", 120_000, 1),
                candidate("b", "B", 900_000, 1),
                candidate("c", "C", 60_000, 1),
                candidate("d", "D", 5_000_000, 7),
                candidate("b", "B again", 900_000, 1),
                candidate("e", "E", 300_000, 3),
            ],
            ExperienceLevel::Junior,
            today(),
            3,
        );
        let titles: Vec<&str> = picked.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "E", "A"]);
        assert_eq!(picked[0].url, "https://www.youtube.com/watch?v=b");
    }

    #[test]
    fn test_level_query_suffix() {
        assert_eq!(
            level_query(" Docker ", ExperienceLevel::Junior),
            "Docker beginner tutorial project"
        );
    }
}
