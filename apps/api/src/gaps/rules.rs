//! Rules-based gap evaluation. Deterministic, always available, and the
//! canonical output shape every other evaluator must reproduce.

use std::collections::HashSet;

use super::evaluator::GapRequest;
use crate::models::gap::{GapItem, GapMethod, GapReport, Priority};
use crate::skills::normalize::canonical_skill_name;

/// Policy constant, not computed from the gaps.
pub const DEFAULT_ESTIMATED_WEEKS: u32 = 12;
pub const MAX_LEARNING_PATH: usize = 5;
/// Only the top of the market ranking is considered.
pub const MAX_MARKET_SKILLS: usize = 20;

const CONFIDENCE_WITH_GAPS: f64 = 0.75;
const CONFIDENCE_WITHOUT_GAPS: f64 = 0.4;

/// Priority from market rank and the outlook text.
///
/// | outlook                              | rank ≤ 10 | 11–20  | > 20 |
/// |--------------------------------------|-----------|--------|------|
/// | starts with "high" / has "future"    | High      | Medium | Low  |
/// | starts with "stable"                 | Medium    | Low    | Low  |
/// | anything else                        | Low       | Low    | Low  |
pub fn priority_for(market_rank: u32, role_outlook: &str) -> Priority {
    let outlook = role_outlook.trim().to_lowercase();
    if outlook.starts_with("high") || outlook.contains("future") {
        match market_rank {
            0..=10 => Priority::High,
            11..=20 => Priority::Medium,
            _ => Priority::Low,
        }
    } else if outlook.starts_with("stable") {
        if market_rank <= 10 {
            Priority::Medium
        } else {
            Priority::Low
        }
    } else {
        Priority::Low
    }
}

/// Case-insensitive, synonym-aware key for skill comparisons.
pub fn skill_key(name: &str) -> String {
    canonical_skill_name(name).to_lowercase()
}

pub fn resume_skill_set(resume_skills: &[String]) -> HashSet<String> {
    resume_skills
        .iter()
        .map(|s| skill_key(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Top market skills with their 1-based rank, later duplicates dropped.
pub fn considered_market_skills(market_skills: &[String]) -> Vec<(u32, String)> {
    let mut seen = HashSet::new();
    market_skills
        .iter()
        .take(MAX_MARKET_SKILLS)
        .enumerate()
        .filter(|(_, name)| {
            let key = skill_key(name);
            !key.is_empty() && seen.insert(key)
        })
        .map(|(i, name)| (i as u32 + 1, name.trim().to_string()))
        .collect()
}

/// Market skills already held and the share of considered skills they represent.
pub fn matching_summary(request: &GapRequest) -> (Vec<String>, u32) {
    let held = resume_skill_set(&request.resume_skills);
    let considered = considered_market_skills(&request.market_skills);
    let matching: Vec<String> = considered
        .iter()
        .filter(|(_, name)| held.contains(&skill_key(name)))
        .map(|(_, name)| name.clone())
        .collect();
    let score = if considered.is_empty() {
        0
    } else {
        ((matching.len() as f64 / considered.len() as f64) * 100.0).round() as u32
    };
    (matching, score)
}

pub fn outlook_label(role_outlook: &str) -> String {
    let trimmed = role_outlook.trim();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn evaluate_rules(request: &GapRequest) -> GapReport {
    let held = resume_skill_set(&request.resume_skills);
    let outlook = outlook_label(&request.role_outlook);

    let mut gaps: Vec<GapItem> = considered_market_skills(&request.market_skills)
        .into_iter()
        .filter(|(_, name)| !held.contains(&skill_key(name)))
        .map(|(rank, name)| GapItem {
            priority: priority_for(rank, &outlook),
            reasoning: format!("Rank #{rank} in short-term demand; role outlook: {outlook}."),
            skill: name,
            market_rank: rank,
        })
        .collect();
    gaps.sort_by_key(|g| (g.priority, g.market_rank));

    let recommended_learning_path = gaps
        .iter()
        .take(MAX_LEARNING_PATH)
        .map(|g| g.skill.clone())
        .collect();
    let (matching_skills, match_score) = matching_summary(request);

    GapReport {
        role_outlook: outlook,
        confidence: if gaps.is_empty() {
            CONFIDENCE_WITHOUT_GAPS
        } else {
            CONFIDENCE_WITH_GAPS
        },
        gap_analysis: gaps,
        recommended_learning_path,
        estimated_time_weeks: request.time_budget_weeks.unwrap_or(DEFAULT_ESTIMATED_WEEKS),
        matching_skills,
        match_score,
        analysis_method: GapMethod::RulesFallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(resume: &[&str], market: &[&str], outlook: &str) -> GapRequest {
        GapRequest {
            resume_skills: resume.iter().map(|s| s.to_string()).collect(),
            market_skills: market.iter().map(|s| s.to_string()).collect(),
            role_outlook: outlook.to_string(),
            time_budget_weeks: None,
        }
    }

    #[test]
    fn test_reference_example() {
        let report = evaluate_rules(&request(
            &["Python", "Docker", "SQL"],
            &["Python", "AWS", "Kubernetes", "Docker", "CI/CD"],
            "High growth (Future-safe)",
        ));

        let gaps: Vec<(&str, u32, Priority)> = report
            .gap_analysis
            .iter()
            .map(|g| (g.skill.as_str(), g.market_rank, g.priority))
            .collect();
        assert_eq!(
            gaps,
            vec![
                ("AWS", 2, Priority::High),
                ("Kubernetes", 3, Priority::High),
                ("CI/CD", 5, Priority::High),
            ]
        );
        assert_eq!(report.recommended_learning_path, vec!["AWS", "Kubernetes", "CI/CD"]);
        assert_eq!(report.matching_skills, vec!["Python", "Docker"]);
        assert_eq!(report.match_score, 40);
        assert_eq!(report.confidence, 0.75);
        assert_eq!(report.estimated_time_weeks, 12);
        assert_eq!(report.analysis_method, GapMethod::RulesFallback);
    }

    #[test]
    fn test_priority_table() {
        assert_eq!(priority_for(10, "High growth"), Priority::High);
        assert_eq!(priority_for(11, "high"), Priority::Medium);
        assert_eq!(priority_for(20, "Future-safe"), Priority::Medium);
        assert_eq!(priority_for(21, "Future-safe"), Priority::Low);
        assert_eq!(priority_for(3, "Stable demand"), Priority::Medium);
        assert_eq!(priority_for(11, "stable"), Priority::Low);
        assert_eq!(priority_for(1, "Declining"), Priority::Low);
        assert_eq!(priority_for(1, ""), Priority::Low);
    }

    #[test]
    fn test_is_deterministic() {
        let req = request(
            &["rust"],
            &["Python", "Rust", "AWS", "Go", "SQL", "Docker", "Kubernetes", "Terraform"],
            "Stable",
        );
        let first = evaluate_rules(&req);
        for _ in 0..10 {
            assert_eq!(evaluate_rules(&req), first);
        }
    }

    #[test]
    fn test_sorting_puts_higher_priority_first_then_rank() {
        let market: Vec<String> = (1..=20).map(|i| format!("Skill{i}")).collect();
        let market_refs: Vec<&str> = market.iter().map(String::as_str).collect();
        let report = evaluate_rules(&request(&["Skill1"], &market_refs, "Future-safe"));

        assert_eq!(report.gap_analysis.len(), 19);
        assert_eq!(report.gap_analysis[0].market_rank, 2);
        assert_eq!(report.gap_analysis[8].priority, Priority::High);
        assert_eq!(report.gap_analysis[9].priority, Priority::Medium);
        assert_eq!(report.recommended_learning_path.len(), 5);
    }

    #[test]
    fn test_only_top_twenty_market_skills_are_considered() {
        let market: Vec<String> = (1..=25).map(|i| format!("Skill{i}")).collect();
        let market_refs: Vec<&str> = market.iter().map(String::as_str).collect();
        let report = evaluate_rules(&request(&[], &market_refs, "High"));
        assert_eq!(report.gap_analysis.len(), 20);
        assert!(report.gap_analysis.iter().all(|g| g.market_rank <= 20));
    }

    #[test]
    fn test_matching_is_case_insensitive_and_synonym_aware() {
        let report = evaluate_rules(&request(
            &["PYTHON", "k8s"],
            &["Python", "Kubernetes", "AWS"],
            "High",
        ));
        assert_eq!(report.recommended_learning_path, vec!["AWS"]);
    }

    #[test]
    fn test_no_gaps_gives_low_confidence_and_caller_weeks() {
        let mut req = request(&["Python", "SQL"], &["Python", "SQL"], "Declining");
        req.time_budget_weeks = Some(6);
        let report = evaluate_rules(&req);
        assert!(report.gap_analysis.is_empty());
        assert!(report.recommended_learning_path.is_empty());
        assert_eq!(report.confidence, 0.4);
        assert_eq!(report.match_score, 100);
        assert_eq!(report.estimated_time_weeks, 6);
    }

    #[test]
    fn test_declining_outlook_is_all_low_but_rank_ordered() {
        let report = evaluate_rules(&request(&[], &["A", "B", "C"], "Declining"));
        let ranks: Vec<u32> = report.gap_analysis.iter().map(|g| g.market_rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(report.gap_analysis.iter().all(|g| g.priority == Priority::Low));
    }
}
