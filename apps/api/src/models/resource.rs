use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub channel: String,
    pub url: String,
    pub duration_minutes: u32,
    pub views: u64,
    pub upload_date: NaiveDate,
    pub difficulty: Difficulty,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRecommendation {
    pub skill: String,
    pub recommended_order: u32,
    pub resources: Vec<Resource>,
}

/// Raw search hit before the filter and rank policy runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCandidate {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub views: u64,
    pub duration_minutes: u32,
    pub upload_date: NaiveDate,
}
