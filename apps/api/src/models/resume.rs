use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Student,
    Junior,
    Mid,
    Senior,
}

impl ExperienceLevel {
    /// Accepts the labels used in forms and model output ("mid-level", "senior", ...).
    pub fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "student" | "intern" | "graduate" => Some(Self::Student),
            "junior" | "entry" | "entry-level" | "entry level" => Some(Self::Junior),
            "mid" | "mid-level" | "mid level" | "intermediate" => Some(Self::Mid),
            "senior" | "lead" | "principal" | "staff" => Some(Self::Senior),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Junior => "Junior",
            Self::Mid => "Mid",
            Self::Senior => "Senior",
        }
    }
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        Self::Junior
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "beginner" | "basic" | "novice" => Some(Self::Beginner),
            "intermediate" | "proficient" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    /// Removed before the profile leaves the parser when email redaction is on.
    pub email: Option<String>,
    pub location: String,
    pub experience_level: ExperienceLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSkill {
    pub name: String,
    pub proficiency: Option<Proficiency>,
    pub last_used_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub title: String,
    pub company: String,
    pub duration: Option<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub year: Option<String>,
}

/// Structured view of an uploaded resume. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub candidate: Candidate,
    pub skills: Vec<ResumeSkill>,
    pub roles: Vec<RoleEntry>,
    pub projects: Vec<ProjectEntry>,
    pub education: Vec<EducationEntry>,
    pub parsing_confidence: f64,
}

impl ResumeProfile {
    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name.clone()).collect()
    }
}

/// Declared format of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

impl DocumentFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "text" | "md" => Some(Self::Text),
            _ => None,
        }
    }

    /// Infers the format from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::parse(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_parse_variants() {
        assert_eq!(ExperienceLevel::parse("Mid-Level"), Some(ExperienceLevel::Mid));
        assert_eq!(ExperienceLevel::parse("entry level"), Some(ExperienceLevel::Junior));
        assert_eq!(ExperienceLevel::parse("Senior"), Some(ExperienceLevel::Senior));
        assert_eq!(ExperienceLevel::parse("wizard"), None);
        assert_eq!(ExperienceLevel::default(), ExperienceLevel::Junior);
    }

    #[test]
    fn test_document_format_from_file_name() {
        assert_eq!(DocumentFormat::from_file_name("cv.PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_file_name("cv.final.docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_file_name("notes.txt"), Some(DocumentFormat::Text));
        assert_eq!(DocumentFormat::from_file_name("resume"), None);
        assert_eq!(DocumentFormat::from_file_name("resume.odt"), None);
    }
}
