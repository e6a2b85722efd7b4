//! Deterministic skill extraction used when the model path is unavailable.

use crate::models::skill::{Skill, SkillCategory};

const DATABASE_HINTS: &[&str] = &[
    "mysql",
    "postgresql",
    "postgres",
    "mongodb",
    "redis",
    "sqlite",
    "oracle",
    "cassandra",
    "dynamodb",
    "database",
];
const CLOUD_HINTS: &[&str] = &["aws", "azure", "gcp", "google cloud", "cloud"];
const FRAMEWORK_HINTS: &[&str] = &[
    "react", "angular", "vue", "django", "flask", "fastapi", "spring", "node", "tensorflow",
    "pytorch", "keras", "spark", "pandas", "scikit", "rails",
];
const LANGUAGE_HINTS: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "java",
    "sql",
    "c++",
    "c#",
    "rust",
    "scala",
    "kotlin",
    "ruby",
    "swift",
    "php",
];
/// Too short to test by substring.
const SHORT_LANGUAGES: &[&str] = &["r", "go", "c"];

/// Buckets a skill name. Databases are checked before languages so that
/// names like "PostgreSQL" are not caught by the "sql" hint.
pub fn classify_skill(name: &str) -> SkillCategory {
    let lowered = name.trim().to_lowercase();
    let has = |hints: &[&str]| hints.iter().any(|h| lowered.contains(h));

    if has(DATABASE_HINTS) {
        SkillCategory::Database
    } else if has(CLOUD_HINTS) {
        SkillCategory::Cloud
    } else if has(FRAMEWORK_HINTS) {
        SkillCategory::Framework
    } else if has(LANGUAGE_HINTS) || SHORT_LANGUAGES.contains(&lowered.as_str()) {
        SkillCategory::Language
    } else {
        SkillCategory::Concept
    }
}

/// Canonical name → terms searched for in posting text (lower-case).
const VOCABULARY: &[(&str, &[&str])] = &[
    ("Python", &["python"]),
    ("Java", &["java"]),
    ("JavaScript", &["javascript"]),
    ("TypeScript", &["typescript"]),
    ("SQL", &["sql"]),
    ("Go", &["golang"]),
    ("Rust", &["rust"]),
    ("C++", &["c++"]),
    ("C#", &["c#"]),
    ("Scala", &["scala"]),
    ("Kotlin", &["kotlin"]),
    ("React", &["react", "react.js", "reactjs"]),
    ("Angular", &["angular"]),
    ("Vue", &["vue", "vue.js"]),
    ("Django", &["django"]),
    ("Flask", &["flask"]),
    ("Spring", &["spring boot", "spring"]),
    ("Node.js", &["node.js", "nodejs"]),
    ("TensorFlow", &["tensorflow"]),
    ("PyTorch", &["pytorch"]),
    ("scikit-learn", &["scikit-learn", "sklearn"]),
    ("Spark", &["apache spark", "spark", "pyspark"]),
    ("pandas", &["pandas"]),
    ("AWS", &["aws", "amazon web services"]),
    ("Azure", &["azure"]),
    ("Google Cloud", &["gcp", "google cloud"]),
    ("PostgreSQL", &["postgresql", "postgres"]),
    ("MySQL", &["mysql"]),
    ("MongoDB", &["mongodb"]),
    ("Redis", &["redis"]),
    ("Docker", &["docker"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("Terraform", &["terraform"]),
    ("Git", &["git"]),
    ("Airflow", &["airflow"]),
    ("Tableau", &["tableau"]),
    ("Machine Learning", &["machine learning"]),
    ("Deep Learning", &["deep learning"]),
    ("Natural Language Processing", &["natural language processing", "nlp"]),
    ("Statistics", &["statistics", "statistical"]),
    ("Data Visualization", &["data visualization"]),
    ("CI/CD", &["ci/cd", "cicd", "continuous integration"]),
    ("Microservices", &["microservices"]),
    ("REST APIs", &["rest api", "restful"]),
    ("Agile", &["agile", "scrum"]),
];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Substring match that requires non-word characters (or text edges) around the term.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        let starts_clean = before.map_or(true, |c| !is_word_char(c));
        let ends_clean = after.map_or(true, |c| !is_word_char(c))
            || term.chars().last().map_or(false, |c| !is_word_char(c));
        starts_clean && ends_clean
    })
}

/// Counts, per vocabulary skill, how many descriptions mention it.
/// Frequency is the share of descriptions in percent.
pub fn extract_keyword_skills(descriptions: &[String]) -> Vec<Skill> {
    if descriptions.is_empty() {
        return Vec::new();
    }
    let lowered: Vec<String> = descriptions.iter().map(|d| d.to_lowercase()).collect();
    let total = lowered.len() as f64;

    VOCABULARY
        .iter()
        .filter_map(|(name, terms)| {
            let mentions = lowered
                .iter()
                .filter(|text| terms.iter().any(|t| contains_term(text, t)))
                .count();
            if mentions == 0 {
                return None;
            }
            Some(Skill {
                name: name.to_string(),
                category: classify_skill(name),
                frequency: ((mentions as f64 / total) * 100.0).round() as u32,
                mention_count: mentions as u32,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_skill_order() {
        assert_eq!(classify_skill("PostgreSQL"), SkillCategory::Database);
        assert_eq!(classify_skill("SQL"), SkillCategory::Language);
        assert_eq!(classify_skill("AWS"), SkillCategory::Cloud);
        assert_eq!(classify_skill("React"), SkillCategory::Framework);
        assert_eq!(classify_skill("Python"), SkillCategory::Language);
        assert_eq!(classify_skill("Go"), SkillCategory::Language);
        assert_eq!(classify_skill("R"), SkillCategory::Language);
        assert_eq!(classify_skill("Docker"), SkillCategory::Concept);
        assert_eq!(classify_skill("Graph theory"), SkillCategory::Concept);
    }

    #[test]
    fn test_contains_term_respects_word_boundaries() {
        assert!(contains_term("we use java and sql", "java"));
        assert!(!contains_term("we use javascript", "java"));
        assert!(contains_term("strong c++ skills", "c++"));
        assert!(contains_term("ci/cd pipelines", "ci/cd"));
        assert!(!contains_term("digital transformation", "git"));
        assert!(contains_term("git, docker", "git"));
    }

    #[test]
    fn test_extract_keyword_skills_frequency_is_percent_of_descriptions() {
        let descriptions = vec![
            "Python and SQL required. Python daily.".to_string(),
            "Experience with Python and AWS".to_string(),
            "Java developer".to_string(),
            "Docker, Kubernetes (k8s)".to_string(),
        ];
        let skills = extract_keyword_skills(&descriptions);
        let python = skills.iter().find(|s| s.name == "Python").unwrap();
        assert_eq!(python.mention_count, 2);
        assert_eq!(python.frequency, 50);

        let k8s = skills.iter().find(|s| s.name == "Kubernetes").unwrap();
        assert_eq!(k8s.mention_count, 1);
        assert_eq!(k8s.frequency, 25);

        assert!(skills.iter().all(|s| s.name != "JavaScript"));
    }
}
