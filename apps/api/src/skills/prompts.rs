// LLM prompt constants for the short-term skills stage.

/// Role line for skill extraction. Wrapped with the JSON-only rule at call time.
pub const SKILL_EXTRACTION_ROLE: &str =
    "You are an expert job-analysis system that extracts technical skills from job postings.";

/// Replace `{count}`, `{normalization}` and `{descriptions}` before sending.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the technical skills mentioned in the {count} job descriptions below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": [
    {"name": "Python", "type": "language", "frequency": 80, "mention_count": 8}
  ]
}

Rules:
- "type" is one of: language, framework, library, tool, cloud, database, concept
- "frequency" is the percentage (0-100) of the descriptions that mention the skill
- "mention_count" is the number of descriptions that mention the skill
- {normalization}
- Only include concrete, teachable skills. No soft skills, no benefits, no job titles.

Job descriptions (separated by ---):
{descriptions}
"#;
