// LLM prompt constants for resume extraction.

pub const RESUME_EXTRACTION_ROLE: &str = "You are a resume extraction expert.";

/// Replace `{normalization}` and `{resume_text}` before sending.
pub const RESUME_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Parse the resume below and extract:
1. Candidate info (name, email, location, experience level)
2. Work history (roles, companies, timelines, responsibilities)
3. Skills (with proficiency and last-used year)
4. Projects (name, description, tech stack)
5. Education (degree, major, institution, graduation year)

Return a JSON object with this EXACT schema:
{
  "candidate": {
    "name": "string",
    "email": "string or null",
    "location": "string (city, country)",
    "experience_level": "Student|Junior|Mid|Senior"
  },
  "roles_detected": [
    {"title": "string", "company": "string", "start_year": 2020, "end_year": 2023, "responsibilities": ["string"]}
  ],
  "skills": [
    {"name": "string", "type": "language|framework|library|tool|cloud|database|concept", "proficiency": "Beginner|Intermediate|Advanced|Expert", "last_used_year": 2024}
  ],
  "projects": [
    {"name": "string", "description": "string", "tech_stack": ["string"]}
  ],
  "education": [
    {"degree": "string", "major": "string", "institution": "string", "grad_year": 2022}
  ],
  "meta": {"parsing_confidence": 0.0}
}

Rules:
- If a field is missing, use null or an empty array. Never invent content.
- {normalization}
- Use exact years; estimate the year if only months are given.
- parsing_confidence (0.0-1.0) reflects how legible and complete the resume was.

RESUME TEXT:
{resume_text}
"#;
