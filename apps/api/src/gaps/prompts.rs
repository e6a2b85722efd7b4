// LLM prompt constants for gap evaluation.

pub const GAP_EVALUATION_ROLE: &str =
    "You are a career advisor who compares a candidate's skills with current market demand.";

/// Replace `{resume_skills}`, `{market_skills}` and `{role_outlook}` before sending.
pub const GAP_EVALUATION_PROMPT_TEMPLATE: &str = r#"Compare the candidate's skills with the ranked market skills and identify the gaps.

Candidate skills:
{resume_skills}

Market skills, most demanded first (rank in brackets):
{market_skills}

Role outlook: {role_outlook}

Return a JSON object with this EXACT schema (no extra fields):
{
  "role_outlook": "string",
  "gap_analysis": [
    {"skill": "AWS", "market_rank": 2, "priority": "High", "reasoning": "string"}
  ],
  "recommended_learning_path": ["AWS"],
  "confidence": 0.8
}

Rules:
- Only list market skills the candidate does not already have.
- market_rank is the bracketed rank from the list above.
- priority is exactly one of: High, Medium, Low. Growing roles make top-10 skills High.
- recommended_learning_path has at most 5 skills taken from gap_analysis, most urgent first.
- confidence is between 0.0 and 1.0.
"#;
