// Cross-cutting prompt fragments.
// Each stage that calls the LLM keeps its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Canonical skill spellings the model is asked to use everywhere.
pub const SKILL_NORMALIZATION_INSTRUCTION: &str = "\
    Normalize skill names to their canonical form: \
    'ML' -> 'Machine Learning', 'JS' -> 'JavaScript', 'TS' -> 'TypeScript', \
    'k8s' -> 'Kubernetes', 'Postgres' -> 'PostgreSQL', 'golang' -> 'Go', \
    'Amazon Web Services' -> 'AWS'. Never list the same skill twice.";

/// Builds a stage system prompt from a role line plus the JSON-only rule.
pub fn system_prompt(role_line: &str) -> String {
    format!("{role_line} {JSON_ONLY_SYSTEM}")
}
