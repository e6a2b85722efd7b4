//! Canonical skill names, shared by the skills stage and the resume parser.

use std::collections::HashSet;

/// Lower-cased alias → canonical spelling.
const SYNONYMS: &[(&str, &str)] = &[
    ("ml", "Machine Learning"),
    ("machine learning", "Machine Learning"),
    ("dl", "Deep Learning"),
    ("deep learning", "Deep Learning"),
    ("ai", "Artificial Intelligence"),
    ("artificial intelligence", "Artificial Intelligence"),
    ("nlp", "Natural Language Processing"),
    ("natural language processing", "Natural Language Processing"),
    ("js", "JavaScript"),
    ("javascript", "JavaScript"),
    ("ts", "TypeScript"),
    ("typescript", "TypeScript"),
    ("k8s", "Kubernetes"),
    ("kubernetes", "Kubernetes"),
    ("golang", "Go"),
    ("go", "Go"),
    ("postgres", "PostgreSQL"),
    ("postgresql", "PostgreSQL"),
    ("amazon web services", "AWS"),
    ("aws", "AWS"),
    ("gcp", "Google Cloud"),
    ("google cloud platform", "Google Cloud"),
    ("google cloud", "Google Cloud"),
    ("ci/cd", "CI/CD"),
    ("cicd", "CI/CD"),
    ("ci cd", "CI/CD"),
    ("node", "Node.js"),
    ("nodejs", "Node.js"),
    ("node.js", "Node.js"),
    ("reactjs", "React"),
    ("react.js", "React"),
    ("react", "React"),
    ("sklearn", "scikit-learn"),
    ("scikit learn", "scikit-learn"),
    ("scikit-learn", "scikit-learn"),
    ("tf", "TensorFlow"),
    ("tensorflow", "TensorFlow"),
    ("pytorch", "PyTorch"),
    ("py", "Python"),
    ("python", "Python"),
    ("sql", "SQL"),
    ("docker", "Docker"),
    ("mongo", "MongoDB"),
    ("mongodb", "MongoDB"),
];

/// Trims and collapses whitespace, then maps known aliases to their canonical
/// spelling. Unknown names keep their original casing.
pub fn canonical_skill_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = collapsed.to_lowercase();
    SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(collapsed)
}

/// Canonicalizes and removes case-insensitive duplicates, keeping first occurrence order.
pub fn dedup_skill_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let canonical = canonical_skill_name(name.as_ref());
        if canonical.is_empty() {
            continue;
        }
        if seen.insert(canonical.to_lowercase()) {
            out.push(canonical);
        }
    }
    out
}
