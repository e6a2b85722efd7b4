//! Short-term market skills.

pub mod extractor;
pub mod handlers;
pub mod keywords;
pub mod normalize;
pub mod prompts;

pub use extractor::{LlmSkillAnalyzer, SkillAnalyzer, SkillsExtractor};
