//! Skill-gap evaluation.

pub mod evaluator;
pub mod handlers;
pub mod prompts;
pub mod rules;

pub use evaluator::{GapEngine, GapEvaluator, GapRequest, LlmGapEvaluator};
