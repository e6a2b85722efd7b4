//! Resume parsing.

pub mod handlers;
pub mod loader;
pub mod parser;
pub mod prompts;

pub use parser::{DocumentModel, LlmResumeModel, ResumeParser};
