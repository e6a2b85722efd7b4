//! End-to-end analysis: stage sequencing, the aggregated report and its export.

pub mod export;
pub mod handlers;
pub mod orchestrator;
pub mod report;

pub use orchestrator::{AnalysisRequest, Pipeline, ResumeUpload};
pub use report::AnalysisReport;
