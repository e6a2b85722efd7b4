//! Report export as pretty JSON or as a three-block CSV sheet.

use csv::WriterBuilder;
use thiserror::Error;

use super::report::AnalysisReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub fn export(report: &AnalysisReport, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ExportFormat::Csv => export_csv(report),
    }
}

/// Gap analysis, learning path and resources, each under a `=== TITLE ===`
/// row and separated by a blank line. Blocks without data are omitted.
pub fn export_csv(report: &AnalysisReport) -> Result<String, ExportError> {
    let mut out = Vec::new();

    if let Some(gaps) = &report.gaps {
        write_block(
            &mut out,
            "=== GAP ANALYSIS ===",
            &["Skill", "Market Rank", "Priority", "Reasoning"],
            gaps.gap_analysis.iter().map(|g| {
                vec![
                    g.skill.clone(),
                    g.market_rank.to_string(),
                    format!("{:?}", g.priority),
                    g.reasoning.clone(),
                ]
            }),
        )?;
        write_block(
            &mut out,
            "=== RECOMMENDED LEARNING PATH ===",
            &["Order", "Skill"],
            gaps.recommended_learning_path
                .iter()
                .enumerate()
                .map(|(i, skill)| vec![(i + 1).to_string(), skill.clone()]),
        )?;
    }

    if !report.learning_plan.is_empty() {
        write_block(
            &mut out,
            "=== LEARNING RESOURCES ===",
            &["Skill", "Title", "Channel", "Duration (min)", "Views", "URL"],
            report.learning_plan.iter().flat_map(|rec| {
                rec.resources.iter().map(move |r| {
                    vec![
                        rec.skill.clone(),
                        r.title.clone(),
                        r.channel.clone(),
                        r.duration_minutes.to_string(),
                        r.views.to_string(),
                        r.url.clone(),
                    ]
                })
            }),
        )?;
    }

    Ok(String::from_utf8(out)?)
}

fn write_block<I>(
    out: &mut Vec<u8>,
    title: &str,
    header: &[&str],
    rows: I,
) -> Result<(), ExportError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    if !out.is_empty() {
        out.push(b'\n');
    }
    let mut writer = WriterBuilder::new().flexible(true).from_writer(&mut *out);
    writer.write_record([title])?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
