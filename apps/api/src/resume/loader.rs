//! Turns an uploaded document into plain text before it is sent to the model.

use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};

use crate::errors::StageError;
use crate::models::resume::DocumentFormat;

/// Resolves the format from the declared value first, then the file name.
pub fn resolve_format(
    declared: Option<&str>,
    file_name: Option<&str>,
) -> Result<DocumentFormat, StageError> {
    if let Some(raw) = declared.map(str::trim).filter(|s| !s.is_empty()) {
        return DocumentFormat::parse(raw)
            .ok_or_else(|| StageError::Unsupported(format!("unsupported document format '{raw}'")));
    }
    file_name
        .and_then(DocumentFormat::from_file_name)
        .ok_or_else(|| {
            StageError::Unsupported(
                "document format could not be determined (expected pdf, docx or text)".into(),
            )
        })
}

/// Extracts text on the blocking pool. Decoders can panic on malformed
/// input; a panic becomes a parse error for this document only.
pub async fn extract_text_blocking(
    bytes: Vec<u8>,
    format: DocumentFormat,
) -> Result<String, StageError> {
    run_extraction(move || extract_text(&bytes, format)).await
}

async fn run_extraction<F>(job: F) -> Result<String, StageError>
where
    F: FnOnce() -> Result<String, StageError> + Send + 'static,
{
    tokio::task::spawn_blocking(job).await.map_err(|e| {
        if e.is_panic() {
            StageError::Parse("document decoder failed on malformed input".into())
        } else {
            StageError::Parse(format!("document extraction was cancelled: {e}"))
        }
    })?
}

pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, StageError> {
    let text = match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| StageError::Parse(format!("could not read PDF: {e}")))?,
        DocumentFormat::Docx => docx_text(bytes)?,
        DocumentFormat::Text => String::from_utf8(bytes.to_vec())
            .map_err(|_| StageError::Parse("text document is not valid UTF-8".into()))?,
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(StageError::InsufficientData(
            "document contains no extractable text".into(),
        ));
    }
    Ok(text)
}

fn docx_text(bytes: &[u8]) -> Result<String, StageError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| StageError::Parse(format!("could not read DOCX: {e}")))?;

    let mut out = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_paragraph(&paragraph.children, &mut out),
            DocumentChild::Table(table) => push_table(table, &mut out),
            _ => {}
        }
    }
    Ok(out)
}

fn push_paragraph(children: &[ParagraphChild], out: &mut String) {
    push_runs(children, out);
    out.push('\n');
}

fn push_runs(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for item in &run.children {
                    match item {
                        RunChild::Text(text) => out.push_str(&text.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_runs(&link.children, out),
            _ => {}
        }
    }
}

// Resume templates often lay sections out in tables.
fn push_table(table: &docx_rs::Table, out: &mut String) {
    for row in &table.rows {
        #[allow(irrefutable_let_patterns)]
        let TableChild::TableRow(row) = row else { continue };
        for cell in &row.cells {
            #[allow(irrefutable_let_patterns)]
            let TableRowChild::TableCell(cell) = cell else { continue };
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => {
                        push_paragraph(&paragraph.children, out)
                    }
                    TableCellContent::Table(inner) => push_table(inner, out),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read, Write};
    use std::path::Path;

    use docx_rs::{Docx, Paragraph, Run};

    fn docx_bytes(docx: Docx) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();
        buffer.into_inner()
    }

    /// Repacks a document, substituting raw XML into `word/document.xml`.
    fn with_document_xml(packed: &[u8], from: &str, to: &str) -> Vec<u8> {
        let mut archive = zip::ZipArchive::new(Cursor::new(packed)).unwrap();
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).unwrap();
            let name = entry.name().to_string();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            if name == "word/document.xml" {
                content = String::from_utf8(content).unwrap().replace(from, to).into_bytes();
            }
            writer
                .start_file(name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(&content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_resolve_format_prefers_declared_value() {
        assert_eq!(
            resolve_format(Some("text"), Some("cv.pdf")).unwrap(),
            DocumentFormat::Text
        );
        assert_eq!(resolve_format(None, Some("cv.docx")).unwrap(), DocumentFormat::Docx);
        assert!(matches!(
            resolve_format(Some("odt"), None),
            Err(StageError::Unsupported(_))
        ));
        assert!(matches!(resolve_format(None, None), Err(StageError::Unsupported(_))));
    }

    #[test]
    fn test_extract_text_from_docx_keeps_paragraphs_and_tabs() {
        let bytes = docx_bytes(
            Docx::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
                .add_paragraph(
                    Paragraph::new().add_run(
                        Run::new()
                            .add_text("Rust engineer")
                            .add_tab()
                            .add_text("2021"),
                    ),
                ),
        );
        assert_eq!(
            extract_text(&bytes, DocumentFormat::Docx).unwrap(),
            "Jane Doe\nRust engineer\t2021"
        );
    }

    #[test]
    fn test_docx_character_references_are_decoded() {
        let packed = docx_bytes(
            Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("CANDIDATENAME"))),
        );
        let bytes = with_document_xml(&packed, "CANDIDATENAME", "O&#8217;Brien &#x2013; Caf&#233;");
        assert_eq!(
            extract_text(&bytes, DocumentFormat::Docx).unwrap(),
            "O\u{2019}Brien \u{2013} Caf\u{e9}"
        );
    }

    #[test]
    fn test_extract_text_rejects_non_zip_docx() {
        assert!(matches!(
            extract_text(b"plain bytes", DocumentFormat::Docx),
            Err(StageError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_document_is_insufficient_data() {
        assert!(matches!(
            extract_text(b"   \n ", DocumentFormat::Text),
            Err(StageError::InsufficientData(_))
        ));
    }

    #[tokio::test]
    async fn test_decoder_panic_becomes_parse_error() {
        let result = run_extraction(|| panic!("bad font table")).await;
        assert!(matches!(result, Err(StageError::Parse(_))));
    }

    #[tokio::test]
    async fn test_extract_text_blocking_reads_text() {
        let text = extract_text_blocking(b"Jane Doe\nGo".to_vec(), DocumentFormat::Text)
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nGo");
    }

    /// Reads a file from disk the way an upload is handled: format from the name.
    fn load_file(path: &Path) -> Result<String, StageError> {
        let format = resolve_format(None, path.file_name().and_then(|n| n.to_str()))?;
        extract_text(&std::fs::read(path).unwrap(), format)
    }

    #[test]
    fn test_load_file_reads_text_resume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe\nSkills: Python, Docker").unwrap();

        let text = load_file(&path).unwrap();
        assert!(text.contains("Python, Docker"));
    }

    #[test]
    fn test_load_file_rejects_invalid_utf8() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(
            load_file(file.path()),
            Err(StageError::Parse(_))
        ));
    }
}
