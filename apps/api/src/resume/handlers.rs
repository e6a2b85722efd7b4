use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::models::resume::ResumeProfile;
use crate::state::AppState;

/// An uploaded file plus the text fields sent alongside it.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Drains a multipart body. The part named `file` is kept as bytes; every
/// other part is read as text.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "file" {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
            form.file = Some(UploadedFile { file_name, bytes });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("could not read field '{name}': {e}")))?;
            form.fields.insert(name, value);
        }
    }
    Ok(form)
}

/// POST /api/v1/resume/parse
///
/// Multipart: `file` (pdf, docx or text) and optional `format`.
/// The parsed profile is returned but never cached.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeProfile>, AppError> {
    let form = read_upload_form(multipart).await?;
    let file = form
        .file
        .as_ref()
        .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;

    let profile = state
        .pipeline
        .resume
        .parse_document(&file.bytes, form.field("format"), file.file_name.as_deref())
        .await?;

    Ok(Json(profile))
}
