use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::import::{ExtractedText, ImportError, ImportOutcome, RawDocument};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        tracing::error!("Failed to read multipart field: {e}");
        AppError::Validation(format!("Failed to read upload: {}", e.body_text()))
    }
}

/// Pulls the `file` part out of the upload. Other parts are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<RawDocument, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        tracing::debug!(?file_name, ?content_type, bytes = data.len(), "upload read");
        return Ok(RawDocument::new(
            data,
            content_type.as_deref(),
            file_name.as_deref(),
        ));
    }

    tracing::warn!("No file field found in multipart upload");
    Err(AppError::Validation(
        "No file provided. Use field name 'file'".to_string(),
    ))
}

/// POST /api/parse-resume
/// Extracts plain text only; the caller parses it.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractedText>, AppError> {
    let doc = read_upload(multipart).await?;
    Ok(Json(state.importer.extract_text(doc).await?))
}

/// POST /api/import-resume
pub async fn handle_import_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ImportOutcome>, AppError> {
    let doc = read_upload(multipart).await?;
    Ok(Json(state.importer.import(doc).await?))
}

/// POST /api/parse-text
/// For callers that already hold plain text.
pub async fn handle_parse_text(
    State(state): State<AppState>,
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<ImportOutcome>, AppError> {
    if req.text.trim().is_empty() {
        return Err(ImportError::EmptyContent.into());
    }
    Ok(Json(state.importer.parse_text(&req.text)))
}
