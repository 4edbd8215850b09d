use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::intake::archive::archive_upload;
use crate::intake::extract::{
    extract_with_timeout, ExtractionFailureKind, ExtractionResult, EXTRACTION_TIMEOUT,
};
use crate::intake::validate::{validate, UploadedDocument, ValidationError};
use crate::profile::models::CandidateProfile;
use crate::profile::parser;
use crate::ratelimit::{RateLimitKey, DEFAULT_WINDOW};
use crate::state::AppState;

pub const PARSE_DOCUMENT_ACTION: &str = "parse-document";
pub const PARSE_DOCUMENT_LIMIT: u32 = 10;

/// Extracted text sent back for caller review is capped; the parser saw the
/// full text.
pub const PREVIEW_MAX_CHARS: usize = 10_000;

#[derive(Debug, Serialize)]
pub struct ParseDocumentResponse {
    pub extracted_text_preview: String,
    pub parsed_profile: CandidateProfile,
}

/// POST /api/v1/profiles/parse-document
///
/// Stages run strictly in order: validate → rate-limit → extract → parse.
/// The parse stage cannot fail; everything before it maps to a typed error.
pub async fn handle_parse_document(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    multipart: Multipart,
) -> Result<Json<ParseDocumentResponse>, AppError> {
    let document = read_file_field(multipart).await?;

    let format = validate(&document).map_err(|e| match e {
        ValidationError::TooLarge { size } => AppError::FileTooLarge { size },
        ValidationError::UnsupportedType { declared, .. } => AppError::UnsupportedType(declared),
    })?;

    let key = RateLimitKey::new(PARSE_DOCUMENT_ACTION, addr.ip().to_string());
    let decision = state
        .limiter
        .admit(&key, PARSE_DOCUMENT_LIMIT, DEFAULT_WINDOW)
        .await;
    if !decision.allowed {
        return Err(AppError::RateLimited);
    }

    let text = match extract_with_timeout(document.bytes.clone(), format, EXTRACTION_TIMEOUT).await
    {
        ExtractionResult::Success { text } => text,
        ExtractionResult::Failure {
            reason: ExtractionFailureKind::MalformedDocument,
        } => return Err(AppError::MalformedDocument),
        ExtractionResult::Failure {
            reason: ExtractionFailureKind::NoExtractableText,
        } => return Err(AppError::NoExtractableText),
    };

    // A valid but textless document (image-only scan) is the most common
    // user-facing failure; it gets its own status and guidance.
    if text.trim().is_empty() {
        return Err(AppError::NoExtractableText);
    }

    if let (Some(s3), Some(bucket)) = (&state.s3, &state.config.s3_bucket) {
        archive_upload(s3.clone(), bucket.clone(), document.bytes.clone(), format);
    }

    let parsed_profile = parser::parse(&text);
    info!(
        ?format,
        bytes = document.bytes.len(),
        chars = text.len(),
        "parsed uploaded document"
    );

    Ok(Json(ParseDocumentResponse {
        extracted_text_preview: truncate_chars(&text, PREVIEW_MAX_CHARS),
        parsed_profile,
    }))
}

/// Pulls the `file` field out of the multipart body.
async fn read_file_field(mut multipart: Multipart) -> Result<UploadedDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Invalid multipart body".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let declared_mime = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::Validation("Could not read uploaded file".to_string()))?;

        return Ok(UploadedDocument {
            bytes,
            declared_mime,
            file_name,
        });
    }

    Err(AppError::Validation(
        "Missing required file field 'file'".to_string(),
    ))
}

/// Character-count truncation that never splits a code point.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
