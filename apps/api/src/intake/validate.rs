//! Upload gatekeeping — size and type checks for untrusted binary payloads.
//!
//! Output is always a `ResolvedFormat`, never the caller-declared MIME string,
//! so downstream stages cannot be steered by spoofed input.

use bytes::Bytes;
use thiserror::Error;

/// Maximum accepted upload size.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// An uploaded file as received from the multipart request.
/// Ephemeral: lives only for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Bytes,
    pub declared_mime: String,
    pub file_name: String,
}

/// The validator's normalized, trusted determination of a document's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedFormat {
    Pdf,
    Docx,
    PlainText,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("upload of {size} bytes exceeds the upload size limit")]
    TooLarge { size: usize },

    #[error("no supported format for declared type '{declared}' / file name '{file_name}'")]
    UnsupportedType { declared: String, file_name: String },
}

/// Accepted MIME types and the format each resolves to.
const ALLOWED_MIME_TYPES: &[(&str, ResolvedFormat)] = &[
    ("application/pdf", ResolvedFormat::Pdf),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ResolvedFormat::Docx,
    ),
    ("text/plain", ResolvedFormat::PlainText),
];

/// File-extension fallback table. Browsers routinely mis-declare MIME types
/// for office documents (e.g. `application/octet-stream` for a real .docx),
/// so an unrecognized declared type falls back to the extension.
const EXTENSION_FORMATS: &[(&str, ResolvedFormat)] = &[
    ("pdf", ResolvedFormat::Pdf),
    ("docx", ResolvedFormat::Docx),
    ("txt", ResolvedFormat::PlainText),
];

/// Validates an upload and resolves its effective format.
///
/// Rules, in order: size cap, declared-MIME lookup, extension fallback.
pub fn validate(document: &UploadedDocument) -> Result<ResolvedFormat, ValidationError> {
    if document.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size: document.bytes.len(),
        });
    }

    if let Some(format) = format_for_mime(&document.declared_mime) {
        return Ok(format);
    }

    format_for_extension(&document.file_name).ok_or_else(|| ValidationError::UnsupportedType {
        declared: document.declared_mime.clone(),
        file_name: document.file_name.clone(),
    })
}

fn format_for_mime(declared: &str) -> Option<ResolvedFormat> {
    // MIME parameters ("text/plain; charset=utf-8") don't affect the format.
    let essence = declared.split(';').next().unwrap_or("").trim();
    ALLOWED_MIME_TYPES
        .iter()
        .find(|(mime, _)| essence.eq_ignore_ascii_case(mime))
        .map(|&(_, format)| format)
}

fn format_for_extension(file_name: &str) -> Option<ResolvedFormat> {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext)?;
    EXTENSION_FORMATS
        .iter()
        .find(|(known, _)| extension.eq_ignore_ascii_case(known))
        .map(|&(_, format)| format)
}
