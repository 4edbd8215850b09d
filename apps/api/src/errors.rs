use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Intake failures carry a machine-distinguishable `code` because their
/// remedies differ: an oversized or unsupported file needs a different file,
/// a malformed one needs a re-export, a textless one needs a different
/// format/source, and a rate-limited caller just needs to wait.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("File too large: {size} bytes")]
    FileTooLarge { size: usize },

    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),

    #[error("Document could not be read")]
    MalformedDocument,

    #[error("No extractable text in document")]
    NoExtractableText,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::FileTooLarge { size } => {
                tracing::debug!(size, "rejected oversized upload");
                (
                    StatusCode::BAD_REQUEST,
                    "FILE_TOO_LARGE",
                    "The file is too large. The maximum upload size is 5 MB.".to_string(),
                )
            }
            AppError::UnsupportedType(declared) => {
                tracing::debug!(declared, "rejected unsupported upload type");
                (
                    StatusCode::BAD_REQUEST,
                    "UNSUPPORTED_TYPE",
                    "This file type is not supported. Please upload a PDF, Word document (.docx), or plain text file.".to_string(),
                )
            }
            AppError::MalformedDocument => (
                StatusCode::BAD_REQUEST,
                "MALFORMED_DOCUMENT",
                "We couldn't read that file. Please try re-saving it or uploading a different copy.".to_string(),
            ),
            AppError::NoExtractableText => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_EXTRACTABLE_TEXT",
                "We couldn't find any text in that file. If it's a scanned image, please try a different file format or source.".to_string(),
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many requests. Please wait a minute and try again.".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_maps_to_400() {
        let resp = AppError::FileTooLarge { size: 6 * 1024 * 1024 }.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_no_extractable_text_maps_to_422() {
        let resp = AppError::NoExtractableText.into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let resp = AppError::RateLimited.into_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let resp = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
