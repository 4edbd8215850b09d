//! Best-effort archival of the raw upload to S3/MinIO.
//!
//! Archival is a side effect of successful intake, never part of the request
//! contract: it runs on a detached task and failures are only logged. The
//! stored object is keyed by a fresh UUID, not by anything caller-derived.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

use super::validate::ResolvedFormat;

fn object_extension(format: ResolvedFormat) -> &'static str {
    match format {
        ResolvedFormat::Pdf => "pdf",
        ResolvedFormat::Docx => "docx",
        ResolvedFormat::PlainText => "txt",
    }
}

fn content_type(format: ResolvedFormat) -> &'static str {
    match format {
        ResolvedFormat::Pdf => "application/pdf",
        ResolvedFormat::Docx => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        ResolvedFormat::PlainText => "text/plain",
    }
}

/// Spawns a detached upload of the original document bytes.
pub fn archive_upload(client: S3Client, bucket: String, bytes: Bytes, format: ResolvedFormat) {
    let key = format!("uploads/{}.{}", Uuid::new_v4(), object_extension(format));

    tokio::spawn(async move {
        let result = client
            .put_object()
            .bucket(&bucket)
            .key(&key)
            .content_type(content_type(format))
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await;

        match result {
            Ok(_) => debug!(%key, "archived upload"),
            Err(e) => warn!(%key, "upload archival failed (ignored): {e}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_extension_matches_format() {
        assert_eq!(object_extension(ResolvedFormat::Pdf), "pdf");
        assert_eq!(object_extension(ResolvedFormat::Docx), "docx");
        assert_eq!(object_extension(ResolvedFormat::PlainText), "txt");
    }

    #[test]
    fn test_content_type_roundtrip_with_allowed_set() {
        assert_eq!(content_type(ResolvedFormat::Pdf), "application/pdf");
        assert_eq!(content_type(ResolvedFormat::PlainText), "text/plain");
    }
}
