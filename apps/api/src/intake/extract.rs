//! Format-polymorphic raw-text extraction from untrusted binary documents.
//!
//! One strategy per `ResolvedFormat`. Every internal decoding or structural
//! error of a format reader is caught here and converted to a typed
//! `Failure` — a corrupt upload must never crash the request handler, and no
//! third-party parser error ever reaches the response surface.
//!
//! Extraction runs on the blocking pool under a wall-clock timeout: unbounded
//! parsing of crafted binary input is a denial-of-service vector, and
//! `pdf-extract` is known to panic on some malformed files. A timeout, a
//! panic, and a parse error all degrade to the same `MalformedDocument`.

use std::io::Read;
use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use quick_xml::events::Event;
use tracing::warn;

use super::validate::ResolvedFormat;

/// Wall-clock bound for a single extraction call.
pub const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFailureKind {
    /// Corrupt or unreadable binary — the caller should fix or re-export the file.
    MalformedDocument,
    /// Structurally valid but textless (e.g. an image-only scan) — the caller
    /// should try a different file format or source. Produced by the pipeline
    /// when a successful extraction yields no text, never by the dispatcher.
    NoExtractableText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// `text` may be empty only if the source document was provably empty of
    /// text (an image-only PDF is the common case).
    Success { text: String },
    Failure { reason: ExtractionFailureKind },
}

/// Extracts raw text from `bytes` according to the trusted resolved format.
/// Total: returns `Success` or a typed `Failure`, never an error.
pub fn extract(bytes: &[u8], format: ResolvedFormat) -> ExtractionResult {
    let outcome = match format {
        ResolvedFormat::Pdf => extract_pdf(bytes),
        ResolvedFormat::Docx => extract_docx(bytes),
        ResolvedFormat::PlainText => extract_plain_text(bytes),
    };

    match outcome {
        Ok(text) => ExtractionResult::Success { text },
        Err(e) => {
            warn!(?format, "extraction failed: {e:#}");
            ExtractionResult::Failure {
                reason: ExtractionFailureKind::MalformedDocument,
            }
        }
    }
}

/// Runs `extract` on the blocking pool with a wall-clock timeout.
/// Timeouts and extractor panics both come back as `MalformedDocument`.
pub async fn extract_with_timeout(
    bytes: Bytes,
    format: ResolvedFormat,
    limit: Duration,
) -> ExtractionResult {
    let task = tokio::task::spawn_blocking(move || extract(&bytes, format));

    match tokio::time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => {
            warn!(?format, "extraction task panicked: {join_error}");
            ExtractionResult::Failure {
                reason: ExtractionFailureKind::MalformedDocument,
            }
        }
        Err(_elapsed) => {
            warn!(?format, timeout_s = limit.as_secs(), "extraction timed out");
            ExtractionResult::Failure {
                reason: ExtractionFailureKind::MalformedDocument,
            }
        }
    }
}

/// PDF text-layer read, pages concatenated in document order.
/// An image-only scan legitimately produces an empty string.
fn extract_pdf(bytes: &[u8]) -> anyhow::Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow::anyhow!("PDF text layer extraction: {e}"))
}

/// Unpacks `word/document.xml` and flattens the `<w:t>` runs to plain text,
/// discarding all formatting. Paragraph ends and explicit breaks become
/// newlines so the section segmenter downstream sees line structure.
fn extract_docx(bytes: &[u8]) -> anyhow::Result<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).context("DOCX container")?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX body stream")?
        .read_to_string(&mut xml)
        .context("DOCX body encoding")?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().context("DOCX body XML")? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::Text(t) if in_text_run => text.push_str(&t.unescape().context("DOCX text run")?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"br" => text.push('\n'),
                b"tab" => text.push(' '),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Direct UTF-8 decode. Invalid byte sequences are a malformed upload, not a
/// truncation opportunity.
fn extract_plain_text(bytes: &[u8]) -> anyhow::Result<String> {
    let text = std::str::from_utf8(bytes).context("plain text UTF-8 decoding")?;
    Ok(text.to_string())
}
