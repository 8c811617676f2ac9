//! Document Extractor — best-effort PDF text extraction.
//!
//! Extraction never fails the request: when the PDF cannot be read, the deck
//! is represented by a one-line stand-in naming the uploaded file.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Stand-in text used when a deck's text cannot be extracted.
pub fn fallback_text(file_name: &str) -> String {
    format!("Pitch deck file: {file_name}")
}

/// Returns true if the declared content type or the leading bytes indicate a PDF.
pub fn looks_like_pdf(content_type: Option<&str>, head: &[u8]) -> bool {
    let ct = content_type.unwrap_or("").to_ascii_lowercase();
    ct.contains("application/pdf") || head.starts_with(b"%PDF-")
}

/// Extracts the embedded text of a PDF, substituting `fallback_text` on any failure.
///
/// Blank output (e.g. a deck made only of images) counts as a failure.
pub fn extract_text(data: &[u8], file_name: &str) -> String {
    match pdf_extract::extract_text_from_mem(data) {
        Ok(text) if !text.trim().is_empty() => {
            debug!("Extracted {} chars from {file_name}", text.chars().count());
            text
        }
        Ok(_) => {
            warn!("PDF {file_name} contains no extractable text; using file name");
            fallback_text(file_name)
        }
        Err(e) => {
            warn!("PDF parsing failed for {file_name}: {e}; using file name");
            fallback_text(file_name)
        }
    }
}

/// Runs `extract_text` on the blocking pool.
///
/// A panic inside the PDF library is treated like any other parse failure.
pub async fn extract_text_blocking(data: Bytes, file_name: String) -> Result<String, AppError> {
    let name = file_name.clone();
    match tokio::task::spawn_blocking(move || extract_text(&data, &name)).await {
        Ok(text) => Ok(text),
        Err(e) if e.is_panic() => {
            warn!("PDF library panicked while parsing {file_name}; using file name");
            Ok(fallback_text(&file_name))
        }
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "PDF extraction task for {file_name} did not complete: {e}"
        ))),
    }
}
