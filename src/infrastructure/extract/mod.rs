// Document text extraction
pub mod docx;
pub mod pdf;

use crate::domain::error::TranslateError;
use crate::domain::model::DocumentKind;
use std::path::Path;
use tracing::{debug, info};

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    pub text: String,
}

/// Decide the document kind from its extension, letting magic bytes win when
/// the two disagree.
pub fn detect_kind(path: &Path, bytes: &[u8]) -> DocumentKind {
    if bytes.starts_with(PDF_MAGIC) {
        return DocumentKind::Pdf;
    }
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    if bytes.starts_with(ZIP_MAGIC) {
        return DocumentKind::Docx;
    }
    match ext.as_deref() {
        Some("pdf") => DocumentKind::Pdf,
        Some("docx") => DocumentKind::Docx,
        _ => DocumentKind::Text,
    }
}

/// Extract plain text from in-memory document bytes.
pub fn extract_bytes(kind: DocumentKind, bytes: &[u8]) -> Result<String, TranslateError> {
    match kind {
        DocumentKind::Pdf => pdf::extract_text(bytes),
        DocumentKind::Docx => docx::extract_text(bytes),
        DocumentKind::Text => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Read a file from disk and extract its text.
pub async fn extract_document(
    path: &Path,
    max_bytes: u64,
) -> Result<ExtractedDocument, TranslateError> {
    let size = tokio::fs::metadata(path).await?.len();
    if size > max_bytes {
        return Err(TranslateError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let bytes = tokio::fs::read(path).await?;
    let kind = detect_kind(path, &bytes);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    debug!(file = %file_name, kind = kind.label(), size, "extracting document");

    // Parsing is CPU-bound
    let text = tokio::task::spawn_blocking(move || extract_bytes(kind, &bytes))
        .await
        .map_err(|e| TranslateError::Io(std::io::Error::other(format!("Task join error: {}", e))))??;

    if text.trim().is_empty() {
        return Err(TranslateError::Extraction(format!(
            "{} contains no extractable text",
            file_name
        )));
    }

    info!(file = %file_name, chars = text.chars().count(), "document extracted");
    Ok(ExtractedDocument {
        file_name,
        kind,
        text,
    })
}
