use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime};

use crate::models::Document;

use super::{extract_text, extract_text_lossy, DocumentKind};

/// How extraction failures are treated when loading a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Failures are returned as errors
    #[default]
    Strict,
    /// Failures become the document's content as a readable message
    Inline,
}

/// Load a file from disk and extract its text.
///
/// The upload time is taken from the file's modification time, falling back
/// to the current time when the filesystem does not report one.
pub fn load_document_file(path: &Path, mode: ExtractionMode) -> Result<Document> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let upload_time = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Local>::from(t).naive_local())
        .unwrap_or_else(|_| Local::now().naive_local());

    document_from_bytes(&name, &bytes, upload_time, mode)
}

/// Build a document from uploaded bytes, picking the extractor from the filename
pub fn document_from_bytes(
    name: &str,
    bytes: &[u8],
    upload_time: NaiveDateTime,
    mode: ExtractionMode,
) -> Result<Document> {
    let kind = DocumentKind::from_filename(name);
    let content = match mode {
        ExtractionMode::Strict => extract_text(bytes, &kind)
            .with_context(|| format!("Failed to extract text from {}", name))?,
        ExtractionMode::Inline => extract_text_lossy(name, bytes, &kind),
    };

    Ok(Document::new(name, content, upload_time))
}
