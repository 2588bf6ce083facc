//! Text extraction from uploaded document bytes.

use std::io::{Read, Write};
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

static XML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static XML_TAB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<w:tab\s*/>").expect("valid tab pattern"));
static XML_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:(?:br|cr)(?:\s[^>]*)?/>").expect("valid break pattern"));
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:x([0-9a-fA-F]+)|([0-9]+));").expect("valid entity pattern"));
static XML_PARAGRAPH_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</w:p>|<w:p/>|<w:p\s[^>]*/>").expect("valid paragraph pattern"));

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Text is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Invalid DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// File format, as hinted by the filename extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
    Other(String),
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            "txt" => DocumentKind::Txt,
            other => DocumentKind::Other(other.to_string()),
        }
    }

    /// Kind from the text after the last '.' in a filename
    pub fn from_filename(name: &str) -> Self {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
            DocumentKind::Other(ext) => ext,
        }
    }
}

/// Extract plain text from document bytes
pub fn extract_text(bytes: &[u8], kind: &DocumentKind) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Txt => Ok(String::from_utf8(bytes.to_vec())?),
        DocumentKind::Docx => extract_docx(bytes),
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Other(ext) => Err(ExtractionError::UnsupportedFileType(ext.clone())),
    }
}

/// Extract text, folding any failure into a readable message.
///
/// The returned string stands in for the document content, so a failed file
/// still shows up in the store with an explanation instead of aborting a batch.
pub fn extract_text_lossy(name: &str, bytes: &[u8], kind: &DocumentKind) -> String {
    match extract_text(bytes, kind) {
        Ok(text) => text,
        Err(ExtractionError::UnsupportedFileType(ext)) => format!(
            "File uploaded: {} (Content extraction not supported for {} files)",
            name, ext
        ),
        Err(e) => format!(
            "Error extracting {} text: {}",
            kind.extension().to_uppercase(),
            e
        ),
    }
}

/// Read `word/document.xml` and emit one line per paragraph
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let mut text = String::new();
    for paragraph in XML_PARAGRAPH_END.split(&xml) {
        let paragraph = XML_TAB.replace_all(paragraph, "\t");
        let paragraph = XML_BREAK.replace_all(&paragraph, "\n");
        let stripped = XML_TAG.replace_all(&paragraph, "");
        text.push_str(&decode_entities(&stripped));
        text.push('\n');
    }

    // The split leaves a trailing fragment after the last paragraph (body
    // close tags), which strips to nothing
    while text.ends_with("\n\n") {
        text.pop();
    }

    Ok(text)
}

/// Decode the predefined XML entities and numeric character references.
/// `&amp;` goes last so an escaped reference stays literal.
fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Run pdftotext over the bytes via a temporary file
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;

    pdftotext(file.path())
}

fn pdftotext(path: &Path) -> Result<String, ExtractionError> {
    debug!("Running pdftotext on {:?}", path);
    let result = Command::new("pdftotext")
        .arg("-layout")
        .arg(path)
        .arg("-")
        .output();

    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => Err(ExtractionError::ExtractionFailed(format!(
            "pdftotext failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound("pdftotext".to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}
