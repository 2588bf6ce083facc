use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::io::{load_document_file, ExtractionMode};
use crate::models::DocumentStore;

/// A file that could not be loaded
#[derive(Debug)]
pub struct IngestFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

/// Result of loading a batch of files
#[derive(Debug, Default)]
pub struct IngestResult {
    pub store: DocumentStore,
    pub failures: Vec<IngestFailure>,
    /// Files skipped because a document with the same key was already stored
    pub duplicates: usize,
}

/// Load files into a fresh document store.
///
/// Each file is handled on its own: a file that fails to load is recorded
/// and logged, and the rest of the batch still loads.
pub fn ingest_files(paths: &[impl AsRef<Path>], mode: ExtractionMode) -> IngestResult {
    let mut result = IngestResult::default();

    for path in paths {
        let path = path.as_ref();
        match load_document_file(path, mode) {
            Ok(document) => {
                if result.store.insert(document).is_none() {
                    result.duplicates += 1;
                }
            }
            Err(e) => {
                warn!("Skipping {:?}: {:#}", path, e);
                result.failures.push(IngestFailure {
                    path: path.to_path_buf(),
                    error: e,
                });
            }
        }
    }

    info!(
        "Loaded {} documents ({} failed, {} duplicates)",
        result.store.len(),
        result.failures.len(),
        result.duplicates
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_do_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.txt");
        let bad = dir.path().join("b.bin");
        let also_good = dir.path().join("c.txt");
        std::fs::write(&good, "first").unwrap();
        std::fs::write(&bad, [0u8, 1, 2]).unwrap();
        std::fs::write(&also_good, "third").unwrap();

        let result = ingest_files(&[&good, &bad, &also_good], ExtractionMode::Strict);

        assert_eq!(result.store.len(), 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].path, bad);
        let names: Vec<&str> = result.store.documents().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "c.txt"]);
    }

    #[test]
    fn test_inline_mode_keeps_failed_files() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("b.bin");
        std::fs::write(&bad, [0u8]).unwrap();

        let result = ingest_files(&[&bad], ExtractionMode::Inline);

        assert!(result.failures.is_empty());
        let document = result.store.documents().next().unwrap();
        assert!(document.content.contains("Content extraction not supported for bin files"));
    }

    #[test]
    fn test_same_file_twice_is_a_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "first").unwrap();

        let result = ingest_files(&[&path, &path], ExtractionMode::Strict);

        assert_eq!(result.store.len(), 1);
        assert_eq!(result.duplicates, 1);
    }
}
