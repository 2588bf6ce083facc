use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identifier of a stored document, derived from name and upload time
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub fn derive(name: &str, upload_time: &NaiveDateTime) -> Self {
        Self(format!("{}_{}", name, upload_time.format("%Y%m%d_%H%M%S")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An uploaded document with its extracted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Original filename
    pub name: String,
    /// Extracted text content
    pub content: String,
    /// When the document entered the store
    pub upload_time: NaiveDateTime,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>, upload_time: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            upload_time,
        }
    }

    pub fn key(&self) -> DocumentKey {
        DocumentKey::derive(&self.name, &self.upload_time)
    }

    /// The first `n` lines of content
    pub fn head_lines(&self, n: usize) -> Vec<&str> {
        self.content.lines().take(n).collect()
    }

    /// Whether the filename marks this as an earnings-call document
    pub fn is_earnings_call(&self) -> bool {
        self.name.to_lowercase().contains("earnings")
    }
}

/// Session-local collection of documents in insertion order
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<(DocumentKey, Document)>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document.
    ///
    /// Returns `None` without replacing anything if a document with the same
    /// key is already present.
    pub fn insert(&mut self, document: Document) -> Option<DocumentKey> {
        let key = document.key();
        if self.contains(&key) {
            debug!("Document {} already stored, skipping", key);
            return None;
        }
        self.documents.push((key.clone(), document));
        Some(key)
    }

    pub fn get(&self, key: &DocumentKey) -> Option<&Document> {
        self.documents
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, d)| d)
    }

    pub fn contains(&self, key: &DocumentKey) -> bool {
        self.documents.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &DocumentKey) -> Option<Document> {
        let index = self.documents.iter().position(|(k, _)| k == key)?;
        Some(self.documents.remove(index).1)
    }

    /// Documents in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentKey, &Document)> {
        self.documents.iter().map(|(k, d)| (k, d))
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
