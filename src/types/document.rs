//! Document and chunk types

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;

/// File formats the loader knows how to parse
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Comma-separated tabular file; one Document per row
    Csv,
    /// Plain UTF-8 text; one Document per file
    Txt,
    /// Anything else; skipped by the loader
    Unsupported,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "csv" => Self::Csv,
            "txt" | "text" => Self::Txt,
            _ => Self::Unsupported,
        }
    }
}

/// A normalized text record produced by the loader; immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Full text content
    pub content: String,
    /// Provenance fields; always present, possibly empty
    pub metadata: BTreeMap<String, String>,
    /// Content hash for change detection across rebuilds
    pub content_hash: String,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document
    pub fn new(content: String, metadata: BTreeMap<String, String>) -> Self {
        let content_hash = hash_content(&content);
        Self {
            id: Uuid::new_v4(),
            content,
            metadata,
            content_hash,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// A bounded window of document text; the unit of indexing and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Window text
    pub content: String,
    /// Character offset of the window start in the source document
    pub offset: usize,
    /// Position of this chunk within its document
    pub chunk_index: u32,
    /// Metadata inherited from the source document
    pub metadata: BTreeMap<String, String>,
}

impl Chunk {
    /// Create a chunk from a window of `document`'s content
    pub fn new(document: &Document, content: String, offset: usize, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document.id,
            content,
            offset,
            chunk_index,
            metadata: document.metadata.clone(),
        }
    }
}

/// Hash content for change detection
pub(crate) fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
