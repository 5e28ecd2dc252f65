//! Answer and citation types returned by `ask`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::document::Chunk;

/// A retrieved chunk attached to an answer as provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Chunk ID
    pub chunk_id: Uuid,
    /// Document ID
    pub document_id: Uuid,
    /// Exact chunk text handed to the generator
    pub content: String,
    /// Metadata of the source document
    pub metadata: BTreeMap<String, String>,
    /// Character offset of the chunk in its source document
    pub offset: usize,
    /// Similarity score (higher is better)
    pub similarity: f32,
}

impl Citation {
    /// Create a citation from a chunk and its similarity score
    pub fn from_chunk(chunk: &Chunk, similarity: f32) -> Self {
        Self {
            chunk_id: chunk.id,
            document_id: chunk.document_id,
            content: chunk.content.clone(),
            metadata: chunk.metadata.clone(),
            offset: chunk.offset,
            similarity,
        }
    }
}

/// Generated answer together with the chunks it was conditioned on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Generated answer text
    pub text: String,
    /// Retrieved chunks in retrieval order
    pub sources: Vec<Citation>,
    /// Mean source similarity (0.0 when nothing was retrieved)
    pub confidence: f32,
    /// Wall-clock time spent answering, in milliseconds
    pub processing_time_ms: u64,
}

impl Answer {
    /// Create a new answer
    pub fn new(text: String, sources: Vec<Citation>, processing_time_ms: u64) -> Self {
        let confidence = if sources.is_empty() {
            0.0
        } else {
            sources.iter().map(|s| s.similarity).sum::<f32>() / sources.len() as f32
        };

        Self {
            text,
            sources,
            confidence,
            processing_time_ms,
        }
    }
}
