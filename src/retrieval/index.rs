//! In-memory vector index with exact cosine search

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::types::Chunk;

/// A vector paired with the chunk it was computed from; owned by the index
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Embedding vector
    pub vector: Vec<f32>,
    /// The chunk the vector was computed from
    pub chunk: Chunk,
}

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (higher is better)
    pub similarity: f32,
}

/// Read-only nearest-neighbor index, built once per corpus version.
///
/// Exact search: every query scores all entries. There is no incremental insert
/// or delete; rebuild-from-scratch is the only mutation path.
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
}

impl VectorIndex {
    /// Bulk-build the index.
    ///
    /// An empty entry set is a configuration error: retrieval against no corpus
    /// is indistinguishable from a misconfiguration, so the caller is told
    /// explicitly instead of getting a usable-but-empty index.
    pub fn build(entries: Vec<(Vec<f32>, Chunk)>) -> Result<Self> {
        let Some((first, _)) = entries.first() else {
            return Err(Error::config("no documents to index"));
        };
        let dimensions = first.len();

        let entries = entries
            .into_iter()
            .map(|(vector, chunk)| {
                if vector.len() != dimensions {
                    return Err(Error::index(format!(
                        "embedding dimension mismatch: expected {}, got {}",
                        dimensions,
                        vector.len()
                    )));
                }
                Ok(IndexEntry { vector, chunk })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            entries,
            dimensions,
        })
    }

    /// Top-k entries by descending similarity; ties keep insertion order.
    ///
    /// Returns fewer than k results when the index holds fewer entries, and an
    /// empty result for an empty index.
    pub fn query(&self, vector: &[f32], k: usize) -> Vec<SearchResult> {
        debug_assert_eq!(vector.len(), self.dimensions);

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                similarity: cosine_similarity(vector, &entry.vector),
            })
            .collect();

        // Stable sort, so equal scores stay in insertion order.
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        results.truncate(k);
        results
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality of the indexed vectors
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
