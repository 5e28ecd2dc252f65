//! Query-time retrieval over the vector index

use std::sync::Arc;

use crate::embeddings::TextEmbedder;
use crate::error::Result;

use super::index::{SearchResult, VectorIndex};

/// Retrieves the chunks most similar to a question.
///
/// Holds the same embedder instance the index was built with, so stored and
/// query vectors always come from one model.
pub struct Retriever {
    embedder: Arc<dyn TextEmbedder>,
    index: VectorIndex,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever over a built index
    pub fn new(embedder: Arc<dyn TextEmbedder>, index: VectorIndex, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    /// Embed the question and return up to `top_k` chunks, best first.
    ///
    /// A `top_k` larger than the index is clamped to the available count.
    pub fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(question)?;
        Ok(self.index.query(&query_embedding, self.top_k))
    }

    /// The underlying index
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}
