//! Text embedding providers

mod hash;
mod onnx;

pub use hash::HashEmbedder;
pub use onnx::OnnxEmbedder;

use std::sync::Arc;

use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::error::Result;

/// Maps text to fixed-dimension vectors for similarity comparison.
///
/// The same text and model always produce the same vector. The pipeline shares
/// one instance between index build and query time, so stored and query vectors
/// always come from the same model.
pub trait TextEmbedder: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts, preserving input order.
    ///
    /// Default implementation calls `embed` sequentially; implementations with a
    /// cheaper batched path should override.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text)?);
        }
        Ok(embeddings)
    }

    /// Embedding dimensionality (e.g. 384 for all-MiniLM-L6-v2).
    fn dimensions(&self) -> usize;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Build the embedder selected by the configuration.
pub fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn TextEmbedder>> {
    match config.provider {
        EmbeddingProviderKind::Onnx => Ok(Arc::new(OnnxEmbedder::new(config)?)),
        EmbeddingProviderKind::Hash => Ok(Arc::new(HashEmbedder::new(config.dimensions))),
    }
}
