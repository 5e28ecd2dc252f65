//! Configuration for the question-answering pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Corpus location
    pub corpus: CorpusConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Generation configuration
    pub generation: GenerationConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
}

impl RagConfig {
    /// Validate settings that must hold before a pipeline can be built.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.retrieval.top_k == 0 {
            return Err(Error::config("retrieval.top_k must be at least 1"));
        }
        Ok(())
    }
}

/// Corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory scanned for source documents
    pub source_dir: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("docs"),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive windows in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 50,
        }
    }
}

impl ChunkingConfig {
    /// The overlap must leave room for the window to advance.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::config("chunking.chunk_size must be at least 1"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Distance between the starts of consecutive windows.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

/// Embedding provider selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Local ONNX sentence-transformer model
    #[default]
    Onnx,
    /// Deterministic token-hashing vectors; no model files required
    Hash,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider backing the embedder
    pub provider: EmbeddingProviderKind,
    /// Model identifier (default: all-MiniLM-L6-v2)
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
    /// Batch size for embedding generation
    pub batch_size: usize,
    /// Maximum sequence length in tokens
    pub max_length: usize,
    /// Directory holding the ONNX export (model.onnx, tokenizer.json)
    pub cache_dir: PathBuf,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            batch_size: 32,
            max_length: 256,
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("corpus-rag")
                .join("models"),
        }
    }
}

/// Answer generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Generation model identifier (default: flan-t5-small)
    pub model: String,
    /// Directory holding the model export (config.json, tokenizer.json,
    /// model.safetensors)
    pub model_dir: PathBuf,
    /// Hard cap on generated tokens per answer
    pub max_new_tokens: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "flan-t5-small".to_string(),
            model_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("corpus-rag")
                .join("flan-t5-small"),
            max_new_tokens: 128,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}
