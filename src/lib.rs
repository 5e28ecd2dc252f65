//! corpus-rag: retrieval-augmented question answering over a local document corpus
//!
//! Builds an in-memory retrieval pipeline from a directory of text and tabular
//! files: documents are chunked into overlapping windows, embedded locally, and
//! indexed for cosine search. Questions are answered by a local generative model
//! conditioned on the retrieved chunks, and every answer carries its sources.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod retrieval;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::Pipeline;
pub use types::{Answer, Chunk, Citation, Document};
