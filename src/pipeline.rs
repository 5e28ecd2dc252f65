//! Pipeline orchestration: build once, ask many times

use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::embeddings::{self, TextEmbedder};
use crate::error::{Error, Result};
use crate::generation::{AnswerSynthesizer, FlanT5Generator, TextGenerator};
use crate::ingestion::{DocumentLoader, TextChunker};
use crate::retrieval::{Retriever, VectorIndex};
use crate::types::{Answer, Citation};

/// The built retrieval-and-answering pipeline.
///
/// Expensive to construct (corpus embedding plus model loading), cheap to
/// reuse; shared read-only across queries. A content change requires a full
/// rebuild — there is no in-place mutation.
pub struct Pipeline {
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Build the pipeline from the configured corpus directory.
    ///
    /// Fails with a configuration error when the chunk settings are invalid,
    /// the loader finds no documents, or model files are missing.
    pub fn build(config: &RagConfig) -> Result<Self> {
        let embedder = embeddings::from_config(&config.embeddings)?;
        let generator = Box::new(FlanT5Generator::new(&config.generation)?);
        Self::build_with(config, embedder, generator)
    }

    /// Build with explicit providers.
    ///
    /// Used by `build` and by tests that substitute deterministic stand-ins for
    /// the model-backed embedder and generator.
    pub fn build_with(
        config: &RagConfig,
        embedder: Arc<dyn TextEmbedder>,
        generator: Box<dyn TextGenerator>,
    ) -> Result<Self> {
        config.validate()?;
        let started = Instant::now();

        let documents = DocumentLoader::load(&config.corpus.source_dir);
        if documents.is_empty() {
            return Err(Error::config(format!(
                "no documents found: ensure the '{}' directory exists and contains files",
                config.corpus.source_dir.display()
            )));
        }
        tracing::info!(
            "loaded {} document(s) from '{}'",
            documents.len(),
            config.corpus.source_dir.display()
        );

        let chunker = TextChunker::new(&config.chunking)?;
        let chunks = chunker.split(&documents);
        tracing::info!("split into {} chunk(s)", chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = embedder.embed_batch(&texts)?;
        let entries: Vec<_> = vectors.into_iter().zip(chunks).collect();
        let index = VectorIndex::build(entries)?;
        tracing::info!(
            "indexed {} vector(s) with '{}' embeddings",
            index.len(),
            embedder.name()
        );

        let retriever = Retriever::new(embedder, index, config.retrieval.top_k);
        let synthesizer = AnswerSynthesizer::new(generator);

        tracing::info!("pipeline built in {} ms", started.elapsed().as_millis());

        Ok(Self {
            retriever,
            synthesizer,
        })
    }

    /// Answer a question: retrieve the most similar chunks, generate an answer
    /// conditioned on them, and return both.
    ///
    /// A failure here is scoped to this call; the pipeline stays usable for the
    /// next question.
    pub fn ask(&self, question: &str) -> Result<Answer> {
        let started = Instant::now();

        let results = self.retriever.retrieve(question)?;
        tracing::debug!("retrieved {} chunk(s)", results.len());

        let text = self.synthesizer.answer(question, &results)?;

        let sources = results
            .iter()
            .map(|r| Citation::from_chunk(&r.chunk, r.similarity))
            .collect();

        Ok(Answer::new(
            text,
            sources,
            started.elapsed().as_millis() as u64,
        ))
    }

    /// Number of chunks in the index
    pub fn indexed_chunks(&self) -> usize {
        self.retriever.index().len()
    }
}

static SHARED: OnceCell<Pipeline> = OnceCell::new();

/// Process-wide pipeline, built on first use and reused by every later call.
///
/// A failed build is not cached, so the next call retries. Rebuilding for a
/// changed corpus requires a process restart; the instance is never replaced
/// while queries may be reading it.
pub fn shared(config: &RagConfig) -> Result<&'static Pipeline> {
    SHARED.get_or_try_init(|| Pipeline::build(config))
}
