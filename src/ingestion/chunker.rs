//! Fixed-window text chunking with overlap

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::{Chunk, Document};

/// Splits documents into sliding character windows of fixed size.
///
/// Each window after the first begins `chunk_size - overlap` characters after
/// the start of the previous one. A document shorter than the window yields a
/// single chunk holding its whole content; an empty document yields none.
#[derive(Debug)]
pub struct TextChunker {
    chunk_size: usize,
    stride: usize,
}

impl TextChunker {
    /// Create a chunker; rejects `overlap >= chunk_size` up front.
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chunk_size: config.chunk_size,
            stride: config.stride(),
        })
    }

    /// Split every document into chunks, preserving document order and ascending
    /// offsets within each document.
    pub fn split(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for document in documents {
            self.split_document(document, &mut chunks);
        }
        chunks
    }

    fn split_document(&self, document: &Document, out: &mut Vec<Chunk>) {
        // Windows are measured in characters, not bytes, so multi-byte text
        // never splits inside a code point.
        let chars: Vec<char> = document.content.chars().collect();
        if chars.is_empty() {
            return;
        }

        let mut offset = 0usize;
        let mut chunk_index = 0u32;

        loop {
            let end = (offset + self.chunk_size).min(chars.len());
            let content: String = chars[offset..end].iter().collect();
            out.push(Chunk::new(document, content, offset, chunk_index));

            if end == chars.len() {
                break;
            }
            offset += self.stride;
            chunk_index += 1;
        }
    }
}
