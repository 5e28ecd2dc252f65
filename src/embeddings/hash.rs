//! Deterministic hashing embeddings
//!
//! Projects whitespace tokens into a fixed-dimension bag-of-buckets vector via
//! SHA-256. Needs no model files; retrieval quality is crude but fully stable,
//! which is what offline runs and tests require.

use sha2::{Digest, Sha256};

use crate::error::Result;

use super::TextEmbedder;

/// Token-hashing embedder
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Create a hashing embedder with the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl TextEmbedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text.split_whitespace() {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let mut weight_bytes = [0u8; 4];
            weight_bytes.copy_from_slice(&digest[8..12]);

            let bucket = u64::from_be_bytes(bucket_bytes) as usize % self.dimensions;
            let weight = u32::from_be_bytes(weight_bytes) as f32 / u32::MAX as f32;
            vector[bucket] += 0.5 + weight;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hash"
    }
}
