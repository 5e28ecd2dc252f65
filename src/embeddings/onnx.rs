//! ONNX-based sentence embeddings
//!
//! Runs an all-MiniLM-L6-v2 class model locally through ONNX Runtime: tokenize,
//! forward pass, attention-weighted mean pooling, L2 normalization.

use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;
use tokenizers::Tokenizer;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::TextEmbedder;

/// ONNX-backed text embedder
pub struct OnnxEmbedder {
    // Session::run takes &mut, the trait takes &self
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimensions: usize,
    max_length: usize,
    batch_size: usize,
    model: String,
}

impl OnnxEmbedder {
    /// Load the model and tokenizer from the configured cache directory.
    ///
    /// Model files are fetched out of band; a missing file is a configuration
    /// error naming the expected path.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model_path = config.cache_dir.join("model.onnx");
        let tokenizer_path = config.cache_dir.join("tokenizer.json");

        for path in [&model_path, &tokenizer_path] {
            if !path.exists() {
                return Err(Error::config(format!(
                    "embedding model file '{}' not found; place the {} ONNX export there",
                    path.display(),
                    config.model
                )));
            }
        }

        tracing::info!(
            "loading embedding model '{}' from {}",
            config.model,
            config.cache_dir.display()
        );

        let session = Session::builder()
            .map_err(|e| Error::embedding(format!("failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::embedding(format!("failed to set optimization level: {e}")))?
            .commit_from_file(&model_path)
            .map_err(|e| Error::embedding(format!("failed to load model: {e}")))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::embedding(format!("failed to load tokenizer: {e}")))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dimensions: config.dimensions,
            max_length: config.max_length,
            batch_size: config.batch_size,
            model: config.model.clone(),
        })
    }

    /// Run one tokenize-infer-pool pass over a batch of texts.
    fn run_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let batch_size = texts.len();

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| Error::embedding(format!("tokenization failed: {e}")))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(self.max_length);

        let mut input_ids = vec![0i64; batch_size * max_len];
        let mut attention_mask = vec![0i64; batch_size * max_len];
        let mut token_type_ids = vec![0i64; batch_size * max_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let types = encoding.get_type_ids();
            let len = ids.len().min(max_len);

            for j in 0..len {
                input_ids[i * max_len + j] = ids[j] as i64;
                attention_mask[i * max_len + j] = mask[j] as i64;
                token_type_ids[i * max_len + j] = types[j] as i64;
            }
        }

        let shape = vec![batch_size, max_len];
        let input_ids_tensor = Tensor::from_array((shape.clone(), input_ids.into_boxed_slice()))
            .map_err(|e| Error::embedding(format!("input tensor creation failed: {e}")))?;
        let mask_tensor = Tensor::from_array((
            shape.clone(),
            attention_mask.clone().into_boxed_slice(),
        ))
        .map_err(|e| Error::embedding(format!("attention mask tensor creation failed: {e}")))?;
        let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))
            .map_err(|e| Error::embedding(format!("token type tensor creation failed: {e}")))?;

        let inputs = vec![
            ("input_ids", input_ids_tensor.into_dyn()),
            ("attention_mask", mask_tensor.into_dyn()),
            ("token_type_ids", type_tensor.into_dyn()),
        ];

        let mut session = self.session.lock();
        let outputs = session
            .run(inputs)
            .map_err(|e| Error::embedding(format!("inference failed: {e}")))?;

        let output_iter: Vec<_> = outputs.iter().collect();
        let output = output_iter
            .iter()
            .find(|(name, _)| *name == "last_hidden_state")
            .or_else(|| output_iter.first())
            .map(|(_, v)| v)
            .ok_or_else(|| Error::embedding("no output tensor"))?;

        let (tensor_shape, tensor_data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::embedding(format!("failed to extract tensor: {e}")))?;

        let dims: Vec<usize> = tensor_shape.iter().map(|&d| d as usize).collect();
        let hidden_size = dims.get(2).copied().unwrap_or(self.dimensions);

        Ok(mean_pool(
            tensor_data,
            &attention_mask,
            batch_size,
            max_len,
            hidden_size,
        ))
    }
}

impl TextEmbedder for OnnxEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.run_batch(&[text])?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("empty embedding result"))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size.max(1)) {
            let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
            all.extend(self.run_batch(&refs)?);
        }
        Ok(all)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Attention-weighted mean pooling over the hidden states, then L2 norm.
fn mean_pool(
    hidden: &[f32],
    attention_mask: &[i64],
    batch_size: usize,
    seq_len: usize,
    hidden_size: usize,
) -> Vec<Vec<f32>> {
    let mut embeddings = Vec::with_capacity(batch_size);

    for i in 0..batch_size {
        let mut sum = vec![0.0f32; hidden_size];
        let mut count = 0.0f32;

        for j in 0..seq_len {
            let mask_val = attention_mask[i * seq_len + j] as f32;
            if mask_val > 0.0 {
                let base = i * seq_len * hidden_size + j * hidden_size;
                for (k, value) in sum.iter_mut().enumerate() {
                    if let Some(h) = hidden.get(base + k) {
                        *value += h * mask_val;
                    }
                }
                count += mask_val;
            }
        }

        if count > 0.0 {
            for value in &mut sum {
                *value /= count;
            }
        }

        let norm: f32 = sum.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut sum {
                *value /= norm;
            }
        }

        embeddings.push(sum);
    }

    embeddings
}
