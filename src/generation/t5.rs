//! Local FLAN-T5 answer generation
//!
//! Runs a flan-t5 class encoder-decoder through candle with greedy decoding, so
//! identical prompts always produce identical text.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5::{Config as T5Config, T5ForConditionalGeneration};
use parking_lot::Mutex;
use tokenizers::Tokenizer;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};

use super::TextGenerator;

/// Candle-backed FLAN-T5 generator
pub struct FlanT5Generator {
    // decode() mutates the KV cache, the trait takes &self
    model: Mutex<T5ForConditionalGeneration>,
    tokenizer: Tokenizer,
    device: Device,
    max_new_tokens: usize,
    model_name: String,
    decoder_start_token_id: u32,
    eos_token_id: u32,
    use_cache: bool,
}

impl FlanT5Generator {
    /// Load tokenizer, config, and weights from the configured model directory.
    ///
    /// Model files are fetched out of band; a missing file is a configuration
    /// error naming the expected path.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let tokenizer_path = config.model_dir.join("tokenizer.json");
        let config_path = config.model_dir.join("config.json");
        let weights_path = config.model_dir.join("model.safetensors");

        for path in [&tokenizer_path, &config_path, &weights_path] {
            if !path.exists() {
                return Err(Error::config(format!(
                    "generation model file '{}' not found; place the {} export there",
                    path.display(),
                    config.model
                )));
            }
        }

        tracing::info!(
            "loading generation model '{}' from {}",
            config.model,
            config.model_dir.display()
        );

        let device = Device::Cpu;
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::generation(format!("failed to load tokenizer: {e}")))?;

        let t5_config: T5Config = serde_json::from_str(&std::fs::read_to_string(&config_path)?)
            .map_err(|e| Error::generation(format!("failed to parse model config: {e}")))?;

        let weights = candle_core::safetensors::load(&weights_path, &device)
            .map_err(|e| Error::generation(format!("failed to load weights: {e}")))?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = T5ForConditionalGeneration::load(vb, &t5_config)
            .map_err(|e| Error::generation(format!("failed to build model: {e}")))?;

        let decoder_start_token_id = t5_config
            .decoder_start_token_id
            .unwrap_or(t5_config.pad_token_id) as u32;

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            device,
            max_new_tokens: config.max_new_tokens,
            model_name: config.model.clone(),
            decoder_start_token_id,
            eos_token_id: t5_config.eos_token_id as u32,
            use_cache: t5_config.use_cache,
        })
    }
}

impl TextGenerator for FlanT5Generator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| Error::generation(format!("tokenization failed: {e}")))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::generation(e.to_string()))?;

        let mut model = self.model.lock();
        model.clear_kv_cache();

        let encoder_output = model
            .encode(&input_ids)
            .map_err(|e| Error::generation(e.to_string()))?;

        // Temperature-zero sampling reduces to argmax, so the seed is inert.
        let mut logits_processor = LogitsProcessor::new(0, None, None);
        let mut output_ids: Vec<u32> = vec![self.decoder_start_token_id];

        for step in 0..self.max_new_tokens {
            let decoder_ids = if step == 0 || !self.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)
            } else {
                let last = output_ids[output_ids.len() - 1];
                Tensor::new(&[last], &self.device)
            }
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::generation(e.to_string()))?;

            let logits = model
                .decode(&decoder_ids, &encoder_output)
                .and_then(|t| t.squeeze(0))
                .map_err(|e| Error::generation(e.to_string()))?;

            let next = logits_processor
                .sample(&logits)
                .map_err(|e| Error::generation(e.to_string()))?;

            if next == self.eos_token_id {
                break;
            }
            output_ids.push(next);
        }

        let text = self
            .tokenizer
            .decode(&output_ids[1..], true)
            .map_err(|e| Error::generation(format!("detokenization failed: {e}")))?;

        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
