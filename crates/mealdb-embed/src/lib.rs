//! Sentence embeddings for meal queries.
//!
//! `SentenceEmbedder` runs a MiniLM-family BERT model (e.g.
//! `all-MiniLM-L6-v2`) on candle with masked-mean pooling. `FakeEmbedder` is a
//! deterministic token-hashing stand-in used by tests and offline development;
//! set `APP_USE_FAKE_EMBEDDINGS=1` or `embedding.use_fake = true` to select it.

use anyhow::{Result, anyhow, ensure};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use mealdb_core::config::EmbeddingConfig;
pub use mealdb_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;

/// Output width of the fake embedder; matches MiniLM so tables stay interchangeable.
pub const FAKE_DIM: usize = 384;

pub struct SentenceEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, dim: usize, max_len: usize }

impl SentenceEmbedder {
    /// Load `tokenizer.json`, `config.json` and weights from `model_dir`.
    /// Weights are read from `pytorch_model.bin`.
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        ensure!(model_dir.exists(), "Embedding model directory not found: {}", model_dir.display());
        let device = device::select_device();
        info!(dir = %model_dir.display(), "loading sentence embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let raw_config: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let dim = raw_config
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))?;
        let config: BertConfig = serde_json::from_value(raw_config)?;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;
        info!(dim, "sentence embedding model loaded");

        Ok(Self { model, tokenizer, device, dim: usize::try_from(dim)?, max_len: max_len.max(1) })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize::tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        ensure!(emb.len() == self.dim, "model returned {} dims, expected {}", emb.len(), self.dim);
        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 { warn!(?elapsed, "slow embedding"); } else { debug!(?elapsed, "embedded query"); }
        Ok(emb)
    }
}

impl Embedder for SentenceEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed(&self, text: &str) -> Result<Vec<f32>> { self.embed_text(text) }
}

/// Hashes whitespace tokens into buckets and L2-normalises. Same text, same
/// vector; texts sharing words land close together.
pub struct FakeEmbedder { dim: usize }

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }
}

impl Default for FakeEmbedder {
    fn default() -> Self { Self::new(FAKE_DIM) }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize { self.dim }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        use std::hash::{Hash, Hasher}; use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0); token.to_lowercase().hash(&mut hasher); let h = hasher.finish();
            let idx = (h as usize) % self.dim; let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6); for x in &mut v { *x /= norm; } Ok(v)
    }
}

fn fake_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Build the configured embedder: the fake one when requested, the local
/// model otherwise.
pub fn get_default_embedder(config: &EmbeddingConfig, model_dir: &Path) -> Result<Box<dyn Embedder>> {
    if config.use_fake || fake_requested() {
        info!(dim = FAKE_DIM, "using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::default()));
    }
    Ok(Box::new(SentenceEmbedder::load(model_dir, config.max_tokens)?))
}
