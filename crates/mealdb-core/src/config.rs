//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys separated by `__`, e.g.
//! `APP_SCORING__MIN_BEST_SCORE=0.5`).
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub default_limit: usize,
    pub greetings: Vec<String>,
}

/// Tier boundaries and gate thresholds. These are calibrated against the
/// meal corpus; change them together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub high_tier: f32,
    pub medium_tier: f32,
    pub min_best_score: f32,
    pub min_avg_score: f32,
    pub gate_window: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub min_fetch: usize,
    pub overfetch_factor: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub lancedb_dir: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model_dir: String,
    pub max_tokens: usize,
    pub use_fake: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub query: QueryConfig,
    pub scoring: ScoringConfig,
    pub retrieval: RetrievalConfig,
    pub data: DataConfig,
    pub embedding: EmbeddingConfig,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            greetings: ["hello", "hi", "hey", "good morning", "good evening"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { high_tier: 0.52, medium_tier: 0.46, min_best_score: 0.43, min_avg_score: 0.40, gate_window: 5 }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { min_fetch: 50, overfetch_factor: 5 }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { lancedb_dir: "./meal_data/lancedb".to_string(), table: "meal_collection".to_string() }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { model_dir: "./models/all-MiniLM-L6-v2".to_string(), max_tokens: 256, use_fake: false }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            query: QueryConfig::default(),
            scoring: ScoringConfig::default(),
            retrieval: RetrievalConfig::default(),
            data: DataConfig::default(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        if !(s.medium_tier > 0.0 && s.medium_tier < s.high_tier && s.high_tier <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "tier thresholds must satisfy 0 < medium_tier < high_tier <= 1 (got medium={}, high={})",
                s.medium_tier, s.high_tier
            )));
        }
        for (name, v) in [("min_best_score", s.min_best_score), ("min_avg_score", s.min_avg_score)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::InvalidConfig(format!("scoring.{name} must be within [0, 1] (got {v})")));
            }
        }
        for (name, v) in [
            ("scoring.gate_window", s.gate_window),
            ("query.default_limit", self.query.default_limit),
            ("retrieval.min_fetch", self.retrieval.min_fetch),
            ("retrieval.overfetch_factor", self.retrieval.overfetch_factor),
        ] {
            if v == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }

    pub fn lancedb_path(&self) -> PathBuf {
        expand_path(&self.data.lancedb_dir)
    }

    pub fn model_path(&self) -> PathBuf {
        expand_path(&self.embedding.model_dir)
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Load from the working directory using `RUST_ENV` (default `dev`).
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Load `config.toml` and the env-specific overlay found under `base`.
    pub fn load_from(base: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(base.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Ok(Self { figment })
    }

    /// Extract and validate the typed settings.
    pub fn settings(&self) -> Result<AppConfig> {
        let settings: AppConfig = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
