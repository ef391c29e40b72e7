//! Retrieval orchestration: parse, embed, over-fetch, score, gate, filter.
//!
//! `MealRetriever` holds only configuration and its two collaborators; every
//! intermediate value lives inside one `search` call.

use tracing::debug;

use mealdb_core::config::{AppConfig, RetrievalConfig};
use mealdb_core::error::{Error, Result};
use mealdb_core::filter::filter_and_rank;
use mealdb_core::query_parser::QueryParser;
use mealdb_core::scoring::{ConfidenceGate, GateDecision, SimilarityScorer};
use mealdb_core::traits::{Embedder, VectorIndex};
use mealdb_core::types::{Intent, ParsedQuery, RetrievalOutcome};

pub struct MealRetriever<E, V> where E: Embedder, V: VectorIndex {
    embedder: E,
    index: V,
    parser: QueryParser,
    scorer: SimilarityScorer,
    gate: ConfidenceGate,
    retrieval: RetrievalConfig,
}

impl<E, V> MealRetriever<E, V> where E: Embedder, V: VectorIndex {
    pub fn new(embedder: E, index: V, config: &AppConfig) -> Self {
        Self {
            embedder,
            index,
            parser: QueryParser::new(&config.query),
            scorer: SimilarityScorer::new(&config.scoring),
            gate: ConfidenceGate::new(&config.scoring),
            retrieval: config.retrieval.clone(),
        }
    }

    pub fn with_defaults(embedder: E, index: V) -> Self {
        Self::new(embedder, index, &AppConfig::default())
    }

    /// Candidates requested from the index: enough headroom for filtering
    /// and dedup to still reach `limit`.
    pub fn fetch_count(&self, limit: usize) -> usize {
        self.retrieval.min_fetch.max(limit.saturating_mul(self.retrieval.overfetch_factor))
    }

    pub fn search(&self, raw: &str) -> Result<RetrievalOutcome> {
        let parsed = self.parser.parse(raw);
        self.search_parsed(&parsed)
    }

    /// Run retrieval for an already-parsed query.
    ///
    /// Greeting and empty queries return without touching the embedder or
    /// the index. Embedding and index failures surface as
    /// [`Error::Embedding`] and [`Error::Index`].
    pub fn search_parsed(&self, parsed: &ParsedQuery) -> Result<RetrievalOutcome> {
        match parsed.intent {
            Intent::Greeting => return Ok(RetrievalOutcome::Greeting),
            Intent::Empty => return Ok(RetrievalOutcome::EmptyQuery),
            Intent::Search if parsed.cleaned_text.trim().is_empty() => return Ok(RetrievalOutcome::EmptyQuery),
            Intent::Search => {}
        }

        let vector = self.embedder.embed(&parsed.cleaned_text).map_err(|e| Error::Embedding(format!("{e:#}")))?;
        if vector.len() != self.embedder.dim() {
            return Err(Error::Embedding(format!("expected {} dims, embedder returned {}", self.embedder.dim(), vector.len())));
        }

        let k = self.fetch_count(parsed.limit);
        let candidates = self.index.query(&vector, k).map_err(|e| Error::Index(format!("{e:#}")))?;
        debug!(k, fetched = candidates.len(), query = %parsed.cleaned_text, "candidates fetched");

        let scored = self.scorer.score_all(candidates);
        let scores: Vec<f32> = scored.iter().map(|s| s.similarity).collect();
        match self.gate.evaluate(&scores) {
            GateDecision::NoMatch => return Ok(RetrievalOutcome::NoMatch),
            GateDecision::LowConfidence { .. } => return Ok(RetrievalOutcome::LowConfidence),
            GateDecision::Pass { .. } => {}
        }

        let results = filter_and_rank(scored, &parsed.filters, parsed.limit);
        debug!(accepted = results.len(), limit = parsed.limit, "results filtered");
        Ok(RetrievalOutcome::Success(results))
    }
}
