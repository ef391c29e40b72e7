//! Distance-to-similarity conversion, confidence tiers and the retrieval gate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::types::{Candidate, ConfidenceTier, ScoredCandidate};

/// Map a non-negative distance into `(0, 1]`: `1 / (1 + d)`.
///
/// Negative distances clamp to 0. NaN, and distances too large to produce a
/// representable result, map to the smallest positive similarity.
pub fn to_similarity(distance: f32) -> f32 {
    if distance.is_nan() {
        return f32::MIN_POSITIVE;
    }
    let d = distance.max(0.0);
    (1.0 / (1.0 + d)).max(f32::MIN_POSITIVE)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScorer {
    high: f32,
    medium: f32,
}

impl SimilarityScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self { high: config.high_tier, medium: config.medium_tier }
    }

    /// `s > high` is HIGH, `medium < s <= high` is MEDIUM, everything else LOW.
    pub fn tier(&self, similarity: f32) -> ConfidenceTier {
        if similarity > self.high {
            ConfidenceTier::High
        } else if similarity > self.medium {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn score(&self, candidate: Candidate) -> ScoredCandidate {
        let similarity = to_similarity(candidate.distance);
        ScoredCandidate { tier: self.tier(similarity), similarity, candidate }
    }

    /// Score a ranked batch, preserving the index's order.
    pub fn score_all(&self, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        candidates.into_iter().map(|c| self.score(c)).collect()
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateDecision {
    NoMatch,
    LowConfidence { best: f32, average: f32 },
    Pass { best: f32, average: f32 },
}

impl GateDecision {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }
}

/// Decides whether a retrieval is trustworthy enough to show at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    min_best: f32,
    min_average: f32,
    window: usize,
}

impl ConfidenceGate {
    pub fn new(config: &ScoringConfig) -> Self {
        Self { min_best: config.min_best_score, min_average: config.min_avg_score, window: config.gate_window.max(1) }
    }

    /// `scores` must be in the index's ranking order, best first.
    pub fn evaluate(&self, scores: &[f32]) -> GateDecision {
        let Some(&best) = scores.first() else {
            debug!("gate: no candidates");
            return GateDecision::NoMatch;
        };
        let top = &scores[..scores.len().min(self.window)];
        #[allow(clippy::cast_precision_loss)]
        let average = top.iter().sum::<f32>() / top.len() as f32;
        let decision = if best < self.min_best || average < self.min_average {
            GateDecision::LowConfidence { best, average }
        } else {
            GateDecision::Pass { best, average }
        };
        debug!(best, average, ?decision, "gate evaluated");
        decision
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
