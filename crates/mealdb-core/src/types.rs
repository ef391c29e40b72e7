//! Domain types shared by the parser, scorer, filter and orchestrator.
//!
//! Everything here is created per query and dropped once the response is
//! rendered; nothing is cached between queries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type MealId = String;
pub type Meta = BTreeMap<String, String>;

/// Metadata key under which the accepted similarity (two decimals) is stored.
pub const SIMILARITY_KEY: &str = "similarity";
/// Metadata key under which the accepted confidence tier is stored.
pub const CONFIDENCE_KEY: &str = "confidence";

/// What the user asked for, as decided by the query parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Search,
    Greeting,
    Empty,
}

/// Structured post-filters. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub exclude_ingredient: Option<String>,
    pub max_ingredients: Option<u32>,
}

/// Output of the query parser.
///
/// When `intent` is not [`Intent::Search`] the other fields are carried along
/// but ignored downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub cleaned_text: String,
    pub filters: FilterSet,
    pub limit: usize,
    pub intent: Intent,
}

/// Metadata stored next to each meal vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealMeta {
    pub meal_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub ingredient_count: u32,
    #[serde(flatten)]
    pub extra: Meta,
}

/// One hit as returned by the vector index, before scoring.
///
/// `id` is the natural key for deduplication; `distance` is the index's
/// native metric where lower means closer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: MealId,
    pub document: String,
    pub metadata: MealMeta,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate with its derived similarity and tier. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub similarity: f32,
    pub tier: ConfidenceTier,
}

impl ScoredCandidate {
    pub fn id(&self) -> &str {
        &self.candidate.id
    }
}

/// An accepted result with its 1-based position in the final list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMeal {
    pub rank: usize,
    pub hit: ScoredCandidate,
}

/// Tagged result of one retrieval.
///
/// `Success` with an empty list means the semantic match was good but the
/// structured filters rejected every candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetrievalOutcome {
    Greeting,
    EmptyQuery,
    LowConfidence,
    NoMatch,
    Success(Vec<RankedMeal>),
}
