//! Structured post-filtering, id deduplication and truncation.

use std::collections::HashSet;
use tracing::debug;

use crate::types::{FilterSet, RankedMeal, ScoredCandidate, CONFIDENCE_KEY, SIMILARITY_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Duplicate,
    Excluded,
    TooManyIngredients,
}

fn check(hit: &ScoredCandidate, filters: &FilterSet, excluded: Option<&str>, seen: &HashSet<String>) -> Option<Rejection> {
    if seen.contains(hit.id()) {
        return Some(Rejection::Duplicate);
    }
    // Matched against the whole document, instructions included.
    if let Some(term) = excluded {
        if hit.candidate.document.to_lowercase().contains(term) {
            return Some(Rejection::Excluded);
        }
    }
    if let Some(max) = filters.max_ingredients {
        if hit.candidate.metadata.ingredient_count >= max {
            return Some(Rejection::TooManyIngredients);
        }
    }
    None
}

/// Single left-to-right pass over `candidates` in the order given (no
/// re-sorting). Returns at most `limit` accepted hits, each annotated with
/// its 1-based rank and with similarity and tier copied into its metadata.
pub fn filter_and_rank(candidates: Vec<ScoredCandidate>, filters: &FilterSet, limit: usize) -> Vec<RankedMeal> {
    let excluded = filters
        .exclude_ingredient
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);
    let mut seen: HashSet<String> = HashSet::new();
    let mut accepted = Vec::with_capacity(limit.min(candidates.len()));

    for mut hit in candidates {
        if accepted.len() >= limit {
            break;
        }
        if let Some(reason) = check(&hit, filters, excluded.as_deref(), &seen) {
            debug!(id = hit.id(), ?reason, "candidate skipped");
            continue;
        }
        seen.insert(hit.id().to_string());
        let extra = &mut hit.candidate.metadata.extra;
        extra.insert(SIMILARITY_KEY.to_string(), format!("{:.2}", hit.similarity));
        extra.insert(CONFIDENCE_KEY.to_string(), hit.tier.to_string());
        accepted.push(RankedMeal { rank: accepted.len() + 1, hit });
    }
    accepted
}
