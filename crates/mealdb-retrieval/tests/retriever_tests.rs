use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mealdb_core::document::MealDocument;
use mealdb_core::error::Error;
use mealdb_core::traits::{Embedder, VectorIndex};
use mealdb_core::types::{Candidate, MealMeta, RetrievalOutcome};
use mealdb_embed::FakeEmbedder;
use mealdb_retrieval::MealRetriever;
use mealdb_vector::MemoryIndex;

/// Returns a constant vector and counts calls.
#[derive(Clone, Default)]
struct CountingEmbedder { calls: Arc<AtomicUsize> }

impl Embedder for CountingEmbedder {
    fn dim(&self) -> usize { 2 }
    fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.0, 0.0])
    }
}

/// Serves a fixed ranked list and records the requested `k`.
#[derive(Clone, Default)]
struct FixedIndex { hits: Vec<Candidate>, calls: Arc<AtomicUsize>, last_k: Arc<AtomicUsize> }

impl FixedIndex {
    fn new(hits: Vec<Candidate>) -> Self { Self { hits, ..Self::default() } }
}

impl VectorIndex for FixedIndex {
    fn query(&self, _vector: &[f32], k: usize) -> anyhow::Result<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_k.store(k, Ordering::SeqCst);
        Ok(self.hits.iter().take(k).cloned().collect())
    }
}

struct BrokenEmbedder;
impl Embedder for BrokenEmbedder {
    fn dim(&self) -> usize { 2 }
    fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> { anyhow::bail!("model not loaded") }
}

struct ShortEmbedder;
impl Embedder for ShortEmbedder {
    fn dim(&self) -> usize { 4 }
    fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> { Ok(vec![0.0]) }
}

struct BrokenIndex;
impl VectorIndex for BrokenIndex {
    fn query(&self, _vector: &[f32], _k: usize) -> anyhow::Result<Vec<Candidate>> { anyhow::bail!("table dropped") }
}

fn candidate(id: &str, ingredients: &[&str], distance: f32) -> Candidate {
    let doc = MealDocument {
        name: format!("Meal {id}"),
        category: Some("Misc".into()),
        area: None,
        ingredients: ingredients.join(", "),
        instructions: "Cook.".into(),
    };
    Candidate {
        id: id.to_string(),
        document: doc.to_string(),
        metadata: MealMeta { meal_name: doc.name.clone(), ingredient_count: ingredients.len() as u32, ..MealMeta::default() },
        distance,
    }
}

fn ids(outcome: &RetrievalOutcome) -> Vec<String> {
    match outcome {
        RetrievalOutcome::Success(results) => results.iter().map(|r| r.hit.id().to_string()).collect(),
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn greeting_short_circuits_without_external_calls() {
    let embedder = CountingEmbedder::default();
    let index = FixedIndex::new(vec![candidate("a", &["rice"], 0.1)]);
    let retriever = MealRetriever::with_defaults(embedder.clone(), index.clone());

    assert_eq!(retriever.search("Hi").unwrap(), RetrievalOutcome::Greeting);
    assert_eq!(retriever.search("HELLO").unwrap(), RetrievalOutcome::Greeting);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn filter_only_query_is_empty() {
    let embedder = CountingEmbedder::default();
    let index = FixedIndex::new(vec![candidate("a", &["rice"], 0.1)]);
    let retriever = MealRetriever::with_defaults(embedder.clone(), index.clone());

    assert_eq!(retriever.search("   ").unwrap(), RetrievalOutcome::EmptyQuery);
    assert_eq!(retriever.search("show 3").unwrap(), RetrievalOutcome::EmptyQuery);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn no_candidates_is_no_match() {
    let retriever = MealRetriever::with_defaults(CountingEmbedder::default(), FixedIndex::new(vec![]));
    assert_eq!(retriever.search("pasta").unwrap(), RetrievalOutcome::NoMatch);
}

#[test]
fn weak_candidates_are_low_confidence() {
    let index = FixedIndex::new(vec![candidate("a", &["rice"], 1.5), candidate("b", &["rice"], 1.6)]);
    let retriever = MealRetriever::with_defaults(CountingEmbedder::default(), index);
    assert_eq!(retriever.search("pasta").unwrap(), RetrievalOutcome::LowConfidence);
}

#[test]
fn success_applies_filters_dedup_and_limit_in_rank_order() {
    let index = FixedIndex::new(vec![
        candidate("a", &["chicken", "rice"], 0.9),
        candidate("b", &["tofu", "rice"], 1.0),
        candidate("b", &["tofu", "rice"], 1.05),
        candidate("c", &["beans"], 1.1),
        candidate("d", &["lentils"], 1.2),
        candidate("e", &["peas"], 1.3),
    ]);
    let retriever = MealRetriever::with_defaults(CountingEmbedder::default(), index.clone());

    let outcome = retriever.search("2 vegetarian meals without chicken").unwrap();
    assert_eq!(ids(&outcome), vec!["b", "c"]);
    assert_eq!(index.last_k.load(Ordering::SeqCst), 50);
}

#[test]
fn over_fetch_scales_with_limit() {
    let index = FixedIndex::new(vec![candidate("a", &["rice"], 0.2)]);
    let retriever = MealRetriever::with_defaults(CountingEmbedder::default(), index.clone());
    assert_eq!(retriever.fetch_count(5), 50);
    assert_eq!(retriever.fetch_count(20), 100);
    assert_eq!(retriever.fetch_count(usize::MAX), usize::MAX);

    retriever.search("show 30 soups").unwrap();
    assert_eq!(index.last_k.load(Ordering::SeqCst), 150);
}

#[test]
fn filters_rejecting_everything_still_succeed_empty() {
    let index = FixedIndex::new(vec![candidate("a", &["a", "b", "c", "d", "e", "f"], 0.3)]);
    let retriever = MealRetriever::with_defaults(CountingEmbedder::default(), index);
    let outcome = retriever.search("stew less than 3 ingredients").unwrap();
    assert_eq!(outcome, RetrievalOutcome::Success(vec![]));
}

#[test]
fn external_failures_are_distinct_errors() {
    let retriever = MealRetriever::with_defaults(BrokenEmbedder, FixedIndex::new(vec![]));
    assert!(matches!(retriever.search("pasta"), Err(Error::Embedding(msg)) if msg.contains("model not loaded")));

    let retriever = MealRetriever::with_defaults(ShortEmbedder, FixedIndex::new(vec![]));
    assert!(matches!(retriever.search("pasta"), Err(Error::Embedding(_))));

    let retriever = MealRetriever::with_defaults(CountingEmbedder::default(), BrokenIndex);
    assert!(matches!(retriever.search("pasta"), Err(Error::Index(msg)) if msg.contains("table dropped")));
}

#[test]
fn end_to_end_with_fake_embedder_and_memory_index() {
    let embedder = FakeEmbedder::default();
    let mut index = MemoryIndex::new();
    for (id, name, ingredients) in [
        ("1", "Vegetarian Chilli", "kidney beans, tomatoes, onion, chilli"),
        ("2", "Chicken Chilli", "chicken, tomatoes, onion, chilli"),
        ("3", "Lemon Drizzle Cake", "flour, sugar, butter, lemon, eggs"),
    ] {
        let doc = MealDocument { name: name.into(), category: None, area: None, ingredients: ingredients.into(), instructions: "Cook.".into() };
        let count = doc.ingredient_list().len() as u32;
        let text = doc.to_string();
        let vector = embedder.embed(&text).unwrap();
        index.insert(id, text, MealMeta { meal_name: name.into(), ingredient_count: count, ..MealMeta::default() }, vector).unwrap();
    }
    // Fake vectors are unit length, so squared L2 lives in [0, 4]; loosen the gate for them.
    let mut config = mealdb_core::config::AppConfig::default();
    config.scoring.min_best_score = 0.0;
    config.scoring.min_avg_score = 0.0;
    let retriever = MealRetriever::new(embedder, index, &config);

    let outcome = retriever.search("one result chilli without chicken").unwrap();
    let RetrievalOutcome::Success(results) = outcome else { panic!("expected success") };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].hit.id(), "1");
    assert_eq!(results[0].rank, 1);
}
