use mealdb_core::config::EmbeddingConfig;
use mealdb_embed::{get_default_embedder, Embedder, FakeEmbedder, FAKE_DIM};

fn cosine(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

#[test]
fn fake_embedder_shapes_and_determinism() {
    let config = EmbeddingConfig { use_fake: true, ..EmbeddingConfig::default() };
    let embedder = get_default_embedder(&config, std::path::Path::new("/nonexistent")).expect("embedder");
    assert_eq!(embedder.dim(), FAKE_DIM);

    let texts = vec!["spicy chicken curry".to_string(), "spicy chicken curry".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), FAKE_DIM);

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_is_case_insensitive_and_word_sensitive() {
    let embedder = FakeEmbedder::default();
    let base = embedder.embed("Vegetarian Pasta").expect("embed");
    let lower = embedder.embed("vegetarian pasta").expect("embed");
    let other = embedder.embed("grilled salmon").expect("embed");
    assert!((cosine(&base, &lower) - 1.0).abs() < 1e-5);
    assert!(cosine(&base, &other) < 0.99);
}

#[test]
fn missing_model_dir_is_an_error() {
    std::env::remove_var("APP_USE_FAKE_EMBEDDINGS");
    let config = EmbeddingConfig::default();
    let err = get_default_embedder(&config, std::path::Path::new("/definitely/not/a/model")).err().expect("load must fail");
    assert!(err.to_string().contains("not found"));
}
