use mealdb_core::traits::VectorIndex;
use mealdb_core::types::MealMeta;
use mealdb_vector::MemoryIndex;

fn meta(name: &str) -> MealMeta { MealMeta { meal_name: name.to_string(), ..MealMeta::default() } }

#[test]
fn returns_nearest_first_with_squared_l2() {
    let mut index = MemoryIndex::new();
    index.insert("far", "Name: Far", meta("Far"), vec![3.0, 0.0]).unwrap();
    index.insert("near", "Name: Near", meta("Near"), vec![1.0, 0.0]).unwrap();
    index.insert("mid", "Name: Mid", meta("Mid"), vec![0.0, 2.0]).unwrap();

    let hits = index.query(&[0.0, 0.0], 2).unwrap();
    assert_eq!(hits.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(), vec!["near", "mid"]);
    assert!((hits[0].distance - 1.0).abs() < 1e-6);
    assert!((hits[1].distance - 4.0).abs() < 1e-6);
    assert_eq!(hits[0].metadata.meal_name, "Near");
}

#[test]
fn k_larger_than_corpus_returns_everything() {
    let mut index = MemoryIndex::new();
    index.insert("a", "Name: A", meta("A"), vec![1.0]).unwrap();
    index.insert("a", "Name: A", meta("A"), vec![1.0]).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.query(&[0.0], 50).unwrap().len(), 2);
}

#[test]
fn dimension_mismatch_is_an_error() {
    let mut index = MemoryIndex::new();
    index.insert("a", "Name: A", meta("A"), vec![1.0, 2.0]).unwrap();
    assert!(index.insert("b", "Name: B", meta("B"), vec![1.0]).is_err());
    assert!(index.query(&[1.0, 2.0, 3.0], 1).is_err());
}

#[test]
fn empty_index_returns_no_candidates() {
    let index = MemoryIndex::new();
    assert!(index.is_empty());
    assert!(index.query(&[0.5, 0.5], 5).unwrap().is_empty());
}
