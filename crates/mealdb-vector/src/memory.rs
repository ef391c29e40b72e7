//! Exact in-memory index for tests and small corpora.

use anyhow::{Result, ensure};

use mealdb_core::traits::VectorIndex;
use mealdb_core::types::{Candidate, MealMeta};

#[derive(Debug, Clone)]
struct Entry {
	id: String,
	document: String,
	metadata: MealMeta,
	vector: Vec<f32>,
}

/// Brute-force squared-L2 search, the same metric LanceDB uses by default.
/// Entries with the same id are kept as separate rows, as a real index may do.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex { dim: Option<usize>, entries: Vec<Entry> }

impl MemoryIndex {
	pub fn new() -> Self { Self::default() }

	pub fn insert(&mut self, id: impl Into<String>, document: impl Into<String>, metadata: MealMeta, vector: Vec<f32>) -> Result<()> {
		ensure!(!vector.is_empty(), "empty vector");
		let dim = *self.dim.get_or_insert(vector.len());
		ensure!(vector.len() == dim, "vector has {} dims, index expects {}", vector.len(), dim);
		self.entries.push(Entry { id: id.into(), document: document.into(), metadata, vector });
		Ok(())
	}

	pub fn len(&self) -> usize { self.entries.len() }

	pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
	a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl VectorIndex for MemoryIndex {
	fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Candidate>> {
		if let Some(dim) = self.dim {
			ensure!(vector.len() == dim, "query has {} dims, index expects {}", vector.len(), dim);
		}
		let mut scored: Vec<(f32, &Entry)> = self.entries.iter().map(|e| (squared_l2(vector, &e.vector), e)).collect();
		scored.sort_by(|a, b| a.0.total_cmp(&b.0));
		Ok(scored
			.into_iter()
			.take(k)
			.map(|(distance, e)| Candidate { id: e.id.clone(), document: e.document.clone(), metadata: e.metadata.clone(), distance })
			.collect())
	}
}
