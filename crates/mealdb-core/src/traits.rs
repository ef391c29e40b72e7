use crate::types::Candidate;

/// Maps text to a fixed-size vector. Deterministic for a fixed model.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Nearest-neighbour lookup over stored meal vectors.
///
/// Implementations return at most `k` candidates, best match first.
pub trait VectorIndex: Send + Sync {
    fn query(&self, vector: &[f32], k: usize) -> anyhow::Result<Vec<Candidate>>;
}

impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn dim(&self) -> usize { (**self).dim() }
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> { (**self).embed(text) }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { (**self).embed_batch(texts) }
}

impl<T: VectorIndex + ?Sized> VectorIndex for Box<T> {
    fn query(&self, vector: &[f32], k: usize) -> anyhow::Result<Vec<Candidate>> { (**self).query(vector, k) }
}
