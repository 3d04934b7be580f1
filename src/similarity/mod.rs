//! Similarity between sentence embeddings.

mod cosine;
mod matrix;

pub use cosine::{cosine_similarity, dot, l2_norm, CosineSimilarity};
pub use matrix::SimilarityMatrix;

/// Trait for similarity measures between dense vectors.
pub trait SimilarityMeasure {
    /// Computes the similarity between two equally sized vectors.
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32;

    /// Computes the distance between two vectors.
    ///
    /// Default implementation: 1.0 - similarity.
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        1.0 - self.similarity(a, b)
    }
}
