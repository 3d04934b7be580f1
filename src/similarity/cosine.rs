//! Cosine similarity for dense vectors.

use crate::similarity::SimilarityMeasure;

/// Dot product over the common prefix of `a` and `b`.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    dot_f64(a, b) as f32
}

/// Euclidean length.
#[inline]
pub fn l2_norm(v: &[f32]) -> f32 {
    norm_f64(v) as f32
}

/// Cosine similarity in [-1, 1].
///
/// Defined as 0 when either vector has zero norm. Finite inputs always give
/// a finite score: products are accumulated in `f64`, so large components do
/// not overflow.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    cosine_with_norms(a, b, norm_f64(a), norm_f64(b))
}

#[inline]
fn dot_f64(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

#[inline]
pub(crate) fn norm_f64(v: &[f32]) -> f64 {
    dot_f64(v, v).sqrt()
}

/// Cosine similarity with precomputed `f64` norms.
#[inline]
pub(crate) fn cosine_with_norms(a: &[f32], b: &[f32], norm_a: f64, norm_b: f64) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot_f64(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0) as f32
}

/// Cosine similarity measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl SimilarityMeasure for CosineSimilarity {
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        let a = [0.3, -1.2, 4.0];
        let sim = CosineSimilarity.similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 2.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_opposite() {
        let sim = cosine_similarity(&[1.0, 2.0], &[-2.0, -4.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_invariant() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 4.0, 6.5];
        let c = [20.0, 40.0, 65.0];
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&a, &c)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_norm() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]);
        assert_eq!(sim, 0.0);
        assert!(!sim.is_nan());
    }

    #[test]
    fn test_large_components_stay_finite() {
        // squares overflow f32
        let a = [3e19f32, 3e19];
        let b = [1.0f32, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&a, &b) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert!(l2_norm(&a).is_finite());
    }

    #[test]
    fn test_distance() {
        let a = [1.0, 0.0];
        let b = [1.0, 1.0];
        let sim = CosineSimilarity.similarity(&a, &b);
        let dist = CosineSimilarity.distance(&a, &b);
        assert!((sim + dist - 1.0).abs() < 1e-6);
    }
}
