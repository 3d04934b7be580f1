//! Transcript × slide similarity matrices.

use crate::error::{AlignError, Result};
use crate::similarity::cosine::{cosine_with_norms, norm_f64};
use crate::similarity::SimilarityMeasure;

/// Row-major similarity scores, one row per transcript sentence and one
/// column per slide sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Computes cosine similarities between every transcript and slide vector.
    ///
    /// All vectors must share one dimension and contain only finite values.
    /// Zero-norm vectors score 0 against everything.
    pub fn compute<T, S>(transcript: &[T], slides: &[S]) -> Result<Self>
    where
        T: AsRef<[f32]>,
        S: AsRef<[f32]>,
    {
        validate(transcript, slides)?;

        let slide_norms: Vec<f64> = slides.iter().map(|s| norm_f64(s.as_ref())).collect();
        let mut scores = Vec::with_capacity(transcript.len() * slides.len());
        for t in transcript {
            let t = as_slice(t);
            let t_norm = norm_f64(t);
            scores.extend(
                slides
                    .iter()
                    .zip(&slide_norms)
                    .map(|(s, &s_norm)| cosine_with_norms(t, s.as_ref(), t_norm, s_norm)),
            );
        }

        Self::from_scores(transcript.len(), slides.len(), scores)
    }

    /// Computes the matrix with an arbitrary similarity measure.
    ///
    /// A measure that yields a non-finite score is rejected.
    pub fn compute_with<M, T, S>(measure: &M, transcript: &[T], slides: &[S]) -> Result<Self>
    where
        M: SimilarityMeasure + ?Sized,
        T: AsRef<[f32]>,
        S: AsRef<[f32]>,
    {
        validate(transcript, slides)?;

        let scores = transcript
            .iter()
            .flat_map(|t| {
                slides
                    .iter()
                    .map(move |s| measure.similarity(t.as_ref(), s.as_ref()))
            })
            .collect();

        Self::from_scores(transcript.len(), slides.len(), scores)
    }

    /// Builds a matrix from precomputed row-major scores.
    ///
    /// Every score must be finite; `index` in the error is the row.
    pub fn from_scores(rows: usize, cols: usize, scores: Vec<f32>) -> Result<Self> {
        if scores.len() != rows * cols {
            return Err(AlignError::DimensionMismatch {
                expected: rows * cols,
                actual: scores.len(),
            });
        }
        if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
            return Err(AlignError::InvalidVector {
                index: index / cols.max(1),
                reason: "non-finite similarity score".to_string(),
            });
        }
        Ok(Self { rows, cols, scores })
    }

    /// Number of transcript sentences.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of slide sentences.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Score of transcript sentence `i` against slide sentence `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        (i < self.rows && j < self.cols).then(|| self.scores[i * self.cols + j])
    }

    /// All scores of transcript sentence `i`.
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        (i < self.rows).then(|| &self.scores[i * self.cols..(i + 1) * self.cols])
    }

    /// Best-matching slide sentence of row `i` as `(slide index, score)`.
    ///
    /// `None` when there are no slide sentences or `i` is out of range. Ties
    /// go to the lowest index.
    pub fn row_max(&self, i: usize) -> Option<(usize, f32)> {
        self.row(i)?
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (j, score)| match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((j, score)),
            })
    }
}

fn validate<T, S>(transcript: &[T], slides: &[S]) -> Result<()>
where
    T: AsRef<[f32]>,
    S: AsRef<[f32]>,
{
    let first = transcript
        .first()
        .map(|v| as_slice(v).len())
        .or_else(|| slides.first().map(|v| as_slice(v).len()));
    let Some(expected) = first else {
        return Ok(());
    };

    check_vectors("transcript", transcript, expected)?;
    check_vectors("slide", slides, expected)
}

fn check_vectors<V: AsRef<[f32]>>(side: &str, vectors: &[V], expected: usize) -> Result<()> {
    for (index, vector) in vectors.iter().map(as_slice).enumerate() {
        if vector.len() != expected {
            return Err(AlignError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(AlignError::InvalidVector {
                index,
                reason: format!("{} vector contains NaN or infinite components", side),
            });
        }
    }
    Ok(())
}

#[inline]
fn as_slice<V: AsRef<[f32]>>(v: &V) -> &[f32] {
    v.as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::CosineSimilarity;

    #[test]
    fn test_shape_and_values() {
        let transcript = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        let slides = vec![vec![1.0, 0.0], vec![0.0, 3.0]];
        let m = SimilarityMatrix::compute(&transcript, &slides).unwrap();

        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert!((m.get(0, 0).unwrap() - 1.0).abs() < 1e-6);
        assert!(m.get(0, 1).unwrap().abs() < 1e-6);
        assert!((m.get(2, 1).unwrap() - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn test_row_max() {
        let m = SimilarityMatrix::from_scores(2, 3, vec![0.1, 0.7, 0.7, -0.2, -0.1, -0.5]).unwrap();
        assert_eq!(m.row_max(0), Some((1, 0.7)));
        assert_eq!(m.row_max(1), Some((1, -0.1)));
    }

    #[test]
    fn test_no_slides() {
        let transcript = vec![vec![1.0, 0.0]];
        let slides: Vec<Vec<f32>> = vec![];
        let m = SimilarityMatrix::compute(&transcript, &slides).unwrap();
        assert_eq!(m.cols(), 0);
        assert_eq!(m.row_max(0), None);
    }

    #[test]
    fn test_dimension_mismatch() {
        let transcript = vec![vec![1.0, 0.0]];
        let slides = vec![vec![1.0, 0.0, 0.0]];
        assert!(matches!(
            SimilarityMatrix::compute(&transcript, &slides),
            Err(AlignError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let transcript = vec![vec![1.0, f32::NAN]];
        let slides = vec![vec![1.0, 0.0]];
        assert!(matches!(
            SimilarityMatrix::compute(&transcript, &slides),
            Err(AlignError::InvalidVector { index: 0, .. })
        ));
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let transcript = vec![vec![0.0, 0.0]];
        let slides = vec![vec![1.0, 1.0]];
        let m = SimilarityMatrix::compute(&transcript, &slides).unwrap();
        assert_eq!(m.get(0, 0), Some(0.0));
    }

    #[test]
    fn test_compute_with_matches_compute() {
        let transcript = vec![vec![0.2, 0.9, -0.3], vec![1.0, 0.1, 0.0]];
        let slides = vec![vec![0.1, 0.8, 0.0], vec![-1.0, 0.5, 0.2]];
        let fast = SimilarityMatrix::compute(&transcript, &slides).unwrap();
        let generic =
            SimilarityMatrix::compute_with(&CosineSimilarity, &transcript, &slides).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert!((fast.get(i, j).unwrap() - generic.get(i, j).unwrap()).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_large_magnitude_vectors() {
        let transcript = vec![vec![1.0, 0.0], vec![3e19, 3e19], vec![1.0, 0.0]];
        let slides = vec![vec![3e19, 3e19]];
        let m = SimilarityMatrix::compute(&transcript, &slides).unwrap();

        let column: Vec<f32> = (0..3).map(|i| m.get(i, 0).unwrap()).collect();
        assert!(column.iter().all(|s| s.is_finite()));
        assert!((column[1] - 1.0).abs() < 1e-6);
        assert!((column[0] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_slide_vector_named() {
        let transcript = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let slides = vec![vec![f32::INFINITY, 0.0]];
        match SimilarityMatrix::compute(&transcript, &slides) {
            Err(AlignError::InvalidVector { index, reason }) => {
                assert_eq!(index, 0);
                assert!(reason.starts_with("slide"));
            }
            other => panic!("expected InvalidVector, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_measure_rejected() {
        struct Broken;
        impl SimilarityMeasure for Broken {
            fn similarity(&self, _a: &[f32], _b: &[f32]) -> f32 {
                f32::NAN
            }
        }

        let transcript = vec![vec![1.0, 0.0]];
        let slides = vec![vec![1.0, 0.0]];
        assert!(matches!(
            SimilarityMatrix::compute_with(&Broken, &transcript, &slides),
            Err(AlignError::InvalidVector { .. })
        ));
    }

    #[test]
    fn test_row_out_of_range() {
        let m = SimilarityMatrix::from_scores(1, 2, vec![0.5, 0.25]).unwrap();
        assert_eq!(m.row(0), Some(&[0.5, 0.25][..]));
        assert_eq!(m.row(1), None);
        assert_eq!(m.row_max(1), None);
    }

    #[test]
    fn test_from_scores_length_checked() {
        assert!(SimilarityMatrix::from_scores(2, 2, vec![0.0; 3]).is_err());
    }
}
