//! The threshold boundary rule.

use serde::{Deserialize, Serialize};

use crate::config::AlignmentConfig;
use crate::error::{AlignError, Result};
use crate::similarity::SimilarityMatrix;

/// Segment index per transcript sentence, with the scores that produced it.
///
/// Deserialization applies the same checks as [`SlideAssignment::from_indices`]
/// and requires the per-sentence vectors to agree in length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAssignment")]
pub struct SlideAssignment {
    segments: Vec<usize>,
    best_scores: Vec<f32>,
    best_slides: Vec<Option<usize>>,
}

/// Unchecked wire form of [`SlideAssignment`].
#[derive(Deserialize)]
struct RawAssignment {
    segments: Vec<usize>,
    best_scores: Vec<f32>,
    best_slides: Vec<Option<usize>>,
}

impl TryFrom<RawAssignment> for SlideAssignment {
    type Error = AlignError;

    fn try_from(raw: RawAssignment) -> Result<Self> {
        check_segments(&raw.segments)?;
        let n = raw.segments.len();
        for (name, len) in [
            ("best_scores", raw.best_scores.len()),
            ("best_slides", raw.best_slides.len()),
        ] {
            if len != n {
                return Err(AlignError::InvalidReport(format!(
                    "{} has {} entries for {} sentences",
                    name, len, n
                )));
            }
        }
        check_scores(&raw.best_scores)?;

        Ok(Self {
            segments: raw.segments,
            best_scores: raw.best_scores,
            best_slides: raw.best_slides,
        })
    }
}

/// Segment indices must start at 0 and advance by at most one per sentence.
fn check_segments(segments: &[usize]) -> Result<()> {
    if let Some(&first) = segments.first() {
        if first != 0 {
            return Err(AlignError::Config(format!(
                "segment indices must start at 0, got {}",
                first
            )));
        }
    }
    if let Some(i) = segments
        .windows(2)
        .position(|w| w[1] < w[0] || w[1] > w[0] + 1)
    {
        return Err(AlignError::Config(format!(
            "segment indices must be non-decreasing in unit steps (at sentence {})",
            i + 1
        )));
    }
    Ok(())
}

fn check_scores(scores: &[f32]) -> Result<()> {
    match scores.iter().position(|s| !s.is_finite()) {
        Some(index) => Err(AlignError::InvalidVector {
            index,
            reason: "non-finite similarity score".to_string(),
        }),
        None => Ok(()),
    }
}

impl SlideAssignment {
    /// Applies the boundary rule to per-sentence best similarities.
    ///
    /// Sentence 0 opens segment 0. Every later sentence whose score is below
    /// `threshold` opens the next segment; the others join the current one.
    /// A NaN or infinite score or threshold is an error.
    pub fn from_max_similarities(max_similarities: &[f32], threshold: f32) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(AlignError::Config(format!(
                "similarity threshold must be finite, got {}",
                threshold
            )));
        }
        check_scores(max_similarities)?;

        let segments = max_similarities
            .iter()
            .enumerate()
            .scan(0usize, |segment, (i, &score)| {
                if i > 0 && score < threshold {
                    *segment += 1;
                }
                Some(*segment)
            })
            .collect();

        Ok(Self {
            segments,
            best_scores: max_similarities.to_vec(),
            best_slides: vec![None; max_similarities.len()],
        })
    }

    /// Wraps externally produced segment indices.
    ///
    /// The indices must start at 0 and advance by at most one per sentence.
    pub fn from_indices(segments: Vec<usize>) -> Result<Self> {
        check_segments(&segments)?;
        let n = segments.len();
        Ok(Self {
            segments,
            best_scores: vec![0.0; n],
            best_slides: vec![None; n],
        })
    }

    /// Segment index for each transcript sentence.
    pub fn segment_indices(&self) -> &[usize] {
        &self.segments
    }

    /// Segment of transcript sentence `i`.
    pub fn segment_of(&self, i: usize) -> Option<usize> {
        self.segments.get(i).copied()
    }

    /// Best similarity of transcript sentence `i` to any slide sentence.
    pub fn best_score(&self, i: usize) -> Option<f32> {
        self.best_scores.get(i).copied()
    }

    /// Slide sentence that scored best for transcript sentence `i`.
    pub fn best_slide(&self, i: usize) -> Option<usize> {
        self.best_slides.get(i).copied().flatten()
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.last().map_or(0, |&last| last + 1)
    }

    /// Number of transcript sentences.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for an empty transcript.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Consumes the assignment, returning the segment indices.
    pub fn into_indices(self) -> Vec<usize> {
        self.segments
    }
}

/// Assigns transcript sentences to slide segments by similarity.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityAligner {
    threshold: f32,
}

impl SimilarityAligner {
    /// Creates an aligner; `threshold` must lie in [-1, 1].
    pub fn new(threshold: f32) -> Result<Self> {
        AlignmentConfig {
            similarity_threshold: threshold,
        }
        .validate()?;
        Ok(Self { threshold })
    }

    /// Creates an aligner from configuration.
    pub fn from_config(config: &AlignmentConfig) -> Result<Self> {
        Self::new(config.similarity_threshold)
    }

    /// The similarity cutoff.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Scores and assigns index-aligned transcript and slide embeddings.
    ///
    /// With no slide vectors every score is 0.
    pub fn align<T, S>(&self, transcript: &[T], slides: &[S]) -> Result<SlideAssignment>
    where
        T: AsRef<[f32]>,
        S: AsRef<[f32]>,
    {
        let matrix = SimilarityMatrix::compute(transcript, slides)?;
        self.align_matrix(&matrix)
    }

    /// Assigns segments from a precomputed similarity matrix.
    pub fn align_matrix(&self, matrix: &SimilarityMatrix) -> Result<SlideAssignment> {
        let (best_slides, best_scores): (Vec<Option<usize>>, Vec<f32>) = (0..matrix.rows())
            .map(|i| match matrix.row_max(i) {
                Some((j, score)) => (Some(j), score),
                None => (None, 0.0),
            })
            .unzip();

        let mut assignment =
            SlideAssignment::from_max_similarities(&best_scores, self.threshold)?;
        assignment.best_slides = best_slides;

        log::debug!(
            "Assigned {} sentences to {} segments (threshold {:.3})",
            assignment.len(),
            assignment.segment_count(),
            self.threshold
        );
        Ok(assignment)
    }
}

impl Default for SimilarityAligner {
    fn default() -> Self {
        Self {
            threshold: crate::DEFAULT_THRESHOLD,
        }
    }
}

/// Aligns transcript vectors to slide vectors with the given threshold.
pub fn align<T, S>(
    transcript_vectors: &[T],
    slide_vectors: &[S],
    threshold: f32,
) -> Result<SlideAssignment>
where
    T: AsRef<[f32]>,
    S: AsRef<[f32]>,
{
    SimilarityAligner::new(threshold)?.align(transcript_vectors, slide_vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(angle_deg: f32) -> Vec<f32> {
        let r = angle_deg.to_radians();
        vec![r.cos(), r.sin()]
    }

    #[test]
    fn test_threshold_boundary() {
        let assignment = SlideAssignment::from_max_similarities(&[0.9, 0.75, 0.82], 0.8).unwrap();
        assert_eq!(assignment.segment_indices(), &[0, 1, 1]);
        assert_eq!(assignment.segment_count(), 2);
    }

    #[test]
    fn test_threshold_boundary_from_vectors() {
        // cos(angle) gives the similarity against the single slide at 0 degrees
        let slides = vec![unit(0.0), unit(0.0)];
        let transcript = vec![
            unit(0.9f32.acos().to_degrees()),
            unit(0.75f32.acos().to_degrees()),
            unit(0.82f32.acos().to_degrees()),
        ];
        let assignment = align(&transcript, &slides, 0.8).unwrap();
        assert_eq!(assignment.segment_indices(), &[0, 1, 1]);
        assert!((assignment.best_score(1).unwrap() - 0.75).abs() < 1e-4);
        assert_eq!(assignment.best_slide(0), Some(0));
    }

    #[test]
    fn test_first_sentence_always_segment_zero() {
        let assignment = SlideAssignment::from_max_similarities(&[0.1, 0.1], 0.8).unwrap();
        assert_eq!(assignment.segment_indices(), &[0, 1]);
    }

    #[test]
    fn test_equal_to_threshold_stays() {
        let assignment = SlideAssignment::from_max_similarities(&[0.5, 0.8, 0.8], 0.8).unwrap();
        assert_eq!(assignment.segment_indices(), &[0, 0, 0]);
    }

    #[test]
    fn test_monotonic() {
        let scores: Vec<f32> = (0..200).map(|i| ((i * 37) % 100) as f32 / 100.0).collect();
        let assignment = SlideAssignment::from_max_similarities(&scores, 0.5).unwrap();
        for w in assignment.segment_indices().windows(2) {
            assert!(w[0] <= w[1]);
            assert!(w[1] - w[0] <= 1);
        }
    }

    #[test]
    fn test_segments_can_exceed_slides() {
        let slides = vec![unit(0.0)];
        let transcript = vec![unit(90.0), unit(90.0), unit(90.0), unit(90.0)];
        let assignment = align(&transcript, &slides, 0.8).unwrap();
        assert_eq!(assignment.segment_count(), 4);
    }

    #[test]
    fn test_empty_transcript() {
        let transcript: Vec<Vec<f32>> = vec![];
        let slides = vec![unit(0.0)];
        let assignment = align(&transcript, &slides, 0.8).unwrap();
        assert!(assignment.is_empty());
        assert_eq!(assignment.segment_count(), 0);
    }

    #[test]
    fn test_no_slides_scores_zero() {
        let transcript = vec![unit(0.0), unit(10.0), unit(20.0)];
        let slides: Vec<Vec<f32>> = vec![];
        let assignment = align(&transcript, &slides, 0.8).unwrap();
        assert_eq!(assignment.segment_indices(), &[0, 1, 2]);
        assert_eq!(assignment.best_score(0), Some(0.0));
        assert_eq!(assignment.best_slide(0), None);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(SimilarityAligner::new(1.5).is_err());
        assert!(SimilarityAligner::new(f32::NAN).is_err());
        assert!(SimilarityAligner::new(-1.0).is_ok());
    }

    #[test]
    fn test_large_magnitude_vectors_score_finitely() {
        let transcript = vec![vec![1.0, 0.0], vec![3e19, 3e19], vec![1.0, 0.0]];
        let slides = vec![vec![3e19, 3e19]];
        let assignment = align(&transcript, &slides, 0.8).unwrap();

        assert!((assignment.best_score(1).unwrap() - 1.0).abs() < 1e-6);
        // cos 45 degrees is below 0.8 for sentences 0 and 2
        assert_eq!(assignment.segment_indices(), &[0, 0, 1]);
        assert!((0..3).all(|i| assignment.best_score(i).unwrap().is_finite()));
    }

    #[test]
    fn test_non_finite_scores_rejected() {
        assert!(matches!(
            SlideAssignment::from_max_similarities(&[0.9, f32::NAN, 0.9], 0.8),
            Err(AlignError::InvalidVector { index: 1, .. })
        ));
        assert!(SlideAssignment::from_max_similarities(&[0.9, f32::INFINITY], 0.8).is_err());
        assert!(SlideAssignment::from_max_similarities(&[0.9], f32::NAN).is_err());
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let json = r#"{"segments":[0,0,1],"best_scores":[0.9,0.85,0.1],"best_slides":[0,0,null]}"#;
        let assignment: SlideAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.segment_indices(), &[0, 0, 1]);
        assert_eq!(assignment.best_slide(2), None);

        let tampered = [
            r#"{"segments":[3,0],"best_scores":[0.5],"best_slides":[]}"#,
            r#"{"segments":[1,1],"best_scores":[0.5,0.5],"best_slides":[0,0]}"#,
            r#"{"segments":[0,2],"best_scores":[0.5,0.5],"best_slides":[0,0]}"#,
            r#"{"segments":[0,1],"best_scores":[0.5],"best_slides":[0,0]}"#,
            r#"{"segments":[0,1],"best_scores":[0.5,0.5],"best_slides":[0]}"#,
        ];
        for json in tampered {
            assert!(serde_json::from_str::<SlideAssignment>(json).is_err(), "{}", json);
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let assignment =
            SlideAssignment::from_max_similarities(&[0.9, 0.75, 0.82], 0.8).unwrap();
        let json = serde_json::to_string(&assignment).unwrap();
        let back: SlideAssignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, assignment);
    }

    #[test]
    fn test_from_indices_validates() {
        assert!(SlideAssignment::from_indices(vec![0, 0, 1, 2, 2]).is_ok());
        assert!(SlideAssignment::from_indices(vec![]).is_ok());
        assert!(SlideAssignment::from_indices(vec![1, 1]).is_err());
        assert!(SlideAssignment::from_indices(vec![0, 2]).is_err());
        assert!(SlideAssignment::from_indices(vec![0, 1, 0]).is_err());
    }
}
