//! End-to-end transcript/slide alignment.

use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::alignment::{SimilarityAligner, SlideAssignment, SlideGroups};
use crate::config::{AlignmentConfig, Config};
use crate::embedding::{build_provider, embed_sequence_with, EmbeddingProvider};
use crate::error::{AlignError, Result};
use crate::segmentation::{SentenceSegmenter, SentenceSequence};

/// Outcome of one alignment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Segmented transcript sentences.
    pub transcript: SentenceSequence,
    /// Segmented slide sentences.
    pub slides: SentenceSequence,
    /// Segment index per transcript sentence, with best scores.
    pub assignment: SlideAssignment,
    /// Transcript sentences grouped by segment.
    pub groups: SlideGroups,
    /// Similarity cutoff used for the run.
    pub threshold: f32,
    /// Name of the embedding provider.
    pub embedder: String,
}

impl AlignmentReport {
    /// Segment index per transcript sentence.
    pub fn segment_indices(&self) -> &[usize] {
        self.assignment.segment_indices()
    }

    /// Plain-text rendering: `Slide N:` blocks followed by the mapping list.
    pub fn render_text(&self) -> String {
        let mut out = self.groups.to_string();
        out.push_str("Slide mapping:\n");
        for (i, sentence) in self.transcript.iter().enumerate() {
            if let Some(segment) = self.assignment.segment_of(i) {
                out.push_str(&format!("{}\t{}\t{}\n", i, segment + 1, sentence));
            }
        }
        out
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Wrote alignment report to {}", path.display());
        Ok(())
    }

    /// Reads a report written by [`AlignmentReport::write_json`].
    ///
    /// The report must be internally consistent; see
    /// [`AlignmentReport::validate`].
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AlignError::FileNotFound(path.to_path_buf()));
        }
        let report: Self = serde_json::from_str(&fs::read_to_string(path)?)?;
        report.validate()?;
        Ok(report)
    }

    /// Checks that the assignment, groups and sentences agree.
    pub fn validate(&self) -> Result<()> {
        AlignmentConfig {
            similarity_threshold: self.threshold,
        }
        .validate()?;

        if self.assignment.len() != self.transcript.len() {
            return Err(AlignError::InvalidReport(format!(
                "{} segment indices for {} transcript sentences",
                self.assignment.len(),
                self.transcript.len()
            )));
        }
        if let Some(i) = (0..self.assignment.len())
            .find(|&i| matches!(self.assignment.best_slide(i), Some(j) if j >= self.slides.len()))
        {
            return Err(AlignError::InvalidReport(format!(
                "sentence {} points at a slide sentence outside the {} slides",
                i,
                self.slides.len()
            )));
        }
        if SlideGroups::from_assignment(&self.transcript, &self.assignment)? != self.groups {
            return Err(AlignError::InvalidReport(
                "groups do not match the segment indices".to_string(),
            ));
        }
        Ok(())
    }
}

/// Segmenter, embedding provider and aligner wired together.
pub struct Pipeline {
    segmenter: SentenceSegmenter,
    provider: Box<dyn EmbeddingProvider>,
    aligner: SimilarityAligner,
}

impl Pipeline {
    /// Assembles a pipeline from its stages.
    pub fn new(
        segmenter: SentenceSegmenter,
        provider: Box<dyn EmbeddingProvider>,
        aligner: SimilarityAligner,
    ) -> Self {
        Self {
            segmenter,
            provider,
            aligner,
        }
    }

    /// Builds every stage from configuration, loading the embedding model.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            SentenceSegmenter::from_config(config)?,
            build_provider(&config.embedding)?,
            SimilarityAligner::from_config(&config.alignment)?,
        ))
    }

    /// The sentence segmenter.
    pub fn segmenter(&self) -> &SentenceSegmenter {
        &self.segmenter
    }

    /// The embedding provider.
    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    /// The aligner.
    pub fn aligner(&self) -> &SimilarityAligner {
        &self.aligner
    }

    /// Aligns a transcript with slide text.
    pub fn run(&self, transcript: &str, slides: &str) -> Result<AlignmentReport> {
        self.run_with_progress(transcript, slides, |_| {}, || {})
    }

    /// Like [`Pipeline::run`], reporting embedding progress.
    ///
    /// `on_start` receives the number of sentences about to be embedded;
    /// `on_embedded` fires once per embedded sentence.
    pub fn run_with_progress<S, F>(
        &self,
        transcript: &str,
        slides: &str,
        on_start: S,
        on_embedded: F,
    ) -> Result<AlignmentReport>
    where
        S: FnOnce(usize),
        F: Fn() + Sync,
    {
        let start = Instant::now();

        let transcript = self.segmenter.segment(transcript);
        let slides = self.segmenter.segment(slides);
        log::info!(
            "Segmented {} transcript and {} slide sentences",
            transcript.len(),
            slides.len()
        );

        if slides.is_empty() {
            return Err(AlignError::EmptyInput(
                "slide text produced no sentences".to_string(),
            ));
        }
        if transcript.is_empty() {
            log::warn!("Transcript produced no sentences");
        }

        on_start(transcript.len() + slides.len());
        let provider = self.provider.as_ref();
        let transcript_vectors = embed_sequence_with(provider, &transcript, &on_embedded)?;
        let slide_vectors = embed_sequence_with(provider, &slides, &on_embedded)?;

        let assignment = self.aligner.align(&transcript_vectors, &slide_vectors)?;
        let groups = SlideGroups::from_assignment(&transcript, &assignment)?;

        log::info!(
            "Aligned {} sentences into {} segments for {} slide sentences in {:?}",
            transcript.len(),
            groups.len(),
            slides.len(),
            start.elapsed()
        );

        Ok(AlignmentReport {
            transcript,
            slides,
            assignment,
            groups,
            threshold: self.aligner.threshold(),
            embedder: self.provider.name().to_string(),
        })
    }
}
