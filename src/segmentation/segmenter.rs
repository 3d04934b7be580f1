//! Raw text to length-bounded sentence sequences.

use crate::config::{Config, MergeStrategy, SegmentationConfig, TextConfig};
use crate::error::Result;
use crate::segmentation::merge::merge_fragments;
use crate::segmentation::sentence::SentenceSequence;
use crate::text::{splitter_for, DelimiterSplitter, Normalizer, SentenceSplitter};

/// Normalizes, splits and merges text into sentence units.
///
/// Segmentation is a pure function of the input text and the configuration.
pub struct SentenceSegmenter {
    normalizer: Normalizer,
    splitter: Box<dyn SentenceSplitter>,
    config: SegmentationConfig,
}

impl SentenceSegmenter {
    /// Creates a segmenter, validating the length bounds.
    pub fn new(config: SegmentationConfig, text: &TextConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(text),
            splitter: splitter_for(config.splitter),
            config,
        })
    }

    /// Creates a segmenter from the full configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.segmentation.clone(), &config.text)
    }

    /// Replaces the fragment splitter, e.g. with an external tokenizer.
    pub fn with_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// The active segmentation settings.
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segments `text` into sentences.
    ///
    /// Returns an empty sequence when nothing survives normalization.
    pub fn segment(&self, text: &str) -> SentenceSequence {
        let normalized = self.normalizer.normalize(text);
        let fragments = self.splitter.split(&normalized);
        let merged = merge_fragments(
            &fragments,
            self.config.min_sentence_length,
            self.config.max_sentence_length,
            self.config.strategy,
        );

        log::debug!(
            "Segmented {} fragments into {} sentences",
            fragments.len(),
            merged.len()
        );

        SentenceSequence::from_texts(merged)
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::default(),
            splitter: Box::new(DelimiterSplitter),
            config: SegmentationConfig::default(),
        }
    }
}

/// Segments `text` with the default normalizer, delimiter splitter and
/// forward merge.
pub fn segment(text: &str, min_length: usize, max_length: usize) -> SentenceSequence {
    let fragments = DelimiterSplitter.split(&Normalizer::default().normalize(text));
    SentenceSequence::from_texts(merge_fragments(
        &fragments,
        min_length,
        max_length,
        MergeStrategy::Forward,
    ))
}
