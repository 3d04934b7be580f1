//! Configuration for the slidealign pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};

/// Main configuration for an alignment run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text decoding and normalization.
    pub text: TextConfig,

    /// Sentence segmentation.
    pub segmentation: SegmentationConfig,

    /// Similarity alignment.
    pub alignment: AlignmentConfig,

    /// Embedding provider selection.
    pub embedding: EmbeddingConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults. The result is validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AlignError::FileNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()?;
        self.alignment.validate()?;
        self.embedding.validate()
    }
}

/// Which characters survive normalization.
///
/// Whitespace and the punctuation marks `. , ; ? !` are always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharacterSet {
    /// ASCII letters and digits only.
    #[default]
    Ascii,
    /// Any alphabetic or numeric code point.
    Unicode,
}

/// Encoding used to decode input documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// Strict UTF-8; invalid bytes are an error.
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD.
    Utf8Lossy,
    /// ISO-8859-1, every byte maps to the code point of the same value.
    Latin1,
}

/// Text processing configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Allowed character set.
    /// Default: ASCII.
    pub character_set: CharacterSet,

    /// Input document encoding.
    /// Default: UTF-8.
    pub encoding: TextEncoding,
}

/// Policy for combining raw fragments into sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum MergeStrategy {
    /// Greedy forward merge up to the maximum length.
    #[default]
    Forward,
    /// Only fragments up to `short_length` chars seek a neighbour.
    ShortNeighbour {
        /// Fragments at or below this length try to merge.
        short_length: usize,
    },
}

/// How raw text is cut into fragments before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitterKind {
    /// Split after every `.`, `?` and `!`.
    #[default]
    Delimiter,
    /// Delimiter split that protects decimals, initials and abbreviations.
    RuleBased,
}

/// Sentence segmentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Fragments shorter than this (in chars) are dropped.
    /// Default: 5.
    pub min_sentence_length: usize,

    /// Merged sentences stay at or below this length (in chars).
    /// Default: 600.
    pub max_sentence_length: usize,

    /// Merge policy.
    /// Default: forward.
    pub strategy: MergeStrategy,

    /// Fragment splitter.
    /// Default: delimiter.
    pub splitter: SplitterKind,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_sentence_length: 5,
            max_sentence_length: 600,
            strategy: MergeStrategy::Forward,
            splitter: SplitterKind::Delimiter,
        }
    }
}

impl SegmentationConfig {
    /// Checks length bounds.
    pub fn validate(&self) -> Result<()> {
        if self.min_sentence_length == 0 {
            return Err(AlignError::Config(
                "min_sentence_length must be at least 1".to_string(),
            ));
        }
        if self.min_sentence_length > self.max_sentence_length {
            return Err(AlignError::Config(format!(
                "min_sentence_length ({}) exceeds max_sentence_length ({})",
                self.min_sentence_length, self.max_sentence_length
            )));
        }
        if let MergeStrategy::ShortNeighbour { short_length } = self.strategy {
            if short_length > self.max_sentence_length {
                return Err(AlignError::Config(format!(
                    "short_length ({}) exceeds max_sentence_length ({})",
                    short_length, self.max_sentence_length
                )));
            }
        }
        Ok(())
    }
}

/// Alignment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Cosine similarity below which a new slide segment starts.
    /// Default: 0.8.
    pub similarity_threshold: f32,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: crate::DEFAULT_THRESHOLD,
        }
    }
}

impl AlignmentConfig {
    /// Checks that the threshold is a cosine value.
    pub fn validate(&self) -> Result<()> {
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(AlignError::Config(format!(
                "similarity_threshold must lie in [-1, 1], got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

/// Which embedding adapter to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbedderKind {
    /// Feature hashing, no model files needed.
    #[default]
    Hashing,
    /// Transformer encoder through ONNX Runtime.
    Onnx,
}

/// How token states are reduced to one sentence vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pooling {
    /// Hidden state of the first ([CLS]) token.
    #[default]
    Cls,
    /// Attention-masked mean over all tokens.
    Mean,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Adapter kind.
    /// Default: hashing.
    pub provider: EmbedderKind,

    /// Vector dimension for the hashing adapter.
    /// The ONNX adapter takes its dimension from the model.
    /// Default: 768.
    pub dimension: usize,

    /// Inputs are truncated keep-left to this many tokens.
    /// Default: 512.
    pub max_tokens: usize,

    /// Hub repository id or local directory of the ONNX model.
    /// Default: "Xenova/bert-base-uncased".
    pub model: String,

    /// Pooling for transformer outputs.
    /// Default: CLS.
    pub pooling: Pooling,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbedderKind::Hashing,
            dimension: crate::DEFAULT_DIMENSION,
            max_tokens: 512,
            model: "Xenova/bert-base-uncased".to_string(),
            pooling: Pooling::Cls,
        }
    }
}

impl EmbeddingConfig {
    /// Checks sizes.
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(AlignError::Config("embedding dimension must be positive".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(AlignError::Config("max_tokens must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.segmentation.min_sentence_length, 5);
        assert_eq!(config.segmentation.max_sentence_length, 600);
        assert!((config.alignment.similarity_threshold - 0.8).abs() < 1e-6);
        assert_eq!(config.embedding.dimension, 768);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_exceeds_max() {
        let mut config = Config::default();
        config.segmentation.min_sentence_length = 50;
        config.segmentation.max_sentence_length = 10;
        assert!(matches!(config.validate(), Err(AlignError::Config(_))));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = Config::default();
        config.alignment.similarity_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "segmentation": { "max_sentence_length": 400,
                              "strategy": { "kind": "short-neighbour", "short_length": 100 } },
            "text": { "character_set": "unicode" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.segmentation.max_sentence_length, 400);
        assert_eq!(config.segmentation.min_sentence_length, 5);
        assert_eq!(
            config.segmentation.strategy,
            MergeStrategy::ShortNeighbour { short_length: 100 }
        );
        assert_eq!(config.text.character_set, CharacterSet::Unicode);
        assert_eq!(config.embedding.provider, EmbedderKind::Hashing);
    }
}
