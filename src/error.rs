//! Error types for transcript/slide alignment.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for slidealign operations.
#[derive(Error, Debug)]
pub enum AlignError {
    /// Error during text normalization or sentence splitting.
    #[error("Text processing error: {0}")]
    TextProcessing(String),

    /// The embedding provider failed for a sentence.
    ///
    /// Never retried by the aligner; the whole run is aborted.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A required input sequence was empty.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Two vectors that must share a dimension do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimension fixed by the first vector or the provider.
        expected: usize,
        /// The offending vector's dimension.
        actual: usize,
    },

    /// A vector contains NaN or infinite components.
    #[error("Invalid vector at index {index}: {reason}")]
    InvalidVector {
        /// Position of the vector in its sequence.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A saved alignment report is internally inconsistent.
    #[error("Invalid report: {0}")]
    InvalidReport(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input bytes could not be decoded with the configured encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Embedding model files could not be located or downloaded.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for slidealign operations.
pub type Result<T> = std::result::Result<T, AlignError>;

#[cfg(feature = "onnx")]
impl From<ort::Error> for AlignError {
    fn from(err: ort::Error) -> Self {
        AlignError::Embedding(format!("ONNX Runtime: {}", err))
    }
}

#[cfg(feature = "onnx")]
impl From<tokenizers::Error> for AlignError {
    fn from(err: tokenizers::Error) -> Self {
        AlignError::Embedding(format!("tokenizer: {}", err))
    }
}
