//! # slidealign - Lecture transcript to slide alignment
//!
//! slidealign maps the sentences of a spoken-lecture transcript onto the
//! slides they accompany, using only the text of both.
//!
//! ## Overview
//!
//! Both documents are cut into length-bounded sentence units, every unit is
//! embedded as a dense vector, and each transcript sentence is scored against
//! every slide sentence with cosine similarity. A transcript sentence whose
//! best score falls below the threshold starts a new slide segment.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use slidealign::{Config, Pipeline};
//!
//! let pipeline = Pipeline::from_config(&Config::default())?;
//! let report = pipeline.run(&transcript_text, &slide_text)?;
//!
//! for group in &report.groups {
//!     println!("Slide {}: {}", group.number(), group.text());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`text`] - Decoding, normalization and fragment splitting
//! - [`segmentation`] - Sentence units with length bounds
//! - [`embedding`] - Sentence embedding providers
//! - [`similarity`] - Cosine similarity and similarity matrices
//! - [`alignment`] - Segment assignment and grouping
//! - [`pipeline`] - End-to-end runs and reports
//!
//! ## Using the Stages Directly
//!
//! ```rust,ignore
//! use slidealign::{align, embed_sequence, segment, HashingEmbedder, SlideGroups};
//!
//! let transcript = segment(&transcript_text, 5, 600);
//! let slides = segment(&slide_text, 5, 600);
//!
//! let embedder = HashingEmbedder::default();
//! let t = embed_sequence(&embedder, &transcript)?;
//! let s = embed_sequence(&embedder, &slides)?;
//!
//! let assignment = align(&t, &s, 0.8)?;
//! let groups = SlideGroups::from_assignment(&transcript, &assignment)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alignment;
pub mod config;
pub mod embedding;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod segmentation;
pub mod similarity;
pub mod text;

// Re-export commonly used types
pub use alignment::{align, SimilarityAligner, SlideAssignment, SlideGroup, SlideGroups};
pub use config::{
    AlignmentConfig, CharacterSet, Config, EmbedderKind, EmbeddingConfig, MergeStrategy, Pooling,
    SegmentationConfig, SplitterKind, TextConfig, TextEncoding,
};
pub use embedding::{build_provider, embed_sequence, Embedding, EmbeddingProvider, HashingEmbedder};
#[cfg(feature = "onnx")]
pub use embedding::OnnxEmbedder;
pub use error::{AlignError, Result};
pub use output::write_sentences;
pub use pipeline::{AlignmentReport, Pipeline};
pub use segmentation::{segment, Sentence, SentenceSegmenter, SentenceSequence};
pub use similarity::{cosine_similarity, CosineSimilarity, SimilarityMatrix, SimilarityMeasure};
pub use text::{read_text, Normalizer, SentenceSplitter};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default similarity threshold below which a new slide segment starts.
pub const DEFAULT_THRESHOLD: f32 = 0.8;

/// Default embedding dimension (BERT base hidden size).
pub const DEFAULT_DIMENSION: usize = 768;
