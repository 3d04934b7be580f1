//! Sentence embedding providers.
//!
//! An [`EmbeddingProvider`] maps one sentence to one fixed-dimension vector.
//! Calls are independent of each other, so [`embed_sequence`] fans a whole
//! [`SentenceSequence`] out over the rayon pool and reassembles the vectors
//! in sentence order.
//!
//! Adapters:
//!
//! - [`HashingEmbedder`] - signed feature hashing, no model files
//! - `OnnxEmbedder` - BERT-family encoders through ONNX Runtime
//!   (requires the `onnx` feature)

mod hashing;
#[cfg(feature = "onnx")]
mod hub;
#[cfg(feature = "onnx")]
mod onnx;

pub use hashing::HashingEmbedder;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;

use std::time::Instant;

use rayon::prelude::*;

use crate::config::{EmbedderKind, EmbeddingConfig};
use crate::error::{AlignError, Result};
use crate::segmentation::SentenceSequence;

/// A sentence embedding.
pub type Embedding = Vec<f32>;

/// Capability that maps a sentence to a fixed-length vector.
///
/// Implementations must:
/// - return vectors of [`dimension`](Self::dimension) for every call,
/// - be deterministic for a fixed model configuration,
/// - truncate over-long input instead of failing.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds one sentence.
    fn embed(&self, sentence: &str) -> Result<Embedding>;

    /// Dimension of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Short human readable name for logs.
    fn name(&self) -> &str;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn embed(&self, sentence: &str) -> Result<Embedding> {
        (**self).embed(sentence)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Embeds every sentence of a sequence in parallel.
///
/// The first failure aborts the run; no partial result is returned.
pub fn embed_sequence<P>(provider: &P, sentences: &SentenceSequence) -> Result<Vec<Embedding>>
where
    P: EmbeddingProvider + ?Sized,
{
    embed_sequence_with(provider, sentences, || {})
}

/// Like [`embed_sequence`], calling `on_embedded` once per finished sentence.
pub fn embed_sequence_with<P, F>(
    provider: &P,
    sentences: &SentenceSequence,
    on_embedded: F,
) -> Result<Vec<Embedding>>
where
    P: EmbeddingProvider + ?Sized,
    F: Fn() + Sync,
{
    let start = Instant::now();
    let expected = provider.dimension();

    let vectors = sentences
        .texts()
        .par_iter()
        .map(|text| {
            let vector = provider.embed(text)?;
            if vector.len() != expected {
                return Err(AlignError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
            on_embedded();
            Ok(vector)
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!(
        "Embedded {} sentences with {} in {:?}",
        vectors.len(),
        provider.name(),
        start.elapsed()
    );
    Ok(vectors)
}

/// Constructs the provider selected in the configuration.
pub fn build_provider(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    config.validate()?;
    match config.provider {
        EmbedderKind::Hashing => Ok(Box::new(HashingEmbedder::new(
            config.dimension,
            config.max_tokens,
        ))),
        #[cfg(feature = "onnx")]
        EmbedderKind::Onnx => Ok(Box::new(OnnxEmbedder::load(config)?)),
        #[cfg(not(feature = "onnx"))]
        EmbedderKind::Onnx => Err(AlignError::Config(
            "ONNX embeddings require building with the `onnx` feature".to_string(),
        )),
    }
}
