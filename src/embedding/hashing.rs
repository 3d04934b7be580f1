//! Feature-hashing sentence embeddings.
//!
//! Every lowercased word unigram and adjacent-word bigram is hashed into
//! `dimension` buckets with a sign, using several prime-multiplied probes per
//! feature. The summed vector is L2-normalized. Sentences that share words
//! point in similar directions; unrelated sentences are close to orthogonal.

use unicode_segmentation::UnicodeSegmentation;

use crate::embedding::{Embedding, EmbeddingProvider};
use crate::error::Result;

/// Multipliers for the hash probes.
const PRIMES: [u64; 4] = [
    0x9E37_79B9_7F4A_7C15,
    0xC2B2_AE3D_27D4_EB4F,
    0x1656_67B1_9E37_79F9,
    0x27D4_EB2F_1656_67C5,
];

/// Probes per feature.
const NUM_HASHES: usize = 2;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic, model-free embedding provider.
///
/// Only the first `max_tokens` words of a sentence contribute (keep-left
/// truncation).
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    max_tokens: usize,
}

impl HashingEmbedder {
    /// Creates an embedder producing `dimension`-long vectors.
    ///
    /// A zero dimension or token budget is raised to 1.
    pub fn new(dimension: usize, max_tokens: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            max_tokens: max_tokens.max(1),
        }
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let base = fnv1a(feature.as_bytes());
        for prime in PRIMES.iter().take(NUM_HASHES) {
            let h = base.wrapping_mul(*prime);
            let bucket = ((h >> 32) % self.dimension as u64) as usize;
            let sign = if h & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign * weight;
        }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(crate::DEFAULT_DIMENSION, 512)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed(&self, sentence: &str) -> Result<Embedding> {
        let words: Vec<String> = sentence
            .unicode_words()
            .take(self.max_tokens)
            .map(str::to_lowercase)
            .collect();

        let mut vector = vec![0.0f32; self.dimension];
        for word in &words {
            self.add_feature(&mut vector, word, UNIGRAM_WEIGHT);
        }
        for pair in words.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut vector, &bigram, BIGRAM_WEIGHT);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

/// 64-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(PRIME))
}
