//! Sentence segmentation.
//!
//! Raw text is normalized, cut into fragments on sentence-terminal
//! punctuation, stripped of fragments below the minimum length and merged
//! into units of at most the maximum length.

mod merge;
mod segmenter;
mod sentence;

pub use merge::merge_fragments;
pub use segmenter::{segment, SentenceSegmenter};
pub use sentence::{char_len, Sentence, SentenceSequence};
