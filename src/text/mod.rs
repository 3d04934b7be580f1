//! Text processing: decoding, normalization and fragment splitting.

mod encoding;
mod normalizer;
mod splitter;

pub use encoding::{decode, read_text};
pub use normalizer::{Normalizer, KEPT_PUNCTUATION};
pub use splitter::{
    splitter_for, DelimiterSplitter, RuleBasedSplitter, SentenceSplitter, TERMINATORS,
};
