//! Sentence units and ordered sentence sequences.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Length of a sentence in Unicode scalar values.
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// An immutable, trimmed, non-empty sentence and its position in its sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sentence {
    text: String,
    index: usize,
}

impl Sentence {
    /// The sentence text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position of the sentence in the sequence that produced it.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Sentence {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Sentences in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentenceSequence {
    sentences: Vec<Sentence>,
}

impl SentenceSequence {
    /// Builds a sequence from raw texts.
    ///
    /// Texts are trimmed; empty ones are skipped and do not consume an index.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sentences = texts
            .into_iter()
            .filter_map(|t| {
                let trimmed = t.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .enumerate()
            .map(|(index, text)| Sentence { text, index })
            .collect();
        Self { sentences }
    }

    /// Number of sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// True if the sequence holds no sentences.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Sentence at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    /// Iterates in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.sentences.iter()
    }

    /// Borrowed texts in document order.
    pub fn texts(&self) -> Vec<&str> {
        self.sentences.iter().map(Sentence::text).collect()
    }

    /// Consumes the sequence, returning owned texts.
    pub fn into_texts(self) -> Vec<String> {
        self.sentences.into_iter().map(|s| s.text).collect()
    }
}

impl Index<usize> for SentenceSequence {
    type Output = Sentence;

    fn index(&self, index: usize) -> &Self::Output {
        &self.sentences[index]
    }
}

impl<'a> IntoIterator for &'a SentenceSequence {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_texts_trims_and_indexes() {
        let seq = SentenceSequence::from_texts(["  first ", "", "   ", "second"]);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq[0].text(), "first");
        assert_eq!(seq[1].text(), "second");
        assert_eq!(seq[1].index(), 1);
    }

    #[test]
    fn test_char_len_counts_scalars() {
        assert_eq!(char_len("café"), 4);
        assert_eq!(char_len("강의"), 2);
    }

    #[test]
    fn test_json_is_plain_list() {
        let seq = SentenceSequence::from_texts(["a b", "c d"]);
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, r#"[{"text":"a b","index":0},{"text":"c d","index":1}]"#);
    }
}
