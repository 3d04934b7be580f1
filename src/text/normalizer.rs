//! Character-level normalization ahead of sentence splitting.

use crate::config::{CharacterSet, TextConfig};
use unicode_normalization::UnicodeNormalization;

/// Punctuation that survives normalization.
pub const KEPT_PUNCTUATION: [char; 5] = ['.', ',', ';', '?', '!'];

/// Strips every character outside the configured allow-list.
///
/// Letters and digits (per [`CharacterSet`]), whitespace and
/// [`KEPT_PUNCTUATION`] are kept; everything else is removed outright,
/// without inserting a replacement space.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    character_set: CharacterSet,
}

impl Normalizer {
    /// Creates a new normalizer with the given configuration.
    pub fn new(config: &TextConfig) -> Self {
        Self {
            character_set: config.character_set,
        }
    }

    /// Creates a normalizer for a specific character set.
    pub fn with_character_set(character_set: CharacterSet) -> Self {
        Self { character_set }
    }

    /// Returns true if `c` is kept.
    #[inline]
    pub fn is_allowed(&self, c: char) -> bool {
        let word_char = match self.character_set {
            CharacterSet::Ascii => c.is_ascii_alphanumeric(),
            CharacterSet::Unicode => c.is_alphanumeric(),
        };
        word_char || c.is_whitespace() || KEPT_PUNCTUATION.contains(&c)
    }

    /// Normalizes a whole document.
    pub fn normalize(&self, text: &str) -> String {
        match self.character_set {
            CharacterSet::Ascii => text.chars().filter(|&c| self.is_allowed(c)).collect(),
            // Compose first so base letters and their accents stay together.
            CharacterSet::Unicode => text.nfc().filter(|&c| self.is_allowed(c)).collect(),
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&TextConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_symbols() {
        let normalizer = Normalizer::default();
        assert_eq!(
            normalizer.normalize("Hello (world)! It's 100% \"done\"."),
            "Hello world! Its 100 done."
        );
    }

    #[test]
    fn test_keeps_allowed_punctuation() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize("a, b; c? d! e."), "a, b; c? d! e.");
    }

    #[test]
    fn test_ascii_drops_non_ascii_letters() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize("café 강의"), "caf ");
    }

    #[test]
    fn test_unicode_keeps_letters() {
        let normalizer = Normalizer::with_character_set(CharacterSet::Unicode);
        // decomposed e + combining acute composes to a single letter
        assert_eq!(normalizer.normalize("cafe\u{301} 강의!"), "café 강의!");
    }

    #[test]
    fn test_empty() {
        assert_eq!(Normalizer::default().normalize(""), "");
        assert_eq!(Normalizer::default().normalize("@#$%"), "");
    }
}
