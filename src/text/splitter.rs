//! Splitting normalized text into raw sentence fragments.
//!
//! Two policies are provided. [`DelimiterSplitter`] cuts after every run of
//! sentence-terminal punctuation and is the default. [`RuleBasedSplitter`]
//! first protects dots that rarely end a sentence (decimals, initials,
//! dotted abbreviations, common titles) and then applies the same cut.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::SplitterKind;

/// Sentence-terminal punctuation.
pub const TERMINATORS: [char; 3] = ['.', '?', '!'];

/// Stand-in for a protected dot while splitting (ONE DOT LEADER).
const PROTECTED_DOT: char = '\u{2024}';

/// Capability that cuts text into ordered, trimmed, non-empty fragments.
pub trait SentenceSplitter: Send + Sync {
    /// Splits `text` into fragments in document order.
    fn split(&self, text: &str) -> Vec<String>;
}

/// Builds the splitter selected in the configuration.
pub fn splitter_for(kind: SplitterKind) -> Box<dyn SentenceSplitter> {
    match kind {
        SplitterKind::Delimiter => Box::new(DelimiterSplitter),
        SplitterKind::RuleBased => Box::new(RuleBasedSplitter),
    }
}

/// Cuts after each run of `.`, `?` or `!`; terminators stay on the fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimiterSplitter;

impl SentenceSplitter for DelimiterSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        split_on_terminators(text)
    }
}

fn split_on_terminators(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if TERMINATORS.contains(&c) {
            // "?!" and "..." close a single fragment
            if matches!(chars.peek(), Some(next) if TERMINATORS.contains(next)) {
                continue;
            }
            push_trimmed(&mut fragments, &current);
            current.clear();
        }
    }
    push_trimmed(&mut fragments, &current);

    fragments
}

fn push_trimmed(fragments: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        fragments.push(trimmed.to_string());
    }
}

static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<int>[0-9])\.(?P<frac>[0-9])").unwrap());

static DOTTED_ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:[A-Za-z]\.){2,}").unwrap());

static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?P<title>Mr|Mrs|Ms|Dr|Prof|Sr|Jr|St|vs|Fig|Eq|No|approx)\.").unwrap()
});

static INITIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?P<init>[A-Z])\.(?P<gap>\s+)(?P<next>[A-Z])").unwrap());

/// Delimiter splitting with protection for non-terminal dots.
///
/// Protection is heuristic: a dotted abbreviation at the very end of a
/// sentence ("... in the U.S.A. Then") keeps the following sentence attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedSplitter;

impl RuleBasedSplitter {
    fn protect(text: &str) -> String {
        let protected_dot = PROTECTED_DOT.to_string();

        let text = DECIMAL.replace_all(text, |caps: &Captures| {
            format!("{}{}{}", &caps["int"], PROTECTED_DOT, &caps["frac"])
        });
        let text = DOTTED_ABBREVIATION
            .replace_all(&text, |caps: &Captures| caps[0].replace('.', &protected_dot));
        let text = TITLE.replace_all(&text, |caps: &Captures| {
            format!("{}{}", &caps["title"], PROTECTED_DOT)
        });
        // Run twice: adjacent initials ("J. K. Rowling") overlap by one letter.
        let mut text = text.into_owned();
        for _ in 0..2 {
            text = INITIAL
                .replace_all(&text, |caps: &Captures| {
                    format!("{}{}{}{}", &caps["init"], PROTECTED_DOT, &caps["gap"], &caps["next"])
                })
                .into_owned();
        }
        text
    }
}

impl SentenceSplitter for RuleBasedSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        split_on_terminators(&Self::protect(text))
            .into_iter()
            .map(|fragment| fragment.replace(PROTECTED_DOT, "."))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_basic() {
        let fragments = DelimiterSplitter.split("Hello world. This is a test? Yes!");
        assert_eq!(fragments, vec!["Hello world.", "This is a test?", "Yes!"]);
    }

    #[test]
    fn test_delimiter_trailing_text() {
        let fragments = DelimiterSplitter.split("One. No ending punctuation here  ");
        assert_eq!(fragments, vec!["One.", "No ending punctuation here"]);
    }

    #[test]
    fn test_delimiter_terminator_runs() {
        let fragments = DelimiterSplitter.split("Wait... Really?! Ok.");
        assert_eq!(fragments, vec!["Wait...", "Really?!", "Ok."]);
    }

    #[test]
    fn test_delimiter_splits_decimals() {
        // the naive policy does not protect anything
        let fragments = DelimiterSplitter.split("Pi is 3.14 roughly.");
        assert_eq!(fragments, vec!["Pi is 3.", "14 roughly."]);
    }

    #[test]
    fn test_delimiter_empty() {
        assert!(DelimiterSplitter.split("").is_empty());
        assert!(DelimiterSplitter.split("   \n ").is_empty());
        assert!(DelimiterSplitter.split(". . .").len() == 3);
    }

    #[test]
    fn test_rule_based_decimal() {
        let fragments = RuleBasedSplitter.split("The value was 3.14159. Then it changed.");
        assert_eq!(fragments, vec!["The value was 3.14159.", "Then it changed."]);
    }

    #[test]
    fn test_rule_based_title() {
        let fragments = RuleBasedSplitter.split("Dr. Smith went to Washington. He arrived.");
        assert_eq!(fragments, vec!["Dr. Smith went to Washington.", "He arrived."]);
    }

    #[test]
    fn test_rule_based_initials() {
        let fragments = RuleBasedSplitter.split("J. K. Rowling wrote books. It was successful.");
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].starts_with("J. K. Rowling"));
    }

    #[test]
    fn test_rule_based_abbreviation() {
        let fragments = RuleBasedSplitter.split("People in the U.S.A. love freedom");
        assert_eq!(fragments, vec!["People in the U.S.A. love freedom"]);
    }

    #[test]
    fn test_splitter_for() {
        let splitter = splitter_for(SplitterKind::RuleBased);
        assert_eq!(splitter.split("It costs 2.5 dollars.").len(), 1);
        let splitter = splitter_for(SplitterKind::Delimiter);
        assert_eq!(splitter.split("It costs 2.5 dollars.").len(), 2);
    }
}
