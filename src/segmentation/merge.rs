//! Dropping short fragments and merging neighbours into sentence units.
//!
//! Both strategies make a single forward pass. Fragments shorter than the
//! minimum are removed before any merging, so they never reach the output.
//! A lone fragment longer than the maximum is passed through unchanged.

use crate::config::MergeStrategy;
use crate::segmentation::sentence::char_len;

/// A merge accumulator: text plus its cached char length.
#[derive(Debug)]
struct Unit {
    text: String,
    len: usize,
}

impl Unit {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            len: char_len(text),
        }
    }

    /// Length after appending `other` with one separating space.
    #[inline]
    fn joined_len(&self, other: &Unit) -> usize {
        self.len + 1 + other.len
    }

    fn append(&mut self, other: Unit) {
        self.text.push(' ');
        self.text.push_str(&other.text);
        self.len += 1 + other.len;
    }
}

/// Merges trimmed fragments with the given strategy.
pub fn merge_fragments<S: AsRef<str>>(
    fragments: &[S],
    min_length: usize,
    max_length: usize,
    strategy: MergeStrategy,
) -> Vec<String> {
    let units = fragments
        .iter()
        .map(|f| f.as_ref().trim())
        .filter(|f| !f.is_empty())
        .map(Unit::new)
        .filter(|u| u.len >= min_length);

    let merged = match strategy {
        MergeStrategy::Forward => merge_forward(units, max_length),
        MergeStrategy::ShortNeighbour { short_length } => {
            merge_short_neighbour(units, short_length, max_length)
        }
    };

    merged.into_iter().map(|u| u.text).collect()
}

fn merge_forward(units: impl Iterator<Item = Unit>, max_length: usize) -> Vec<Unit> {
    let (mut emitted, current) = units.fold(
        (Vec::new(), None::<Unit>),
        |(mut emitted, current), unit| match current {
            Some(mut acc) if acc.joined_len(&unit) <= max_length => {
                acc.append(unit);
                (emitted, Some(acc))
            }
            Some(acc) => {
                emitted.push(acc);
                (emitted, Some(unit))
            }
            None => (emitted, Some(unit)),
        },
    );
    emitted.extend(current);
    emitted
}

fn merge_short_neighbour(
    units: impl Iterator<Item = Unit>,
    short_length: usize,
    max_length: usize,
) -> Vec<Unit> {
    let mut units = units.peekable();
    let mut emitted: Vec<Unit> = Vec::new();

    while let Some(mut current) = units.next() {
        while current.len <= short_length {
            match units.next_if(|next| current.joined_len(next) <= max_length) {
                Some(next) => current.append(next),
                None => break,
            }
        }

        if current.len <= short_length {
            if let Some(previous) = emitted.last_mut() {
                if previous.joined_len(&current) <= max_length {
                    previous.append(current);
                    continue;
                }
            }
        }

        emitted.push(current);
    }

    emitted
}
