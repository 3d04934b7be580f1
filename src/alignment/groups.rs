//! Transcript sentences grouped by slide segment.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alignment::SlideAssignment;
use crate::error::{AlignError, Result};
use crate::segmentation::SentenceSequence;

/// The transcript sentences of one segment, in transcript order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideGroup {
    /// 0-based segment index.
    pub segment: usize,
    /// Member sentences.
    pub sentences: Vec<String>,
}

impl SlideGroup {
    /// 1-based number used for display.
    pub fn number(&self) -> usize {
        self.segment + 1
    }

    /// Member sentences joined with single spaces.
    pub fn text(&self) -> String {
        self.sentences.join(" ")
    }
}

/// All segments of an assignment, ordered by segment index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideGroups {
    groups: Vec<SlideGroup>,
}

impl SlideGroups {
    /// Groups `transcript` by the segment indices of `assignment`.
    ///
    /// Every sentence lands in exactly one group and relative order is kept.
    pub fn from_assignment(
        transcript: &SentenceSequence,
        assignment: &SlideAssignment,
    ) -> Result<Self> {
        if transcript.len() != assignment.len() {
            return Err(AlignError::DimensionMismatch {
                expected: transcript.len(),
                actual: assignment.len(),
            });
        }

        let mut by_segment: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (sentence, &segment) in transcript.iter().zip(assignment.segment_indices()) {
            by_segment
                .entry(segment)
                .or_default()
                .push(sentence.text().to_string());
        }

        Ok(Self {
            groups: by_segment
                .into_iter()
                .map(|(segment, sentences)| SlideGroup { segment, sentences })
                .collect(),
        })
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The group for a 0-based segment index.
    pub fn get(&self, segment: usize) -> Option<&SlideGroup> {
        self.groups.iter().find(|g| g.segment == segment)
    }

    /// Iterates groups in segment order.
    pub fn iter(&self) -> std::slice::Iter<'_, SlideGroup> {
        self.groups.iter()
    }

    /// 1-based segment number to space-joined text.
    pub fn numbered_texts(&self) -> BTreeMap<usize, String> {
        self.groups.iter().map(|g| (g.number(), g.text())).collect()
    }
}

impl<'a> IntoIterator for &'a SlideGroups {
    type Item = &'a SlideGroup;
    type IntoIter = std::slice::Iter<'a, SlideGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl fmt::Display for SlideGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            writeln!(f, "Slide {}:", group.number())?;
            writeln!(f, "{}", group.text())?;
            writeln!(f)?;
        }
        Ok(())
    }
}
