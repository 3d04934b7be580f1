//! Similarity-based slide alignment.
//!
//! Each transcript sentence is scored against every slide sentence. Only the
//! best score matters for segmentation: whenever it drops below the threshold
//! a new slide segment starts. Segment indices therefore never decrease, and
//! their count is not bounded by the number of slides.

mod aligner;
mod groups;

pub use aligner::{align, SimilarityAligner, SlideAssignment};
pub use groups::{SlideGroup, SlideGroups};
