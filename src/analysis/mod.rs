//! Offline analysis of captured sample trees.
//!
//! The pipeline works on a fully loaded tree:
//! - Extract the subtrees rooted at relevant frames (merging duplicates)
//! - Propagate counts bottom-up so every frame carries its cumulative total
//! - Project into a frequency-sorted view for output

pub mod counts;
pub mod extract;
pub mod merge;
pub mod ordered;
pub mod pattern;

// Re-export main types and functions
pub use counts::{propagate_counts, propagate_tree};
pub use extract::extract_relevant;
pub use merge::merge;
pub use ordered::{ordered_view, OrderedNode};
pub use pattern::RelevantPattern;

use crate::tree::SampleTree;
use log::debug;

/// Extract relevant subtrees and turn their counts cumulative.
///
/// Consumes the raw (own-count) tree; the result must not be propagated again.
/// The unlabelled root keeps a count of 0 instead of the relevant total; sum
/// the top-level counts when the total is needed.
pub fn analyze(pattern: &RelevantPattern, tree: SampleTree) -> SampleTree {
    debug!(
        "Analyzing {} samples across {} frames",
        tree.total_samples(),
        tree.node_count()
    );

    let mut relevant = extract_relevant(pattern, tree);
    propagate_tree(&mut relevant);
    relevant
}
