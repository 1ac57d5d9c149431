//! Flamegraph and text rendering of analyzed sample trees.
//!
//! Both renderers take the ordered view of a count-propagated tree.

pub mod generator;
pub mod summary;

// Re-export main types
pub use generator::{generate_flamegraph, get_truncated_name, FlamegraphConfig};
pub use summary::{calculate_hot_paths, generate_text_summary, HotPath};
