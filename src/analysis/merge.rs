//! Deep union of two sample trees.

use crate::tree::SampleNode;
use std::collections::hash_map::Entry;

/// Fold `from` into `into`.
///
/// Counts add up node by node; subtrees only present in `from` are moved
/// over as-is. Total, and commutative/associative in the resulting counts.
pub fn merge(into: &mut SampleNode, from: SampleNode) {
    into.samples += from.samples;

    for (label, child) in from.calls {
        match into.calls.entry(label) {
            Entry::Vacant(slot) => {
                slot.insert(child);
            }
            Entry::Occupied(mut slot) => merge(slot.get_mut(), child),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_adds_counts_and_attaches_missing() {
        let mut into = SampleNode::new(1).with_call("A", SampleNode::new(2));
        let from = SampleNode::new(3)
            .with_call("A", SampleNode::new(4).with_call("B", SampleNode::new(5)))
            .with_call("C", SampleNode::new(6));

        merge(&mut into, from);

        let expected = SampleNode::new(4)
            .with_call("A", SampleNode::new(6).with_call("B", SampleNode::new(5)))
            .with_call("C", SampleNode::new(6));
        assert_eq!(into, expected);
    }

    #[test]
    fn test_merge_with_empty() {
        let original = SampleNode::new(0).with_call("A", SampleNode::new(1));
        let mut into = original.clone();
        merge(&mut into, SampleNode::default());
        assert_eq!(into, original);

        let mut empty = SampleNode::default();
        merge(&mut empty, original.clone());
        assert_eq!(empty, original);
    }
}
