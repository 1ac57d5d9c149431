//! Bottom-up propagation of sample counts.

use crate::tree::{SampleNode, SampleTree};

/// Turn own-only counts into cumulative counts, children before parents.
///
/// Precondition: `node` has not been propagated yet. Running this twice
/// counts every sample again.
pub fn propagate_counts(node: &mut SampleNode) {
    let mut below = 0;
    for child in node.calls.values_mut() {
        propagate_counts(child);
        below += child.samples;
    }
    node.samples += below;
}

/// Propagate counts under every top-level frame; the unlabelled root keeps
/// its own count.
///
/// Same precondition as [`propagate_counts`].
pub fn propagate_tree(tree: &mut SampleTree) {
    for child in tree.root_mut().calls.values_mut() {
        propagate_counts(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_propagate_tree_keeps_root() {
        let mut tree = SampleTree::new();
        tree.insert(["A", "B"]);
        tree.insert(["A", "B"]);
        tree.insert(["A", "C"]);

        propagate_tree(&mut tree);

        let a = tree.root().call("A").unwrap();
        assert_eq!(tree.root().samples, 0);
        assert_eq!(a.samples, 3);
        assert_eq!(a.call("B").unwrap().samples, 2);
        assert_eq!(a.call("C").unwrap().samples, 1);
    }

    #[test]
    fn test_propagate_counts_on_root_totals_everything() {
        let mut tree = SampleTree::new();
        tree.insert(["A", "B"]);
        tree.insert(["A"]);
        tree.insert(["C"]);
        let inserted = tree.total_samples();

        let mut root = tree.into_root();
        propagate_counts(&mut root);

        assert_eq!(root.samples, inserted);
        // own count 1 + B's 1
        assert_eq!(root.call("A").unwrap().samples, 2);
    }

    #[test]
    fn test_propagate_leaf_is_unchanged() {
        let mut leaf = SampleNode::new(7);
        propagate_counts(&mut leaf);
        assert_eq!(leaf, SampleNode::new(7));
    }
}
