//! Extraction of the subtrees rooted at relevant frames.

use super::merge::merge;
use super::pattern::RelevantPattern;
use crate::tree::{SampleNode, SampleTree};
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Pull every subtree whose root frame matches `pattern` up to the top level.
///
/// A matching frame is taken whole and not searched further. A non-matching
/// frame is dropped and its callees are searched instead. Matches sharing a
/// label are merged. The returned root has a count of 0.
pub fn extract_relevant(pattern: &RelevantPattern, tree: SampleTree) -> SampleTree {
    let mut relevant = HashMap::new();
    collect_relevant(pattern, tree.into_root(), &mut relevant);

    debug!(
        "Extracted {} relevant root(s) for pattern {}",
        relevant.len(),
        pattern
    );

    SampleTree::from_root(SampleNode {
        calls: relevant,
        samples: 0,
    })
}

fn collect_relevant(
    pattern: &RelevantPattern,
    node: SampleNode,
    relevant: &mut HashMap<String, SampleNode>,
) {
    for (label, child) in node.calls {
        if !pattern.is_match(&label) {
            collect_relevant(pattern, child, relevant);
            continue;
        }

        match relevant.entry(label) {
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

    fn pattern(p: &str) -> RelevantPattern {
        RelevantPattern::new(p).unwrap()
    }

    #[test]
    fn test_nested_match_is_merged_with_shallow_match() {
        let mut tree = SampleTree::new();
        tree.insert(["A"]);
        tree.insert(["A"]);
        tree.insert(["X", "A"]);

        let result = extract_relevant(&pattern("A"), tree);

        assert_eq!(result.root().samples, 0);
        assert_eq!(result.root().calls.len(), 1);
        assert_eq!(result.root().call("A").unwrap().samples, 3);
    }

    #[test]
    fn test_matched_subtree_is_kept_whole() {
        let mut tree = SampleTree::new();
        tree.insert(["main", "run", "step", "run", "leaf"]);

        let result = extract_relevant(&pattern("run"), tree);

        // the inner "run" stays inside the outer one
        let expected = SampleNode::new(0).with_call(
            "run",
            SampleNode::new(0).with_call(
                "step",
                SampleNode::new(0)
                    .with_call("run", SampleNode::new(0).with_call("leaf", SampleNode::new(1))),
            ),
        );
        assert_eq!(result.root(), &expected);
    }

    #[test]
    fn test_no_match_yields_empty_root() {
        let mut tree = SampleTree::new();
        tree.insert(["main", "work"]);

        let result = extract_relevant(&pattern("nothing"), tree);

        assert!(result.is_empty());
    }

    #[test]
    fn test_distinct_labels_stay_separate() {
        let mut tree = SampleTree::new();
        tree.insert(["main", "task-1", "io"]);
        tree.insert(["main", "task-2", "cpu"]);
        tree.insert(["other", "task-1", "cpu"]);

        let result = extract_relevant(&pattern("task-.*"), tree);

        let task1 = result.root().call("task-1").unwrap();
        let task2 = result.root().call("task-2").unwrap();
        assert_eq!(result.root().calls.len(), 2);
        assert_eq!(task1.calls.len(), 2);
        assert_eq!(task1.call("io").unwrap().samples, 1);
        assert_eq!(task1.call("cpu").unwrap().samples, 1);
        assert_eq!(task2.call("cpu").unwrap().samples, 1);
    }
}
