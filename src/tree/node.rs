//! The sample trie: frame label -> child node, plus a per-node sample count.
//!
//! Wire form (JSON, recursive):
//! `{ "calls": { "<frame>": { ... }, ... }, "samples": <n> }`
//!
//! Before aggregation a node's `samples` counts the stacks that ended exactly
//! at that frame. After `analysis::propagate_counts` it counts every stack that
//! passed through it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One position in a call stack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleNode {
    /// Callees keyed by frame label; keys are unique, order is irrelevant
    #[serde(default)]
    pub calls: HashMap<String, SampleNode>,

    /// Sample count (own-only or cumulative, see module docs)
    #[serde(default)]
    pub samples: u64,
}

impl SampleNode {
    /// Node with no callees and the given count
    pub fn new(samples: u64) -> Self {
        Self {
            calls: HashMap::new(),
            samples,
        }
    }

    /// Builder used mostly by tests and fixtures
    pub fn with_call(mut self, label: impl Into<String>, child: SampleNode) -> Self {
        self.calls.insert(label.into(), child);
        self
    }

    pub fn call(&self, label: &str) -> Option<&SampleNode> {
        self.calls.get(label)
    }

    pub fn is_leaf(&self) -> bool {
        self.calls.is_empty()
    }

    /// Sum of `samples` over this node and every descendant
    pub fn total_samples(&self) -> u64 {
        self.samples + self.calls.values().map(SampleNode::total_samples).sum::<u64>()
    }

    /// Number of descendants (this node excluded)
    pub fn node_count(&self) -> usize {
        self.calls.values().map(|c| 1 + c.node_count()).sum()
    }

    /// Length of the longest label path below this node
    pub fn max_depth(&self) -> usize {
        self.calls
            .values()
            .map(|c| 1 + c.max_depth())
            .max()
            .unwrap_or(0)
    }
}

/// Root of the trie. The root has no label; its own count is only touched by
/// an empty path.
///
/// Not synchronized. Exactly one thread may insert at a time; the sampler
/// enforces this by owning the tree inside its loop thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleTree {
    root: SampleNode,
}

impl SampleTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_root(root: SampleNode) -> Self {
        Self { root }
    }

    /// Record one stack, outermost frame first.
    ///
    /// Missing nodes are created with a count of 0; only the terminal node of
    /// the path is incremented.
    pub fn insert<I, S>(&mut self, path: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut node = &mut self.root;
        for label in path {
            node = node.calls.entry(label.as_ref().to_owned()).or_default();
        }
        node.samples += 1;
    }

    pub fn root(&self) -> &SampleNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SampleNode {
        &mut self.root
    }

    pub fn into_root(self) -> SampleNode {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_leaf() && self.root.samples == 0
    }

    pub fn total_samples(&self) -> u64 {
        self.root.total_samples()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn max_depth(&self) -> usize {
        self.root.max_depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_creates_zero_count_intermediates() {
        let mut tree = SampleTree::new();
        tree.insert(["A", "B", "C"]);

        let a = tree.root().call("A").unwrap();
        let b = a.call("B").unwrap();
        let c = b.call("C").unwrap();
        assert_eq!(tree.root().samples, 0);
        assert_eq!(a.samples, 0);
        assert_eq!(b.samples, 0);
        assert_eq!(c.samples, 1);
    }

    #[test]
    fn test_insert_shared_prefix() {
        let mut tree = SampleTree::new();
        tree.insert(["A", "B"]);
        tree.insert(["A", "B"]);
        tree.insert(["A", "C"]);

        let expected = SampleNode::new(0).with_call(
            "A",
            SampleNode::new(0)
                .with_call("B", SampleNode::new(2))
                .with_call("C", SampleNode::new(1)),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn test_insert_empty_path_counts_root() {
        let mut tree = SampleTree::new();
        tree.insert(Vec::<String>::new());
        assert_eq!(tree.root().samples, 1);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn test_insert_path_ending_at_inner_node() {
        let mut tree = SampleTree::new();
        tree.insert(["A", "B"]);
        tree.insert(["A"]);
        assert_eq!(tree.root().call("A").unwrap().samples, 1);
        assert_eq!(tree.root().call("A").unwrap().call("B").unwrap().samples, 1);
    }

    #[test]
    fn test_stats() {
        let mut tree = SampleTree::new();
        assert!(tree.is_empty());
        tree.insert(["A", "B", "C"]);
        tree.insert(["A", "D"]);
        tree.insert(["E"]);

        assert!(!tree.is_empty());
        assert_eq!(tree.total_samples(), 3);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.max_depth(), 3);
    }

    #[test]
    fn test_wire_format() {
        let mut tree = SampleTree::new();
        tree.insert(["A"]);
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "calls": { "A": { "calls": {}, "samples": 1 } },
                "samples": 0
            })
        );
    }

    #[test]
    fn test_deserialize_tolerates_missing_fields() {
        let tree: SampleTree =
            serde_json::from_str(r#"{ "calls": { "A": { "samples": 4 } } }"#).unwrap();
        assert_eq!(tree.root().samples, 0);
        assert_eq!(tree.root().call("A").unwrap().samples, 4);
        assert!(tree.root().call("A").unwrap().is_leaf());
    }
}
