//! Read-only, frequency-sorted projection of a sample tree.
//!
//! Siblings are sorted by descending count, ties broken by ascending label.
//! This is the form written out for people to read; it serializes with the
//! same schema as [`SampleNode`] but with `calls` emitted in sorted order.

use crate::tree::SampleNode;
use crate::utils::error::AnalysisError;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// A node of the ordered view, borrowing labels from the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedNode<'a> {
    pub samples: u64,
    pub calls: Vec<(&'a str, OrderedNode<'a>)>,
}

impl<'a> OrderedNode<'a> {
    /// Labels of the direct callees, in view order
    pub fn labels(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.calls.iter().map(|(label, _)| *label)
    }

    pub fn call(&self, label: &str) -> Option<&OrderedNode<'a>> {
        self.calls
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, node)| node)
    }
}

/// Build the ordered view of `node` without touching it.
///
/// # Errors
/// * `AnalysisError::InternalInvariantViolation` - two siblings share a label,
///   which means the tree was built wrong; callers should not try to recover
pub fn ordered_view(node: &SampleNode) -> Result<OrderedNode<'_>, AnalysisError> {
    order_calls(
        node.samples,
        node.calls.iter().map(|(label, child)| (label.as_str(), child)),
    )
}

fn order_calls<'a, I>(samples: u64, calls: I) -> Result<OrderedNode<'a>, AnalysisError>
where
    I: Iterator<Item = (&'a str, &'a SampleNode)>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    for (label, child) in calls {
        if !seen.insert(label) {
            return Err(AnalysisError::InternalInvariantViolation(format!(
                "duplicate frame label {:?} among siblings",
                label
            )));
        }
        ordered.push((label, ordered_view(child)?));
    }

    ordered.sort_by(|(label_a, a), (label_b, b)| {
        b.samples.cmp(&a.samples).then_with(|| label_a.cmp(label_b))
    });

    Ok(OrderedNode {
        samples,
        calls: ordered,
    })
}

impl Serialize for OrderedNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OrderedNode", 2)?;
        state.serialize_field("calls", &OrderedCalls(&self.calls))?;
        state.serialize_field("samples", &self.samples)?;
        state.end()
    }
}

struct OrderedCalls<'n, 'a>(&'n [(&'a str, OrderedNode<'a>)]);

impl Serialize for OrderedCalls<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, node) in self.0 {
            map.serialize_entry(label, node)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sorted_by_count_then_label() {
        let root = SampleNode::new(0)
            .with_call("b", SampleNode::new(5))
            .with_call("a", SampleNode::new(5))
            .with_call("z", SampleNode::new(9))
            .with_call("c", SampleNode::new(1));

        let view = ordered_view(&root).unwrap();

        assert_eq!(view.labels().collect::<Vec<_>>(), vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn test_sorting_is_recursive_and_source_untouched() {
        let root = SampleNode::new(0).with_call(
            "A",
            SampleNode::new(3)
                .with_call("y", SampleNode::new(1))
                .with_call("x", SampleNode::new(2)),
        );
        let before = root.clone();

        let view = ordered_view(&root).unwrap();

        let a = view.call("A").unwrap();
        assert_eq!(a.samples, 3);
        assert_eq!(a.labels().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(root, before);
    }

    #[test]
    fn test_duplicate_sibling_is_invariant_violation() {
        let child = SampleNode::new(1);
        let calls = vec![("dup", &child), ("dup", &child)];

        let result = order_calls(0, calls.into_iter());

        assert!(matches!(
            result,
            Err(AnalysisError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn test_serialized_order_follows_view() {
        let root = SampleNode::new(0)
            .with_call("low", SampleNode::new(1))
            .with_call("high", SampleNode::new(10))
            .with_call("mid", SampleNode::new(5));

        let json = serde_json::to_string(&ordered_view(&root).unwrap()).unwrap();

        let high = json.find("\"high\"").unwrap();
        let mid = json.find("\"mid\"").unwrap();
        let low = json.find("\"low\"").unwrap();
        assert!(high < mid && mid < low);
        assert!(json.starts_with("{\"calls\":{"));
        assert!(json.ends_with("\"samples\":0}"));
    }
}
