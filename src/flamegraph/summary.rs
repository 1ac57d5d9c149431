//! Plain-text summaries of an analyzed sample tree.

use crate::analysis::OrderedNode;
use serde::Serialize;

/// A frame and the samples that stopped exactly there
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotPath {
    /// Frames from the relevant root down, joined with ';'
    pub stack: String,

    /// Samples whose innermost frame is this one
    pub self_samples: u64,

    /// Share of all samples under the relevant roots
    pub percentage: f64,
}

/// Collect the `top_n` frames with the most self samples.
///
/// `view` must be count-propagated: a frame's self samples are its count
/// minus its children's counts. Ties keep ordered-view (depth-first) order.
pub fn calculate_hot_paths(view: &OrderedNode<'_>, top_n: usize) -> Vec<HotPath> {
    let total: u64 = view.calls.iter().map(|(_, node)| node.samples).sum();

    let mut paths = Vec::new();
    let mut stack = Vec::new();
    for (label, child) in &view.calls {
        collect_paths(*label, child, &mut stack, total, &mut paths);
    }

    paths.sort_by(|a, b| b.self_samples.cmp(&a.self_samples));
    paths.truncate(top_n);
    paths
}

fn collect_paths<'a>(
    label: &'a str,
    node: &OrderedNode<'a>,
    stack: &mut Vec<&'a str>,
    total: u64,
    paths: &mut Vec<HotPath>,
) {
    stack.push(label);

    let below: u64 = node.calls.iter().map(|(_, child)| child.samples).sum();
    let self_samples = node.samples.saturating_sub(below);
    if self_samples > 0 {
        paths.push(HotPath {
            stack: stack.join(";"),
            self_samples,
            percentage: percentage(self_samples, total),
        });
    }

    for (child_label, child) in &node.calls {
        collect_paths(*child_label, child, stack, total, paths);
    }

    stack.pop();
}

fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Render the relevant roots and the hottest paths as a text table
pub fn generate_text_summary(view: &OrderedNode<'_>, max_lines: usize) -> String {
    let total: u64 = view.calls.iter().map(|(_, node)| node.samples).sum();
    let mut lines = Vec::new();

    lines.push("  RELEVANT ROOTS".to_string());
    lines.push(format!("  {:<60} {:>10} {:>7}", "Frame", "Samples", "%"));
    lines.push(format!("  {}", "-".repeat(79)));
    for (label, node) in view.calls.iter().take(max_lines) {
        lines.push(format!(
            "  {:<60} {:>10} {:>6.1}%",
            truncate_stack(label, 60),
            node.samples,
            percentage(node.samples, total)
        ));
    }
    if view.calls.len() > max_lines {
        lines.push(format!(
            "   (Showing top {} of {} roots)",
            max_lines,
            view.calls.len()
        ));
    }

    lines.push(String::new());
    lines.push("  HOT PATHS (self samples)".to_string());
    lines.push(format!("  {:<60} {:>10} {:>7}", "Stack", "Samples", "%"));
    lines.push(format!("  {}", "-".repeat(79)));
    for path in calculate_hot_paths(view, max_lines) {
        lines.push(format!(
            "  {:<60} {:>10} {:>6.1}%",
            truncate_stack(&path.stack, 60),
            path.self_samples,
            path.percentage
        ));
    }

    lines.push(String::new());
    lines.push(format!("  Total samples: {}", total));

    lines.join("\n")
}

/// Keep the innermost end of long stacks
fn truncate_stack(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }
    let tail: String = s.chars().skip(len - (max_len - 3)).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ordered_view;
    use crate::tree::SampleNode;
    use pretty_assertions::assert_eq;

    fn create_test_tree() -> SampleNode {
        // cumulative: run = 2 self + 6 + 2
        SampleNode::new(0)
            .with_call(
                "run",
                SampleNode::new(10)
                    .with_call("parse", SampleNode::new(6))
                    .with_call("emit", SampleNode::new(2)),
            )
            .with_call("idle", SampleNode::new(2))
    }

    #[test]
    fn test_calculate_hot_paths() {
        let tree = create_test_tree();
        let view = ordered_view(&tree).unwrap();

        let paths = calculate_hot_paths(&view, 3);

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].stack, "run;parse");
        assert_eq!(paths[0].self_samples, 6);
        assert_eq!(paths[0].percentage, 50.0);
        let self_counts: Vec<u64> = paths.iter().map(|p| p.self_samples).collect();
        assert_eq!(self_counts, vec![6, 2, 2]);
    }

    #[test]
    fn test_hot_paths_empty() {
        let tree = SampleNode::new(0);
        let view = ordered_view(&tree).unwrap();
        assert!(calculate_hot_paths(&view, 10).is_empty());
    }

    #[test]
    fn test_text_summary() {
        let tree = create_test_tree();
        let view = ordered_view(&tree).unwrap();

        let summary = generate_text_summary(&view, 1);

        assert!(summary.contains("RELEVANT ROOTS"));
        assert!(summary.contains("(Showing top 1 of 2 roots)"));
        assert!(summary.contains("run;parse"));
        assert!(summary.contains("Total samples: 12"));
    }

    #[test]
    fn test_truncate_stack() {
        assert_eq!(truncate_stack("a;b", 10), "a;b");
        assert_eq!(truncate_stack("abcdefghij", 6), "...hij");
    }
}
