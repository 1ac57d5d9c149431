use crate::output::read_tree;
use crate::utils::config::{SAMPLE_FILE_PREFIX, SAMPLE_FILE_SUFFIX};
use anyhow::Result;
use std::path::PathBuf;

/// Statistics printed by the validate command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFileStats {
    pub total_samples: u64,
    pub frames: usize,
    pub max_depth: usize,
    pub top_level_frames: usize,
}

/// Validate a captured sample file
pub fn validate_sample_file(file_path: PathBuf) -> Result<SampleFileStats> {
    println!("Validating samples: {}", file_path.display());

    let tree = read_tree(&file_path)?;
    let stats = SampleFileStats {
        total_samples: tree.total_samples(),
        frames: tree.node_count(),
        max_depth: tree.max_depth(),
        top_level_frames: tree.root().calls.len(),
    };

    println!("✓ Valid sample JSON");
    println!("  Samples: {}", stats.total_samples);
    println!("  Frames: {}", stats.frames);
    println!("  Max Depth: {}", stats.max_depth);
    println!("  Top-level Frames: {}", stats.top_level_frames);
    if tree.root().samples > 0 {
        println!("  Note: {} samples had an empty stack", tree.root().samples);
    }

    Ok(stats)
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("{}", schema_description(show_details));
}

/// Text printed by the schema command
pub fn schema_description(show_details: bool) -> String {
    let mut lines = vec!["Stack Sampler File Schema".to_string(), String::new()];

    if show_details {
        lines.push("Schema Structure (recursive):".to_string());
        lines.push(
            "  Element := { \"calls\": { <frame>: Element, ... }, \"samples\": <integer> }"
                .to_string(),
        );
        lines.push(String::new());
        lines.push("  calls: object    - Callees keyed by frame label".to_string());
        lines.push(
            "  samples: number  - Captured files: stacks ending exactly at this frame".to_string(),
        );
        lines.push("                     Reports: all stacks passing through this frame".to_string());
        lines.push(String::new());
        lines.push("The root element is unlabelled and its samples are 0.".to_string());
        lines.push("Reports list calls by descending samples, then by label.".to_string());
        lines.push(format!(
            "Captured files are named {}<epoch millis>{}",
            SAMPLE_FILE_PREFIX, SAMPLE_FILE_SUFFIX
        ));
    } else {
        lines.push("Use --show for detailed schema information".to_string());
    }

    lines.join("\n")
}

/// Display version information
pub fn display_version() {
    println!("Stack Sampler v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("A lightweight sampling profiler and call-tree analyzer.");
}
