//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Compiles the relevant-frame pattern
//! 2. Reads a captured sample file
//! 3. Extracts relevant subtrees and propagates counts
//! 4. Writes the ordered view as JSON (file or stdout)
//! 5. Optionally renders a flamegraph and a text summary

use crate::analysis::{analyze, ordered_view, RelevantPattern};
use crate::flamegraph::{generate_flamegraph, generate_text_summary, FlamegraphConfig};
use crate::output::{read_tree, write_json, write_svg, write_tree};
use crate::utils::config::DEFAULT_RELEVANT_PATTERN;
use anyhow::{Context, Result};
use log::{debug, info};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Failure classes the front-end maps to exit statuses
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Must specify file")]
    MissingInput,

    #[error(transparent)]
    Processing(#[from] anyhow::Error),
}

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Captured sample file
    pub input: Option<PathBuf>,

    /// Output path for the ordered JSON report (stdout when `None` or empty)
    pub output: Option<PathBuf>,

    /// Regular expression selecting relevant root frames
    pub pattern: String,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Flamegraph configuration
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Print text summary
    pub print_summary: bool,

    /// Number of rows in the text summary
    pub top_paths: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            pattern: DEFAULT_RELEVANT_PATTERN.to_string(),
            output_svg: None,
            flamegraph_config: None,
            print_summary: false,
            top_paths: 20,
        }
    }
}

/// What an analyze run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeOutcome {
    /// Samples under the relevant roots
    pub relevant_samples: u64,

    /// Number of distinct relevant roots
    pub relevant_roots: usize,
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<(), AnalyzeError> {
    match &args.input {
        Some(path) if !path.as_os_str().is_empty() => {}
        _ => return Err(AnalyzeError::MissingInput),
    }

    if args.top_paths == 0 {
        return Err(anyhow::anyhow!("top_paths must be greater than 0").into());
    }

    if let Some(config) = &args.flamegraph_config {
        if config.width == 0 {
            return Err(anyhow::anyhow!("flamegraph width must be greater than 0").into());
        }
    }

    Ok(())
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * `AnalyzeError::MissingInput` - no input file given
/// * `AnalyzeError::Processing` - bad pattern, unreadable input, or write failure
pub fn execute_analyze(args: AnalyzeArgs) -> Result<AnalyzeOutcome, AnalyzeError> {
    validate_args(&args)?;
    Ok(run_analyze(args)?)
}

fn run_analyze(args: AnalyzeArgs) -> Result<AnalyzeOutcome> {
    let start_time = Instant::now();
    let input = args.input.unwrap_or_default();
    // an empty output path means stdout
    let output = args.output.filter(|path| !path.as_os_str().is_empty());

    // Pattern first: a bad expression must fail before any file work
    let pattern = RelevantPattern::new(&args.pattern)
        .with_context(|| format!("Invalid relevant pattern {:?}", args.pattern))?;

    info!("Step 1/3: Reading samples from {}", input.display());
    let tree = read_tree(&input)
        .with_context(|| format!("Failed to read samples from {}", input.display()))?;

    info!("Step 2/3: Extracting frames matching {}", pattern);
    let analyzed = analyze(&pattern, tree);
    let view = ordered_view(analyzed.root()).context("Failed to order analyzed samples")?;

    let outcome = AnalyzeOutcome {
        relevant_samples: view.calls.iter().map(|(_, node)| node.samples).sum(),
        relevant_roots: view.calls.len(),
    };
    debug!(
        "{} relevant roots, {} samples",
        outcome.relevant_roots, outcome.relevant_samples
    );

    info!("Step 3/3: Writing report...");
    match &output {
        Some(path) => {
            write_tree(&view, path).context("Failed to write report JSON")?;
            info!("✓ Report written to: {}", path.display());
        }
        None => {
            write_json(&view, io::stdout().lock()).context("Failed to write report to stdout")?;
        }
    }

    if let Some(svg_path) = &args.output_svg {
        let svg = generate_flamegraph(&view, args.flamegraph_config.as_ref())
            .context("Failed to generate flamegraph")?;
        write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    if args.print_summary {
        let summary = generate_text_summary(&view, args.top_paths);
        // keep stdout clean when it carries the JSON report
        if output.is_some() {
            println!("\n{}", summary);
        } else {
            eprintln!("\n{}", summary);
        }
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(outcome)
}
