//! Stack Sampler CLI
//!
//! Analyzes call-tree sample files written by the sampler and produces
//! frequency-sorted reports, flamegraphs and text summaries.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

use stack_sampler::commands::{
    display_schema, display_version, execute_analyze, validate_sample_file, AnalyzeArgs,
    AnalyzeError,
};
use stack_sampler::flamegraph::FlamegraphConfig;
use stack_sampler::utils::config::DEFAULT_RELEVANT_PATTERN;

/// Stack Sampler - sampling profiler call-tree analysis
#[derive(Parser, Debug)]
#[command(name = "stack-sampler")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract relevant subtrees from a sample file and report them
    Analyze {
        /// The sample file to analyze
        #[arg(short = 'i', long = "file")]
        file: Option<PathBuf>,

        /// Output path for the JSON report (default: stdout)
        #[arg(short, long = "output-file")]
        output: Option<PathBuf>,

        /// Pattern selecting the frames used as report roots
        #[arg(short = 'p', long = "relevant-pattern", default_value = DEFAULT_RELEVANT_PATTERN)]
        pattern: String,

        /// Output path for an SVG flamegraph (optional)
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Print text summary
        #[arg(long)]
        summary: bool,

        /// Number of rows in the text summary
        #[arg(long, default_value = "20")]
        top_paths: usize,
    },

    /// Validate a sample JSON file
    Validate {
        /// Path to sample JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            exit_code(&e)
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze {
            file,
            output,
            pattern,
            flamegraph,
            title,
            width,
            summary,
            top_paths,
        } => {
            let fg_config = flamegraph.as_ref().map(|_| {
                let mut config = FlamegraphConfig::new().with_width(width);
                if let Some(title_str) = title {
                    config = config.with_title(title_str);
                }
                config
            });

            let args = AnalyzeArgs {
                input: file,
                output,
                pattern,
                output_svg: flamegraph,
                flamegraph_config: fg_config,
                print_summary: summary,
                top_paths,
            };

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_sample_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// 1 for a missing input file, 2 for any other failure
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<AnalyzeError>() {
        Some(AnalyzeError::MissingInput) => ExitCode::from(1),
        _ => ExitCode::from(2),
    }
}
