//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors surfaced by the sampler lifecycle
#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("Invalid state transition: sampler is already running")]
    AlreadyRunning,

    #[error("Invalid state transition: sampler is already stopped")]
    AlreadyStopped,

    #[error("Failed to flush samples to {name}: {source}")]
    FlushFailed {
        name: String,
        #[source]
        source: OutputError,
    },

    #[error("Failed to spawn sampling thread: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Sampling thread panicked; samples were lost")]
    WorkerPanicked,
}

impl SamplerError {
    /// True for double start / double stop
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, SamplerError::AlreadyRunning | SamplerError::AlreadyStopped)
    }
}

/// Errors raised while capturing a single thread's stack.
///
/// These never abort a sampling cycle; the thread is skipped until the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Thread exited before its stack could be read")]
    ThreadExited,

    #[error("Stack unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during tree analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid relevant-frame pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

/// Errors that can occur during file input/output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("No samples to render")]
    EmptyTree,
}
