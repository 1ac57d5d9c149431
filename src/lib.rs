//! Stack Sampler
//!
//! A lightweight sampling profiler. A background thread periodically
//! snapshots every live thread's call stack into a prefix tree keyed by
//! frame label; the tree is written out as JSON when sampling stops.
//! The analysis side later loads such a file, extracts the subtrees rooted
//! at relevant frames, propagates counts and produces a frequency-sorted
//! report (JSON, flamegraph SVG or text).
//!
//! ## Getting Started
//!
//! ```ignore
//! use stack_sampler::sampler::{FrameRegistry, Sampler};
//! use stack_sampler::utils::config::SamplerConfig;
//!
//! let registry = FrameRegistry::new();
//! let sampler = Sampler::from_config(&SamplerConfig::default(), registry.clone());
//! sampler.start()?;
//! // ... instrumented work using registry.register() / handle.enter(..)
//! let file_name = sampler.stop()?;
//! ```
//!
//! Captured files are analyzed with the CLI:
//!
//! ```bash
//! stack-sampler analyze -i benchmarks/performance-sample-1700000000000.json -p 'worker::.*'
//! ```

pub mod analysis;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod sampler;
pub mod tree;
pub mod utils;
