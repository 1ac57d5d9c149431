//! Call-tree storage for captured stack samples.

pub mod node;

pub use node::{SampleNode, SampleTree};
