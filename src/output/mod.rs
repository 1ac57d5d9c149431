//! Output writers for sample data and flamegraphs.
//!
//! This module handles reading and writing data on disk:
//! - JSON sample trees and ordered reports
//! - SVG flamegraphs

pub mod json;
pub mod svg;

// Re-export main functions
pub use json::{read_tree, validate_path, write_json, write_tree};
pub use svg::write_svg;
