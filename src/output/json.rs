//! JSON input/output for sample trees and ordered reports.
//!
//! Both use the recursive `{ "calls": {...}, "samples": n }` schema,
//! pretty-printed.

use crate::tree::SampleTree;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Serialize `value` as pretty JSON into `writer` and flush it
///
/// # Errors
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::WriteFailed` - I/O error during write or flush
pub fn write_json<T, W>(value: &T, mut writer: W) -> Result<(), OutputError>
where
    T: Serialize + ?Sized,
    W: Write,
{
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| {
        if e.is_io() {
            OutputError::WriteFailed(e.into())
        } else {
            OutputError::SerializationFailed(e)
        }
    })?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a serializable tree (raw or ordered) to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `value` - `SampleTree` or `OrderedNode` to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_tree<T>(value: &T, output_path: impl AsRef<Path>) -> Result<(), OutputError>
where
    T: Serialize + ?Sized,
{
    let output_path = output_path.as_ref();

    info!("Writing samples to: {}", output_path.display());

    validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    write_json(value, BufWriter::new(file))?;

    info!(
        "Samples written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a captured sample tree from a JSON file
///
/// # Errors
/// * `OutputError::ReadFailed` - File cannot be opened
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_tree(input_path: impl AsRef<Path>) -> Result<SampleTree, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading samples from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let tree: SampleTree = serde_json::from_reader(BufReader::new(file))?;

    debug!(
        "Samples loaded: {} samples across {} frames",
        tree.total_samples(),
        tree.node_count()
    );

    Ok(tree)
}

/// Validate that an output path is writable
///
/// **Public** - shared with the SVG writer
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
