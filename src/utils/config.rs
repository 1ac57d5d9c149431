//! Configuration and constants for the sampler and the CLI.

use std::path::PathBuf;
use std::time::Duration;

/// Frames treated as report roots when no pattern is given (processor triggers)
pub const DEFAULT_RELEVANT_PATTERN: &str =
    r"org\.apache\.nifi\.processor\.AbstractProcessor\.onTrigger.*";

/// Default delay between two stack snapshots
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

/// Default directory sample files are written to
pub const DEFAULT_OUTPUT_DIR: &str = "./benchmarks";

// Sample files are named "<prefix><epoch millis><suffix>"
pub const SAMPLE_FILE_PREFIX: &str = "performance-sample-";
pub const SAMPLE_FILE_SUFFIX: &str = ".json";

/// Build the sink name for a sampler stopped at `epoch_millis`
pub fn sample_file_name(epoch_millis: i64) -> String {
    format!("{}{}{}", SAMPLE_FILE_PREFIX, epoch_millis, SAMPLE_FILE_SUFFIX)
}

/// Settings for a sampler writing into a directory at a fixed interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Directory that receives `performance-sample-*.json` files
    pub output_dir: PathBuf,

    /// Delay between the starts of two sampling cycles
    pub interval: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl SamplerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_file_name() {
        assert_eq!(
            sample_file_name(1_700_000_000_123),
            "performance-sample-1700000000123.json"
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = SamplerConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("./benchmarks"));
        assert_eq!(config.interval, Duration::from_millis(50));
    }

    #[test]
    fn test_config_builders() {
        let config = SamplerConfig::new()
            .with_output_dir("/tmp/samples")
            .with_interval(Duration::from_millis(5));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/samples"));
        assert_eq!(config.interval, Duration::from_millis(5));
    }
}
