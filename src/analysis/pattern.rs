//! Relevant-frame filter patterns.

use crate::utils::config::DEFAULT_RELEVANT_PATTERN;
use crate::utils::error::AnalysisError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// A regular expression that must match a whole frame label
#[derive(Debug, Clone)]
pub struct RelevantPattern {
    source: String,
    regex: Regex,
}

impl RelevantPattern {
    /// Compile `pattern`; it is anchored at both ends.
    ///
    /// # Errors
    /// * `AnalysisError::InvalidPattern` - malformed expression
    pub fn new(pattern: &str) -> Result<Self, AnalysisError> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern selecting processor-trigger frames
    pub fn default_pattern() -> Result<Self, AnalysisError> {
        Self::new(DEFAULT_RELEVANT_PATTERN)
    }

    pub fn is_match(&self, label: &str) -> bool {
        self.regex.is_match(label)
    }

    /// The expression as given, without anchors
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for RelevantPattern {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for RelevantPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
