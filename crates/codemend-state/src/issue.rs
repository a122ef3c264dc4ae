//! Detected issues
//!
//! An [`Issue`] is one problem found in one source file: a deprecated call,
//! an insecure pattern, a compatibility hazard. Issues are produced by the
//! analyzer collaborator and consumed by the fix-generation stage.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How badly an issue needs fixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Stylistic or future-compat concern.
    Low,
    /// Deprecated API, will break on upgrade.
    Medium,
    /// Security problem or certain runtime failure.
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One problem detected in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// File the issue was found in.
    pub file_path: PathBuf,
    /// Human-readable description of the problem.
    pub description: String,
    /// 1-based line number, when the detector can locate one.
    pub line_number: Option<u32>,
    /// Severity classification.
    pub severity: Severity,
    /// Machine-applicable replacement suggestion, when the detector has one.
    pub suggested_fix: Option<String>,
}

impl Issue {
    /// Create an issue with the mandatory fields; optional fields via builders.
    #[must_use]
    pub fn new(
        file_path: impl Into<PathBuf>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            description: description.into(),
            line_number: None,
            severity,
            suggested_fix: None,
        }
    }

    /// With a 1-based line number.
    #[inline]
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line_number = Some(line);
        self
    }

    /// With a suggested replacement.
    #[inline]
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggested_fix = Some(suggestion.into());
        self
    }
}
