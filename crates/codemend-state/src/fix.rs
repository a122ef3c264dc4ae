//! Proposed textual fixes
//!
//! A [`Fix`] is one proposed transformation of one file, produced by the
//! fixer collaborator from a group of issues. Only `Replace` fixes carry
//! both the original and the corrected snippet; the other kinds keep the
//! unused side as `None` rather than an empty string.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of textual transformation a fix performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixKind {
    /// Replace `original_code` with `fixed_code`.
    Replace,
    /// Insert `fixed_code`.
    Insert,
    /// Delete `original_code`.
    Delete,
}

/// One proposed transformation of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// File the fix targets. Must be a path that was present in the scan
    /// snapshot when the fix was generated.
    pub file_path: PathBuf,
    /// Kind of transformation.
    pub kind: FixKind,
    /// Snippet to find, for `Replace` and `Delete`.
    pub original_code: Option<String>,
    /// Snippet to write, for `Replace` and `Insert`.
    pub fixed_code: Option<String>,
    /// Why the change is needed.
    pub explanation: String,
}

impl Fix {
    /// A replacement of one exact snippet by another.
    #[must_use]
    pub fn replace(
        file_path: impl Into<PathBuf>,
        original: impl Into<String>,
        fixed: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            kind: FixKind::Replace,
            original_code: Some(original.into()),
            fixed_code: Some(fixed.into()),
            explanation: explanation.into(),
        }
    }

    /// An insertion of a new snippet.
    #[must_use]
    pub fn insert(
        file_path: impl Into<PathBuf>,
        fixed: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            kind: FixKind::Insert,
            original_code: None,
            fixed_code: Some(fixed.into()),
            explanation: explanation.into(),
        }
    }

    /// A deletion of an existing snippet.
    #[must_use]
    pub fn delete(
        file_path: impl Into<PathBuf>,
        original: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            kind: FixKind::Delete,
            original_code: Some(original.into()),
            fixed_code: None,
            explanation: explanation.into(),
        }
    }
}
