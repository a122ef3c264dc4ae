//! Pattern-based issue detection

use crate::rules::{RemediationRule, RULES};
use async_trait::async_trait;
use codemend_pipeline::{Analyzer, CollabError};
use codemend_state::Issue;
use std::path::Path;

/// Detects issues by matching the shared rule table line by line.
///
/// Pure with respect to its inputs: the same path and content always yield
/// the same issue sequence, ordered by line and then by rule order.
#[derive(Debug, Default)]
pub struct PatternAnalyzer;

impl PatternAnalyzer {
    /// Create an analyzer over the built-in rule table.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn issue_for(rule: &RemediationRule, path: &Path, line_number: u32) -> Issue {
        let mut issue =
            Issue::new(path, rule.description, rule.severity).at_line(line_number);
        if let Some((find, replace)) = rule.replacement {
            issue = issue.with_suggestion(format!("replace `{find}` with `{replace}`"));
        }
        issue
    }
}

#[async_trait]
impl Analyzer for PatternAnalyzer {
    async fn analyze(&self, file_path: &Path, content: &str) -> Result<Vec<Issue>, CollabError> {
        let mut issues = Vec::new();

        for (index, line) in content.lines().enumerate() {
            for rule in RULES {
                if rule.pattern.is_match(line) {
                    issues.push(Self::issue_for(rule, file_path, index as u32 + 1));
                }
            }
        }

        tracing::debug!(file = %file_path.display(), count = issues.len(), "pattern analysis done");
        Ok(issues)
    }
}
