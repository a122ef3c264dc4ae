//! Rule-based fix generation and application

use crate::rules::RULES;
use async_trait::async_trait;
use codemend_pipeline::{CollabError, Fixer};
use codemend_state::{Fix, FixKind, Issue};
use std::path::{Path, PathBuf};

/// Where rewritten content lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPolicy {
    /// Overwrite the source file in place.
    InPlace,
    /// Write a sibling file with this suffix before the extension,
    /// e.g. `app.py` becomes `app_fixed.py`.
    Sibling(String),
}

/// Proposes and applies substring-replacement fixes from the shared rule
/// table.
///
/// Generation anchors each fix against the cached content: a rule only
/// yields a fix for a file when its snippet is actually present and at
/// least one reported issue references the rule. Application replaces
/// every occurrence of a fix's anchor snippet; a stale anchor is skipped
/// silently.
#[derive(Debug)]
pub struct RuleFixer {
    policy: OutputPolicy,
}

impl RuleFixer {
    /// A fixer that overwrites files in place.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: OutputPolicy::InPlace,
        }
    }

    /// A fixer that writes `_fixed` sibling files instead of overwriting.
    #[must_use]
    pub fn with_sibling_output(suffix: impl Into<String>) -> Self {
        Self {
            policy: OutputPolicy::Sibling(suffix.into()),
        }
    }
}

impl Default for RuleFixer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fixer for RuleFixer {
    async fn generate(
        &self,
        file_path: &Path,
        content: &str,
        issues: &[Issue],
    ) -> Result<Vec<Fix>, CollabError> {
        let mut fixes = Vec::new();

        for rule in RULES {
            let Some((find, replace)) = rule.replacement else {
                continue;
            };
            let referenced = issues.iter().any(|i| i.description == rule.description);
            if referenced && content.contains(find) {
                fixes.push(Fix::replace(file_path, find, replace, rule.description));
            }
        }

        Ok(fixes)
    }

    async fn apply(
        &self,
        file_path: &Path,
        content: &str,
        fixes: &[Fix],
    ) -> Result<(String, Vec<String>), CollabError> {
        let mut current = content.to_string();
        let mut change_log = Vec::new();

        for fix in fixes {
            match fix.kind {
                FixKind::Replace => {
                    let (Some(original), Some(fixed)) = (&fix.original_code, &fix.fixed_code)
                    else {
                        continue;
                    };
                    if current.contains(original.as_str()) {
                        current = current.replace(original.as_str(), fixed);
                        change_log.push(format!(
                            "Fixed {} in {}",
                            fix.explanation,
                            file_path.display()
                        ));
                    }
                }
                FixKind::Delete => {
                    let Some(original) = &fix.original_code else {
                        continue;
                    };
                    if current.contains(original.as_str()) {
                        current = current.replace(original.as_str(), "");
                        change_log.push(format!(
                            "Removed {} in {}",
                            fix.explanation,
                            file_path.display()
                        ));
                    }
                }
                // Insertion needs an anchor this fixer does not model.
                FixKind::Insert => continue,
            }
        }

        Ok((current, change_log))
    }

    fn output_path(&self, source: &Path) -> PathBuf {
        match &self.policy {
            OutputPolicy::InPlace => source.to_path_buf(),
            OutputPolicy::Sibling(suffix) => {
                let stem = source
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default();
                let name = match source.extension().and_then(|e| e.to_str()) {
                    Some(ext) => format!("{stem}{suffix}.{ext}"),
                    None => format!("{stem}{suffix}"),
                };
                source.with_file_name(name)
            }
        }
    }
}
