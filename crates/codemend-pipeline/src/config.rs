//! Pipeline configuration

use serde::{Deserialize, Serialize};

/// Tunables for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// File extensions (without the dot) the scan stage snapshots.
    pub source_extensions: Vec<String>,
    /// Wall-clock budget for each validated program execution.
    pub exec_timeout_secs: u64,
    /// Files larger than this are skipped at scan time.
    pub max_file_bytes: u64,
    /// Whether the SCM sync stage runs at all.
    pub sync_enabled: bool,
}

impl PipelineConfig {
    /// Default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different set of source extensions.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// With a different execution timeout.
    #[inline]
    #[must_use]
    pub fn with_exec_timeout(mut self, seconds: u64) -> Self {
        self.exec_timeout_secs = seconds;
        self
    }

    /// With the SCM sync stage disabled.
    #[inline]
    #[must_use]
    pub fn without_sync(mut self) -> Self {
        self.sync_enabled = false;
        self
    }

    /// With a different scan size cutoff.
    #[inline]
    #[must_use]
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_extensions: vec!["py".to_string()],
            exec_timeout_secs: 30,
            max_file_bytes: 1024 * 1024,
            sync_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::new();
        assert_eq!(config.source_extensions, vec!["py".to_string()]);
        assert_eq!(config.exec_timeout_secs, 30);
        assert!(config.sync_enabled);
    }

    #[test]
    fn builder_chain() {
        let config = PipelineConfig::new()
            .with_extensions(["py", "pyi"])
            .with_exec_timeout(5)
            .without_sync();

        assert_eq!(config.source_extensions.len(), 2);
        assert_eq!(config.exec_timeout_secs, 5);
        assert!(!config.sync_enabled);
    }
}
