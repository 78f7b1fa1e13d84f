//! Run options and project configuration
//!
//! Options come from three layers: built-in defaults, an optional
//! `dler.toml` / `dler.json` / `dler.yaml` at the project root, and caller
//! overrides (CLI flags).

use dler_fs::{ConfigStore, NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Config file names looked up at the project root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["dler.toml", "dler.json", "dler.yaml"];

fn default_concurrency() -> usize {
    4
}

fn default_targets_concurrency() -> usize {
    2
}

fn default_batch_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_exclude() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        ".git".to_string(),
        "dler-directives".to_string(),
    ]
}

fn default_source_dir() -> String {
    "src".to_string()
}

/// Options recognized by a directive run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    /// Files processed concurrently within one batch
    pub concurrency: usize,
    /// Targets processed concurrently
    #[serde(alias = "targetsConcurrency")]
    pub targets_concurrency: usize,
    #[serde(alias = "batchSize")]
    pub batch_size: usize,
    /// Abort the run on the first per-file failure
    #[serde(alias = "stopOnError")]
    pub stop_on_error: bool,
    /// Overwrite each distribution file with its source before evaluating
    #[serde(alias = "copyFreshFromSourceBeforeProcessing")]
    pub copy_fresh_from_source: bool,
    /// Report what would change without writing or deleting
    #[serde(alias = "dryRun")]
    pub dry_run: bool,
    /// Path-segment sequences excluded from source discovery
    pub exclude: Vec<String>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            targets_concurrency: default_targets_concurrency(),
            batch_size: default_batch_size(),
            stop_on_error: false,
            copy_fresh_from_source: default_true(),
            dry_run: false,
            exclude: default_exclude(),
        }
    }
}

impl ProcessOptions {
    /// Clamp zero fan-out values to 1.
    pub fn normalized(mut self) -> Self {
        self.concurrency = self.concurrency.max(1);
        self.targets_concurrency = self.targets_concurrency.max(1);
        self.batch_size = self.batch_size.max(1);
        self
    }
}

/// The `[directives]` table of a project config file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectivesSection {
    /// Source directory, relative to the project root
    #[serde(alias = "sourceDir")]
    pub source_dir: Option<String>,
    /// Targets used when the caller names none
    pub targets: Vec<String>,
    #[serde(flatten)]
    pub options: ProcessOptions,
}

/// Parsed project config file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub directives: DirectivesSection,
}

impl ProjectConfig {
    /// Load the first config file found at `root`, or defaults if none exist.
    pub async fn load(root: &NormalizedPath) -> Result<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = root.join(name);
            if io::is_file(&path).await {
                tracing::debug!(path = %path, "loading project config");
                return Ok(ConfigStore::new().load(&path).await?);
            }
        }
        Ok(Self::default())
    }
}

/// Everything a run needs besides the target list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub root: NormalizedPath,
    pub source_dir: String,
    pub options: ProcessOptions,
}

impl EngineConfig {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self {
            root: root.into(),
            source_dir: default_source_dir(),
            options: ProcessOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProcessOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_source_dir(mut self, source_dir: impl Into<String>) -> Self {
        self.source_dir = source_dir.into();
        self
    }

    /// Build from a loaded project config.
    pub fn from_project(root: impl Into<NormalizedPath>, project: &ProjectConfig) -> Self {
        let section = &project.directives;
        Self {
            root: root.into(),
            source_dir: section
                .source_dir
                .clone()
                .unwrap_or_else(default_source_dir),
            options: section.options.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ProcessOptions::default();
        assert_eq!(options.concurrency, 4);
        assert_eq!(options.batch_size, 100);
        assert!(options.copy_fresh_from_source);
        assert!(!options.stop_on_error);
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let options = ProcessOptions {
            concurrency: 0,
            targets_concurrency: 0,
            batch_size: 0,
            ..ProcessOptions::default()
        }
        .normalized();
        assert_eq!(
            (options.concurrency, options.targets_concurrency, options.batch_size),
            (1, 1, 1)
        );
    }
}
