//! Run report

use dler_fs::NormalizedPath;
use serde::Serialize;

/// What happened to a distribution file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Modified,
    Removed,
}

impl std::fmt::Display for FileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Modified => write!(f, "modified"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedFile {
    pub path: NormalizedPath,
    pub action: FileAction,
    /// The requested target this file belongs to
    pub target: String,
}

/// A per-file failure collected instead of aborting the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: NormalizedPath,
    pub message: String,
}

/// Result of a directive run
///
/// `processed` and `errors` are sorted by path, so the report does not
/// depend on task completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub processed: Vec<ProcessedFile>,
    pub errors: Vec<FileFailure>,
    /// Directive warnings logged during the run
    pub warnings: usize,
    /// Whether nothing was written or deleted
    pub dry_run: bool,
}

impl ProcessReport {
    /// Distribution paths that were modified or deleted.
    pub fn paths(&self) -> Vec<&NormalizedPath> {
        self.processed.iter().map(|file| &file.path).collect()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn count(&self, action: FileAction) -> usize {
        self.processed.iter().filter(|f| f.action == action).count()
    }

    pub(crate) fn merge(&mut self, other: ProcessReport) {
        self.processed.extend(other.processed);
        self.errors.extend(other.errors);
        self.warnings += other.warnings;
    }

    pub(crate) fn sort(&mut self) {
        self.processed.sort_by(|a, b| a.path.cmp(&b.path));
        self.errors.sort_by(|a, b| a.path.cmp(&b.path));
    }
}
