//! Error types for dler-core

use dler_fs::NormalizedPath;

/// Result type for dler-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed or conflicting target specification.
///
/// Always raised before any file I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    /// Prefix is not one of `dist-npm`, `dist-jsr`, `dist-libs`
    #[error("Invalid target '{0}': expected dist-npm, dist-jsr, dist-libs or dist-libs/<lib>")]
    InvalidTarget(String),

    /// `dist-libs/` with nothing after the slash
    #[error("Invalid target '{0}': library name is empty")]
    EmptyLibraryName(String),

    /// `dist-libs` combined with a specific `dist-libs/<lib>`
    #[error("Target '{wildcard}' (all libraries) cannot be combined with '{specific}'")]
    Conflict { wildcard: String, specific: String },

    #[error("Duplicate target '{0}'")]
    DuplicateTarget(String),

    #[error("Duplicate library target '{0}'")]
    DuplicateLibrary(String),
}

/// Errors that can occur in a directive run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Target validation failed
    #[error(transparent)]
    Target(#[from] TargetError),

    /// The source root or a distribution root could not be listed or read
    #[error("Discovery failed at {path}: {source}")]
    Discovery {
        path: NormalizedPath,
        #[source]
        source: dler_fs::Error,
    },

    /// Processing a distribution file failed (stop-on-error)
    #[error("Failed to process {path}: {source}")]
    FileIo {
        path: NormalizedPath,
        #[source]
        source: dler_fs::Error,
    },

    /// A worker task panicked or was cancelled
    #[error("Worker task failed: {message}")]
    TaskFailed { message: String },

    /// Filesystem error from dler-fs
    #[error(transparent)]
    Fs(#[from] dler_fs::Error),
}

impl Error {
    pub(crate) fn discovery(path: &NormalizedPath, source: dler_fs::Error) -> Self {
        Self::Discovery {
            path: path.clone(),
            source,
        }
    }
}
