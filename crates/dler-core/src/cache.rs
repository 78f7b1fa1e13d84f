//! Per-run memoized lookups
//!
//! One `RunCache` is built per run and shared read-only by every concurrent
//! unit of that run. Each entry is populated at most once, even when several
//! tasks ask for it at the same time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use dler_fs::{NormalizedPath, io};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::Result;
use crate::error::Error;
use crate::target::DIST_LIBS;

#[derive(Debug)]
pub struct RunCache {
    root: NormalizedPath,
    exclude_patterns: Vec<String>,
    exclusions: OnceLock<Vec<NormalizedPath>>,
    libraries: OnceCell<Vec<String>>,
    registries: Mutex<HashMap<String, Arc<OnceCell<Vec<String>>>>>,
    directory_scans: AtomicUsize,
}

impl RunCache {
    pub fn new(root: NormalizedPath, exclude_patterns: Vec<String>) -> Self {
        Self {
            root,
            exclude_patterns,
            exclusions: OnceLock::new(),
            libraries: OnceCell::new(),
            registries: Mutex::new(HashMap::new()),
            directory_scans: AtomicUsize::new(0),
        }
    }

    /// Excluded path-segment sequences, normalized once.
    pub fn exclusions(&self) -> &[NormalizedPath] {
        self.exclusions.get_or_init(|| {
            self.exclude_patterns
                .iter()
                .map(NormalizedPath::new)
                .filter(|pattern| !pattern.is_empty())
                .collect()
        })
    }

    /// Whether a project-relative path falls under an excluded segment sequence.
    pub fn is_excluded(&self, path: &NormalizedPath) -> bool {
        self.exclusions()
            .iter()
            .any(|pattern| path.contains_segments(pattern.as_str()))
    }

    /// Library names found under `dist-libs/`.
    pub async fn libraries(&self) -> Result<Vec<String>> {
        let libs = self
            .libraries
            .get_or_try_init(|| async {
                let dir = self.root.join(DIST_LIBS);
                self.directory_scans.fetch_add(1, Ordering::SeqCst);
                let libs = io::list_subdirs(&dir)
                    .await
                    .map_err(|e| Error::discovery(&dir, e))?;
                debug!(libraries = ?libs, "discovered libraries");
                Ok::<_, Error>(libs)
            })
            .await?;
        Ok(libs.clone())
    }

    /// Registries present on disk for a library, e.g. `["jsr", "npm"]`.
    pub async fn registries(&self, library: &str) -> Result<Vec<String>> {
        let cell = {
            let mut map = self
                .registries
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(library.to_string()).or_default())
        };

        let registries = cell
            .get_or_try_init(|| async {
                let dir = self.root.join(DIST_LIBS).join(library);
                self.directory_scans.fetch_add(1, Ordering::SeqCst);
                let registries = io::list_subdirs(&dir)
                    .await
                    .map_err(|e| Error::discovery(&dir, e))?;
                debug!(library, registries = ?registries, "discovered registries");
                Ok::<_, Error>(registries)
            })
            .await?;
        Ok(registries.clone())
    }

    /// Number of directory listings performed so far.
    pub fn directory_scans(&self) -> usize {
        self.directory_scans.load(Ordering::SeqCst)
    }
}
