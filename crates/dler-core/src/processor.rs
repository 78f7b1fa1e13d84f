//! Per-file processing: freshness sync, directive application, write-back

use dler_directives::{EvaluationContext, FileEdit, apply};
use dler_fs::{NormalizedPath, io, is_binary};
use tracing::{debug, info, warn};

use crate::freshness::FreshnessSync;
use crate::report::{FileAction, ProcessedFile};
use crate::topology::DistFile;

/// Outcome of processing one distribution file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileResult {
    /// Set when the file ended up different from how it started, or was removed
    pub processed: Option<ProcessedFile>,
    pub warnings: usize,
}

#[derive(Debug, Clone)]
pub struct FileProcessor {
    root: NormalizedPath,
    freshness: FreshnessSync,
    dry_run: bool,
}

impl FileProcessor {
    pub fn new(root: NormalizedPath, freshness: FreshnessSync, dry_run: bool) -> Self {
        Self {
            root,
            freshness,
            dry_run,
        }
    }

    /// Process one distribution file.
    ///
    /// The final content is computed in memory and written at most once, and
    /// only when it differs from the bytes on disk. A second run over an
    /// unchanged tree therefore writes and reports nothing.
    pub async fn process(&self, dist: &DistFile) -> dler_fs::Result<FileResult> {
        let absolute = self.root.join(dist.path.as_str());
        let original = io::read_bytes(&absolute).await?;

        let fresh = self.freshness.refresh(&dist.path, &original).await?;
        if fresh.replaces(&original)
            && let Some(source) = &fresh.source
        {
            debug!(path = %dist.path, source = %source, "evaluating fresh source bytes");
        }

        let (edit, warnings) = match std::str::from_utf8(&fresh.bytes) {
            Ok(_) if is_binary(&fresh.bytes) => {
                debug!(path = %dist.path, "skipping directives in binary content");
                (FileEdit::Unchanged, 0)
            }
            Ok(content) => {
                let application = apply(content, &EvaluationContext::new(dist.path.as_str()));
                for item in &application.warnings {
                    warn!(path = %dist.path, line = item.line, "{}", item.warning);
                }
                (application.edit, application.warnings.len())
            }
            Err(_) => {
                debug!(path = %dist.path, "skipping directives in non-UTF-8 content");
                (FileEdit::Unchanged, 0)
            }
        };

        let action = match edit {
            FileEdit::Remove => {
                if !self.dry_run {
                    io::remove_file(&absolute).await?;
                }
                info!(path = %dist.path, "removed by directive");
                Some(FileAction::Removed)
            }
            FileEdit::Rewrite(rewritten) => {
                self.commit(dist, &absolute, rewritten.as_bytes(), &original, fresh.source.as_ref())
                    .await?
            }
            FileEdit::Unchanged => {
                self.commit(dist, &absolute, &fresh.bytes, &original, fresh.source.as_ref())
                    .await?
            }
        };

        Ok(FileResult {
            processed: action.map(|action| ProcessedFile {
                path: dist.path.clone(),
                action,
                target: dist.target.clone(),
            }),
            warnings,
        })
    }

    /// Write `content` unless it already matches `original`.
    async fn commit(
        &self,
        dist: &DistFile,
        absolute: &NormalizedPath,
        content: &[u8],
        original: &[u8],
        source: Option<&NormalizedPath>,
    ) -> dler_fs::Result<Option<FileAction>> {
        if content == original {
            return Ok(None);
        }
        if !self.dry_run {
            io::write_atomic(absolute, content).await?;
        }
        match source {
            Some(source) => info!(path = %dist.path, source = %source, "updated from source"),
            None => info!(path = %dist.path, "applied directives"),
        }
        Ok(Some(FileAction::Modified))
    }
}
