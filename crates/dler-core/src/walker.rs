//! Source tree discovery
//!
//! Depth-first walk of the source root that keeps only files carrying a
//! directive token. Binary files and excluded paths are skipped. Directives
//! are always discovered in the source tree, never in a distribution tree.

use dler_directives::has_directive_token;
use dler_fs::io::{self, EntryKind};
use dler_fs::{NormalizedPath, has_binary_extension, is_binary};
use tracing::debug;

use crate::Result;
use crate::cache::RunCache;
use crate::error::Error;

/// A directive-bearing file in the source tree. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Project-relative, slash-normalized path
    pub path: NormalizedPath,
    pub content: String,
}

/// Walk `<root>/<source_dir>` and return every directive-bearing source file
/// in depth-first, name-sorted order.
pub async fn discover_sources(
    root: &NormalizedPath,
    source_dir: &str,
    cache: &RunCache,
) -> Result<Vec<SourceFile>> {
    let source_root = root.join(source_dir);
    io::require_dir(&source_root)
        .await
        .map_err(|e| Error::discovery(&source_root, e))?;

    let mut found = Vec::new();
    let mut scanned = 0usize;
    let mut stack = list_reversed(&source_root).await?;

    while let Some(entry) = stack.pop() {
        let Some(relative) = entry.path.relative_to(root) else {
            continue;
        };
        if cache.is_excluded(&relative) {
            debug!(path = %relative, "excluded from discovery");
            continue;
        }

        match entry.kind {
            EntryKind::Dir => stack.extend(list_reversed(&entry.path).await?),
            EntryKind::File => {
                scanned += 1;
                if has_binary_extension(relative.extension()) {
                    continue;
                }
                let bytes = io::read_bytes(&entry.path)
                    .await
                    .map_err(|e| Error::discovery(&entry.path, e))?;
                if is_binary(&bytes) {
                    debug!(path = %relative, "skipping binary file");
                    continue;
                }
                let Ok(content) = String::from_utf8(bytes) else {
                    debug!(path = %relative, "skipping non-UTF-8 file");
                    continue;
                };
                if has_directive_token(&content) {
                    found.push(SourceFile {
                        path: relative,
                        content,
                    });
                }
            }
            EntryKind::Other => {}
        }
    }

    debug!(scanned, with_directives = found.len(), "source discovery finished");
    Ok(found)
}

async fn list_reversed(dir: &NormalizedPath) -> Result<Vec<io::DirEntry>> {
    let mut entries = io::list_dir(dir)
        .await
        .map_err(|e| Error::discovery(dir, e))?;
    entries.reverse();
    Ok(entries)
}
