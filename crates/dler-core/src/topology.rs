//! Path algebra between the source tree and distribution trees
//!
//! Two topologies exist:
//!
//! - **Flat**: `src/<rest>` ⇄ `dist-npm/bin/<rest>` and `dist-jsr/bin/<rest>`
//! - **Library**: `src/libs/<lib>/<rest>` ⇄ `dist-libs/<lib>/<registry>/bin/<rest>`,
//!   with registries discovered from disk
//!
//! The forward direction yields candidates; existence on disk decides which
//! candidates are acted upon.

use std::sync::Arc;

use dler_fs::{NormalizedPath, io};
use tracing::debug;

use crate::Result;
use crate::cache::RunCache;
use crate::error::Error;
use crate::target::{DIST_JSR, DIST_LIBS, DIST_NPM, DistTarget};
use crate::walker::SourceFile;

/// Directory under the source root holding per-library sources.
pub const LIBS_DIR: &str = "libs";

/// Subdirectory of every distribution root holding the build output.
pub const BIN_DIR: &str = "bin";

const DECLARATION_SUFFIX: &str = ".d.ts";

/// Extensions treated as scripts. Order is the reverse-mapping search order.
const SCRIPT_EXTENSIONS: &[&str] = &["ts", "js", "tsx", "jsx", "mts", "mjs", "cts", "cjs"];

/// Output extensions a script source may be emitted as.
const SCRIPT_OUTPUT_EXTENSIONS: &[&str] = &["js", "ts"];

/// Registries accepted by the reverse library grammar.
const REVERSE_REGISTRIES: &[&str] = &["npm", "jsr"];

/// Which topology a distribution file belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Flat,
    Library { name: String, registry: String },
}

/// A concrete file in a distribution tree, derived from one source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistFile {
    /// Project-relative, slash-normalized path
    pub path: NormalizedPath,
    pub kind: TargetKind,
    /// Label of the requested target this file was expanded from
    pub target: String,
}

impl DistFile {
    pub fn library_name(&self) -> Option<&str> {
        match &self.kind {
            TargetKind::Library { name, .. } => Some(name),
            TargetKind::Flat => None,
        }
    }

    pub fn registry(&self) -> Option<&str> {
        match &self.kind {
            TargetKind::Library { registry, .. } => Some(registry),
            TargetKind::Flat => None,
        }
    }
}

/// Split a file path into (stem path, kind of file).
enum FileShape<'a> {
    Declaration { stem: &'a str },
    Script { stem: &'a str },
    Other,
}

fn shape(path: &str) -> FileShape<'_> {
    if let Some(stem) = path.strip_suffix(DECLARATION_SUFFIX) {
        return FileShape::Declaration { stem };
    }
    let file_start = path.rfind('/').map_or(0, |idx| idx + 1);
    match path.rfind('.') {
        Some(dot) if dot > file_start => {
            let ext = &path[dot + 1..];
            if SCRIPT_EXTENSIONS.contains(&ext) {
                FileShape::Script { stem: &path[..dot] }
            } else {
                FileShape::Other
            }
        }
        _ => FileShape::Other,
    }
}

/// Candidate distribution-relative names for a source-relative path.
///
/// Declarations stay `.d.ts`; scripts become `.js` and `.ts`; anything else
/// keeps its name.
pub fn output_candidates(rest: &str) -> Vec<String> {
    match shape(rest) {
        FileShape::Declaration { .. } | FileShape::Other => vec![rest.to_string()],
        FileShape::Script { stem } => SCRIPT_OUTPUT_EXTENSIONS
            .iter()
            .map(|ext| format!("{stem}.{ext}"))
            .collect(),
    }
}

/// Candidate source-relative names for a distribution-relative path, in
/// search order.
pub fn source_candidates(rest: &str) -> Vec<String> {
    match shape(rest) {
        FileShape::Declaration { stem } => SCRIPT_EXTENSIONS[..2]
            .iter()
            .map(|ext| format!("{stem}.{ext}"))
            .chain(std::iter::once(rest.to_string()))
            .collect(),
        FileShape::Script { stem } => SCRIPT_EXTENSIONS
            .iter()
            .map(|ext| format!("{stem}.{ext}"))
            .collect(),
        FileShape::Other => vec![rest.to_string()],
    }
}

/// Forward mapping into a flat root such as `dist-npm/bin`.
///
/// Returns nothing for sources outside `source_dir`.
pub fn forward_flat(source: &NormalizedPath, source_dir: &str, flat_root: &str) -> Vec<NormalizedPath> {
    let Some(rest) = source.strip_prefix(source_dir) else {
        return Vec::new();
    };
    let root = NormalizedPath::new(flat_root);
    output_candidates(rest.as_str())
        .iter()
        .map(|candidate| root.join(candidate))
        .collect()
}

/// Forward mapping into `dist-libs/<lib>/<registry>/bin` for each registry.
///
/// Returns nothing for sources outside `<source_dir>/libs/<lib>`.
pub fn forward_library(
    source: &NormalizedPath,
    source_dir: &str,
    library: &str,
    registries: &[String],
) -> Vec<(String, NormalizedPath)> {
    let lib_source_root = NormalizedPath::new(source_dir).join(LIBS_DIR).join(library);
    let Some(rest) = source.strip_prefix(lib_source_root.as_str()) else {
        return Vec::new();
    };
    let candidates = output_candidates(rest.as_str());

    registries
        .iter()
        .flat_map(|registry| {
            let root = library_root(library, registry);
            candidates
                .iter()
                .map(move |candidate| (registry.clone(), root.join(candidate)))
        })
        .collect()
}

/// `dist-libs/<lib>/<registry>/bin`
pub fn library_root(library: &str, registry: &str) -> NormalizedPath {
    NormalizedPath::new(DIST_LIBS)
        .join(library)
        .join(registry)
        .join(BIN_DIR)
}

/// Reverse mapping: candidate source paths for a distribution path.
///
/// Library paths follow `dist-libs/<lib>/<npm|jsr>/bin/<rest>` and map to
/// `<source_dir>/libs/<lib>/<rest>`; flat paths have their
/// `dist-(jsr|npm)/bin/` prefix replaced by `<source_dir>/`. Anything else
/// has no source.
pub fn reverse(dist: &NormalizedPath, source_dir: &str) -> Vec<NormalizedPath> {
    let segments: Vec<&str> = dist.segments().collect();

    let (source_root, rest) = match segments.as_slice() {
        [libs, lib, registry, bin, rest @ ..]
            if *libs == DIST_LIBS
                && REVERSE_REGISTRIES.contains(registry)
                && *bin == BIN_DIR
                && !rest.is_empty() =>
        {
            (
                NormalizedPath::new(source_dir).join(LIBS_DIR).join(lib),
                rest.join("/"),
            )
        }
        [dist_root, bin, rest @ ..]
            if (*dist_root == DIST_NPM || *dist_root == DIST_JSR)
                && *bin == BIN_DIR
                && !rest.is_empty() =>
        {
            (NormalizedPath::new(source_dir), rest.join("/"))
        }
        _ => return Vec::new(),
    };

    source_candidates(&rest)
        .iter()
        .map(|candidate| source_root.join(candidate))
        .collect()
}

/// Resolves sources to existing distribution files and back, against a
/// project root on disk.
#[derive(Debug, Clone)]
pub struct TopologyResolver {
    root: NormalizedPath,
    source_dir: String,
    cache: Arc<RunCache>,
}

impl TopologyResolver {
    pub fn new(root: NormalizedPath, source_dir: impl Into<String>, cache: Arc<RunCache>) -> Self {
        Self {
            root,
            source_dir: source_dir.into(),
            cache,
        }
    }

    /// Expand one target over all directive-bearing sources, keeping only
    /// distribution files that exist. Each path appears at most once.
    pub async fn expand(&self, target: &DistTarget, sources: &[SourceFile]) -> Result<Vec<DistFile>> {
        let label = target.to_string();
        let mut candidates: Vec<DistFile> = Vec::new();

        match target {
            DistTarget::Npm | DistTarget::Jsr => {
                let flat_root = target.flat_root().unwrap_or_default();
                let dist_root = self.root.join(flat_root);
                io::require_dir(&dist_root)
                    .await
                    .map_err(|e| Error::discovery(&dist_root, e))?;
                for source in sources {
                    for path in forward_flat(&source.path, &self.source_dir, flat_root) {
                        candidates.push(DistFile {
                            path,
                            kind: TargetKind::Flat,
                            target: label.clone(),
                        });
                    }
                }
            }
            DistTarget::AllLibraries => {
                for library in self.cache.libraries().await? {
                    self.library_candidates(&library, &label, sources, &mut candidates)
                        .await?;
                }
            }
            DistTarget::Library(library) => {
                self.library_candidates(library, &label, sources, &mut candidates)
                    .await?;
            }
        }

        let mut seen = std::collections::HashSet::new();
        let mut existing = Vec::new();
        for candidate in candidates {
            if !seen.insert(candidate.path.clone()) {
                continue;
            }
            if io::is_file(&self.root.join(candidate.path.as_str())).await {
                existing.push(candidate);
            }
        }

        debug!(target = %label, files = existing.len(), "expanded target");
        Ok(existing)
    }

    async fn library_candidates(
        &self,
        library: &str,
        label: &str,
        sources: &[SourceFile],
        out: &mut Vec<DistFile>,
    ) -> Result<()> {
        let registries = self.cache.registries(library).await?;
        for source in sources {
            for (registry, path) in forward_library(&source.path, &self.source_dir, library, &registries) {
                out.push(DistFile {
                    path,
                    kind: TargetKind::Library {
                        name: library.to_string(),
                        registry,
                    },
                    target: label.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The first existing source candidate for a distribution file.
    pub async fn resolve_source(&self, dist: &NormalizedPath) -> Option<NormalizedPath> {
        for candidate in reverse(dist, &self.source_dir) {
            if io::is_file(&self.root.join(candidate.as_str())).await {
                return Some(candidate);
            }
        }
        None
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_keeps_extension() {
        assert_eq!(output_candidates("types.d.ts"), vec!["types.d.ts"]);
    }

    #[test]
    fn test_script_has_two_candidates() {
        assert_eq!(output_candidates("a/b.ts"), vec!["a/b.js", "a/b.ts"]);
        assert_eq!(output_candidates("a/b.tsx"), vec!["a/b.js", "a/b.ts"]);
    }

    #[test]
    fn test_other_files_pass_through() {
        assert_eq!(output_candidates("data.json"), vec!["data.json"]);
        assert_eq!(output_candidates("dir.v2/README"), vec!["dir.v2/README"]);
    }

    #[test]
    fn test_declaration_source_search_order() {
        assert_eq!(
            source_candidates("types.d.ts"),
            vec!["types.ts", "types.js", "types.d.ts"]
        );
    }
}
