//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Source and distribution paths are compared and rewritten as strings, so
/// every path is kept in one canonical form: forward slashes, no empty or
/// `.` segments, no trailing slash. Conversion to a platform-native path
/// happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

fn clean(raw: &str) -> String {
    let raw = raw.replace('\\', "/");
    let absolute = raw.starts_with('/');
    let joined = raw
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: clean(&path.as_ref().to_string_lossy()),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether the path has no segments at all.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a (possibly multi-segment) relative segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self {
            inner: clean(&format!("{}/{}", self.inner, segment)),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    ///
    /// Only the last dot counts, so `x.d.ts` has extension `ts`.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|segment| !segment.is_empty())
    }

    /// Segment-wise prefix test: `a/bc` does not start with `a/b`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.strip_prefix(prefix).is_some()
    }

    /// Remove a leading segment sequence, returning the remainder.
    ///
    /// Returns `None` when `prefix` is not a segment-wise prefix. Stripping
    /// the whole path yields an empty path.
    pub fn strip_prefix(&self, prefix: &str) -> Option<Self> {
        let prefix = Self::new(prefix);
        if prefix.is_empty() {
            return Some(self.clone());
        }
        if self.inner == prefix.inner {
            return Some(Self {
                inner: String::new(),
            });
        }
        let rest = self.inner.strip_prefix(&prefix.inner)?;
        let rest = if prefix.inner.ends_with('/') {
            rest
        } else {
            rest.strip_prefix('/')?
        };
        Some(Self {
            inner: rest.to_string(),
        })
    }

    /// Express this path relative to `base`.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<Self> {
        self.strip_prefix(base.as_str())
    }

    /// Whether the segments of `sequence` appear contiguously in this path.
    pub fn contains_segments(&self, sequence: &str) -> bool {
        let needle = Self::new(sequence);
        let needle: Vec<&str> = needle.segments().collect();
        if needle.is_empty() {
            return false;
        }
        let haystack: Vec<&str> = self.segments().collect();
        haystack.windows(needle.len()).any(|window| window == needle.as_slice())
    }
}

impl serde::Serialize for NormalizedPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner)
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
