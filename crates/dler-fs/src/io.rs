//! Async I/O operations with path-carrying errors
//!
//! Every function here is an await point; nothing blocks the runtime.

use std::io::Write;
use std::path::Path;

use crate::{Error, NormalizedPath, Result};
use tokio::fs;

/// Write content atomically to a file.
///
/// The content goes to a temp file next to the target, which is then
/// renamed over it. The write runs on the blocking pool to completion even
/// if the calling task is cancelled, and a temp file that is not persisted
/// is removed when dropped, so no temp file outlives the call.
pub async fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();
    let content = content.to_vec();

    tokio::task::spawn_blocking(move || write_atomic_blocking(&native_path, &content))
        .await
        .map_err(|e| Error::io(path.to_native(), std::io::Error::other(e)))?
}

fn write_atomic_blocking(native_path: &Path, content: &[u8]) -> Result<()> {
    let parent = match native_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    // One writer per path per process, so the name needs no random part
    let prefix = format!(
        ".{}.{}",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp").rand_bytes(0);
    // Temp files are owner-only by default; keep the target's mode instead
    match std::fs::metadata(native_path) {
        Ok(meta) => {
            builder.permissions(meta.permissions());
        }
        Err(_) => set_default_permissions(&mut builder),
    }
    let mut temp_file = builder
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent.join(format!("{prefix}.tmp")), e))?;
    let temp_path = temp_file.path().to_path_buf();

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .persist(native_path)
        .map_err(|e| Error::io(native_path, e.error))?;

    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(builder: &mut tempfile::Builder<'_, '_>) {
    use std::os::unix::fs::PermissionsExt;
    builder.permissions(std::fs::Permissions::from_mode(0o644));
}

#[cfg(not(unix))]
fn set_default_permissions(_builder: &mut tempfile::Builder<'_, '_>) {}

/// Read raw bytes from a file.
pub async fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path)
        .await
        .map_err(|e| Error::io(&native_path, e))
}

/// Read UTF-8 text content from a file.
pub async fn read_text(path: &NormalizedPath) -> Result<String> {
    let bytes = read_bytes(path).await?;
    String::from_utf8(bytes).map_err(|_| Error::NotText {
        path: path.to_native(),
    })
}

/// Delete a file.
pub async fn remove_file(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::remove_file(&native_path)
        .await
        .map_err(|e| Error::io(&native_path, e))
}

/// Whether a regular file exists at `path`.
///
/// Permission errors and the like count as "does not exist".
pub async fn is_file(path: &NormalizedPath) -> bool {
    fs::metadata(path.to_native())
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

/// Fail unless a directory exists at `path`.
pub async fn require_dir(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    let meta = fs::metadata(&native_path)
        .await
        .map_err(|e| Error::io(&native_path, e))?;
    if meta.is_dir() {
        Ok(())
    } else {
        Err(Error::io(
            &native_path,
            std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        ))
    }
}

/// Kind of a directory entry, symlinks are reported as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// A single directory entry returned by [`list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: NormalizedPath,
    pub kind: EntryKind,
}

/// List a directory, sorted by name for deterministic traversal.
pub async fn list_dir(path: &NormalizedPath) -> Result<Vec<DirEntry>> {
    let native_path = path.to_native();
    let mut reader = fs::read_dir(&native_path)
        .await
        .map_err(|e| Error::io(&native_path, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| Error::io(&native_path, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| Error::io(entry.path(), e))?;
        let kind = if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::Other
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push(DirEntry {
            path: path.join(&name),
            name,
            kind,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// List only the subdirectory names of a directory, sorted.
pub async fn list_subdirs(path: &NormalizedPath) -> Result<Vec<String>> {
    Ok(list_dir(path)
        .await?
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::Dir)
        .map(|entry| entry.name)
        .collect())
}
