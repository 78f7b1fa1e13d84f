//! Async I/O behaviour against a real temporary directory.

use dler_fs::io::{self, EntryKind};
use dler_fs::{Error, NormalizedPath};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn is_not_found(err: &Error) -> bool {
    matches!(err, Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
}

#[tokio::test]
async fn test_write_then_read_text() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path()).join("nested/deep/file.ts");

    io::write_atomic(&path, b"export {};\n").await.unwrap();

    assert_eq!(io::read_text(&path).await.unwrap(), "export {};\n");
    assert!(io::is_file(&path).await);
}

#[tokio::test]
async fn test_write_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path()).join("a.js");

    io::write_atomic(&path, b"one").await.unwrap();
    io::write_atomic(&path, b"two").await.unwrap();

    let entries = io::list_dir(&NormalizedPath::new(dir.path())).await.unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a.js"]);
}

#[tokio::test]
async fn test_read_missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path()).join("missing.ts");

    let err = io::read_text(&path).await.unwrap_err();
    assert!(is_not_found(&err));
    assert!(err.to_string().contains("missing.ts"));
}

#[tokio::test]
async fn test_read_text_rejects_invalid_utf8() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path()).join("blob.bin");
    std::fs::write(path.to_native(), [0xff, 0xfe, 0x00]).unwrap();

    let err = io::read_text(&path).await.unwrap_err();
    assert!(matches!(err, Error::NotText { .. }));
}

#[tokio::test]
async fn test_remove_file() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path()).join("gone.js");
    std::fs::write(path.to_native(), "x").unwrap();

    io::remove_file(&path).await.unwrap();
    assert!(!io::is_file(&path).await);
}

#[tokio::test]
async fn test_list_dir_is_sorted_and_typed() {
    let dir = tempdir().unwrap();
    let root = NormalizedPath::new(dir.path());
    std::fs::create_dir(dir.path().join("npm")).unwrap();
    std::fs::create_dir(dir.path().join("jsr")).unwrap();
    std::fs::write(dir.path().join("README.md"), "x").unwrap();

    let entries = io::list_dir(&root).await.unwrap();
    let listed: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.kind)).collect();
    assert_eq!(
        listed,
        vec![
            ("README.md", EntryKind::File),
            ("jsr", EntryKind::Dir),
            ("npm", EntryKind::Dir),
        ]
    );

    assert_eq!(io::list_subdirs(&root).await.unwrap(), vec!["jsr", "npm"]);
}

#[tokio::test]
async fn test_list_missing_dir_is_error() {
    let dir = tempdir().unwrap();
    let missing = NormalizedPath::new(dir.path()).join("nope");
    assert!(is_not_found(&io::list_dir(&missing).await.unwrap_err()));
}

#[tokio::test]
async fn test_require_dir_distinguishes_files() {
    let dir = tempdir().unwrap();
    let root = NormalizedPath::new(dir.path());
    std::fs::write(dir.path().join("file.txt"), "x").unwrap();

    io::require_dir(&root).await.unwrap();

    let err = io::require_dir(&root.join("file.txt")).await.unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(!is_not_found(&err));
    assert!(is_not_found(&io::require_dir(&root.join("missing")).await.unwrap_err()));
}

#[tokio::test]
async fn test_failed_write_keeps_target_and_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let root = NormalizedPath::new(dir.path());
    let path = root.join("a.js");
    std::fs::write(path.to_native(), "before").unwrap();
    // Occupy the temp slot with a directory so the write cannot start
    let slot = format!(".a.js.{}.tmp", std::process::id());
    std::fs::create_dir(dir.path().join(&slot)).unwrap();

    assert!(io::write_atomic(&path, b"after").await.is_err());

    assert_eq!(io::read_text(&path).await.unwrap(), "before");
    let names: Vec<_> = io::list_dir(&root)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec![slot, "a.js".to_string()]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_write_keeps_existing_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path()).join("cli.js");
    std::fs::write(path.to_native(), "#!/usr/bin/env node\n").unwrap();
    std::fs::set_permissions(path.to_native(), std::fs::Permissions::from_mode(0o755)).unwrap();

    io::write_atomic(&path, b"#!/usr/bin/env node\nrun();\n").await.unwrap();

    let mode = std::fs::metadata(path.to_native()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}
