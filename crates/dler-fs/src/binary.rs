//! Binary file detection.
//!
//! Two cheap checks: a known-binary extension list, then a NUL byte scan
//! over the first 8KB of content.

use memchr::memchr;

const SNIFF_LEN: usize = 8192;

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "ico", "bmp", "tiff", "avif", "woff", "woff2", "ttf",
    "otf", "eot", "zip", "gz", "tgz", "tar", "bz2", "xz", "7z", "wasm", "pdf", "mp3", "mp4",
    "wav", "ogg", "webm", "mov", "exe", "dll", "so", "dylib", "node", "bin", "lockb",
];

/// Whether a file extension names a known binary format (case-insensitive).
pub fn has_binary_extension(extension: Option<&str>) -> bool {
    extension.is_some_and(|ext| {
        BINARY_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

/// Quick binary detection over the first 8KB of content.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = std::cmp::min(buffer.len(), SNIFF_LEN);
    memchr(0, &buffer[..check_len]).is_some()
}
