//! Asset path normalization
//!
//! Asset paths are opaque to the resolver but must stay inside the output
//! root. They are stored relative, NFC-normalized and `/`-separated so the
//! same logical file always maps to the same key.

use crate::error::StoreError;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Normalize a relative asset path.
///
/// Drops empty and `.` segments. Rejects absolute paths, drive prefixes,
/// backslash separators and any `..` segment.
pub fn normalize_asset_path(path: &str) -> Result<String, StoreError> {
    let invalid = |reason: &str| StoreError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let normalized: String = path.nfc().collect();

    if normalized.starts_with('/') {
        return Err(invalid("path must be relative to the output root"));
    }
    if normalized.contains('\\') {
        return Err(invalid("path separators must be '/'"));
    }
    if normalized.split('/').next().is_some_and(|first| first.contains(':')) {
        return Err(invalid("path must not carry a drive or scheme prefix"));
    }

    let mut segments = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(invalid("path must not escape the output root")),
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(invalid("path is empty"));
    }

    Ok(segments.join("/"))
}

/// Map a normalized asset path onto the filesystem under `root`.
pub fn to_fs_path(root: &Path, asset_path: &str) -> PathBuf {
    asset_path
        .split('/')
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}

/// Inverse of [`to_fs_path`] for files discovered under `root`.
pub fn from_fs_path(root: &Path, fs_path: &Path) -> Result<String, StoreError> {
    let relative = fs_path
        .strip_prefix(root)
        .map_err(|_| StoreError::InvalidPath {
            path: fs_path.to_string_lossy().to_string(),
            reason: "file is outside the output root".to_string(),
        })?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    normalize_asset_path(&joined)
}
