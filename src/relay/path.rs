//! Mapping request paths onto files under the root directory.
//!
//! # Design Decisions
//! - Resolution is lexical first: `..` may pop segments but never the root
//! - Segments are decoded to raw bytes, so names that are not UTF-8 can
//!   still be served on Unix
//! - After opening, the canonical path must still be under the canonical
//!   root, so symlinks cannot lead outside it
//! - Directories are not servable and count as open failures

use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tokio::fs::File;

use crate::relay::error::RelayError;

/// Percent-decode the path component of a request URI for logs, error
/// bodies and the content type. Bytes that are not UTF-8 are replaced.
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Join the still-encoded `raw_path` onto `root` without allowing it to
/// climb out.
pub fn resolve(root: &Path, raw_path: &str) -> Result<PathBuf, RelayError> {
    let decoded: Vec<u8> = percent_decode_str(raw_path).collect();
    let mut segments: Vec<&[u8]> = Vec::new();

    for segment in decoded.split(|&b| b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => {
                if segments.pop().is_none() {
                    return Err(RelayError::PathEscapesRoot {
                        path: decode_path(raw_path),
                    });
                }
            }
            other => segments.push(other),
        }
    }

    let mut resolved = root.to_path_buf();
    for segment in segments {
        resolved.push(segment_path(segment));
    }
    Ok(resolved)
}

#[cfg(unix)]
fn segment_path(segment: &[u8]) -> &std::ffi::OsStr {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::OsStr::from_bytes(segment)
}

#[cfg(not(unix))]
fn segment_path(segment: &[u8]) -> String {
    String::from_utf8_lossy(segment).into_owned()
}

/// Open `local` for reading, enforcing that it is a regular file that lives
/// under `root`. `root` must already be canonical.
pub async fn open_contained(
    root: &Path,
    local: &Path,
    request_path: &str,
) -> Result<File, RelayError> {
    let not_found = |source: io::Error| RelayError::NotFound {
        path: request_path.to_string(),
        source,
    };

    let file = File::open(local).await.map_err(not_found)?;

    let canonical = tokio::fs::canonicalize(local).await.map_err(not_found)?;
    if !canonical.starts_with(root) {
        return Err(RelayError::PathEscapesRoot {
            path: request_path.to_string(),
        });
    }

    let metadata = file.metadata().await.map_err(not_found)?;
    if metadata.is_dir() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::Other,
            "is a directory",
        )));
    }

    Ok(file)
}
