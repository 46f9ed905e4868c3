//! Platform-specific path conventions.
//!
//! Everything that differs between Windows and Unix-like systems when comparing
//! or printing paths lives here, so the rest of the crate can stay
//! platform-agnostic:
//!
//! - which bytes count as a path separator
//! - how long the volume (drive letter or UNC share) prefix of a path is
//! - how a native path is turned into the forward-slash form used in output
//!
//! # Platform Support Matrix
//!
//! | Feature | Windows | macOS | Linux |
//! |---------|---------|-------|-------|
//! | Separators | `\` and `/` | `/` | `/` |
//! | Volume names | `C:`, `\\host\share` | none | none |
//! | Volume comparison | case-insensitive | n/a | n/a |

use std::path::Path;

/// The platform's preferred path separator.
pub const SEPARATOR: char = std::path::MAIN_SEPARATOR;

/// Returns true if running on Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Reports whether `b` is a path separator on this platform.
///
/// Windows accepts both `\` and `/`; everything else only `/`.
#[must_use]
pub const fn is_path_separator(b: u8) -> bool {
    if is_windows() {
        b == b'\\' || b == b'/'
    } else {
        b == b'/'
    }
}

/// Returns the leading volume name of `path`.
///
/// On Windows this is a drive designator (`C:`) or the `\\host\share` part of a
/// UNC path. On other platforms it is always empty.
#[must_use]
pub fn volume_name(path: &str) -> &str {
    &path[..volume_name_len(path)]
}

#[cfg(windows)]
fn volume_name_len(path: &str) -> usize {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return 2;
    }

    // UNC: \\host\share
    if bytes.len() >= 5
        && is_path_separator(bytes[0])
        && is_path_separator(bytes[1])
        && !is_path_separator(bytes[2])
        && bytes[2] != b'.'
    {
        let mut n = 3;
        while n < bytes.len() && !is_path_separator(bytes[n]) {
            n += 1;
        }
        if n + 1 < bytes.len() && !is_path_separator(bytes[n + 1]) {
            n += 1;
            while n < bytes.len() && !is_path_separator(bytes[n]) {
                n += 1;
            }
            return n;
        }
    }
    0
}

#[cfg(not(windows))]
const fn volume_name_len(_path: &str) -> usize {
    0
}

/// Converts a slash-separated relative path to native separators.
#[must_use]
pub fn from_slash(path: &str) -> String {
    if is_windows() {
        path.replace('/', "\\")
    } else {
        path.to_string()
    }
}

/// Normalizes a path to forward slashes for output.
///
/// Output paths must be identical on every platform, so native separators are
/// rewritten and Windows extended-length prefixes (`\\?\`) are dropped.
///
/// ```rust,no_run
/// use gosrcs::utils::platform::normalize_path_for_storage;
/// use std::path::Path;
///
/// assert_eq!(normalize_path_for_storage(Path::new("lib/a.go")), "lib/a.go");
/// ```
#[must_use]
pub fn normalize_path_for_storage<P: AsRef<Path>>(path: P) -> String {
    let path_str = path.as_ref().to_string_lossy();

    if !is_windows() {
        return path_str.into_owned();
    }

    let cleaned = if let Some(stripped) = path_str.strip_prefix(r"\\?\UNC\") {
        format!("//{stripped}")
    } else if let Some(stripped) = path_str.strip_prefix(r"\\?\") {
        stripped.to_string()
    } else {
        path_str.into_owned()
    };

    cleaned.replace('\\', "/")
}
