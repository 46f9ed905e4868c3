//! Prefix-safe path comparison and glob quoting.
//!
//! These helpers compare paths element-wise rather than byte-wise, so that
//! `/src/foo2` is never treated as living under `/src/foo`. They work on the
//! string form of a path because glob patterns and module paths are strings
//! too; the platform-dependent parts (separators, volume names) are delegated
//! to [`crate::utils::platform`].
//!
//! All functions are pure and never touch the filesystem.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use crate::core::GosrcsError;
use crate::utils::platform::{self, SEPARATOR, is_path_separator, volume_name};

/// Reports whether the slash-separated path `s` begins with the elements in
/// `prefix`.
///
/// Used for module and import paths, which always use `/` regardless of
/// platform.
///
/// # Examples
///
/// ```rust,no_run
/// use gosrcs::utils::path::has_path_prefix;
///
/// assert!(has_path_prefix("example.com/lib/sub", "example.com/lib"));
/// assert!(!has_path_prefix("example.com/lib2", "example.com/lib"));
/// assert!(has_path_prefix("anything", ""));
/// ```
#[must_use]
pub fn has_path_prefix(s: &str, prefix: &str) -> bool {
    if s.len() == prefix.len() {
        return s == prefix;
    }
    if prefix.is_empty() {
        return true;
    }
    if s.len() > prefix.len() {
        let (sb, pb) = (s.as_bytes(), prefix.as_bytes());
        if pb[pb.len() - 1] == b'/' || sb[pb.len()] == b'/' {
            return &sb[..pb.len()] == pb;
        }
    }
    false
}

/// Reports whether the filesystem path `s` begins with the elements in `prefix`.
///
/// The comparison is case-sensitive except for the volume name, which is
/// compared case-insensitively (`c:\src` and `C:\src` are the same volume on
/// Windows). No Unicode normalization is applied, and separators are assumed
/// to be canonical.
///
/// # Examples
///
/// ```rust,no_run
/// use gosrcs::utils::path::has_file_path_prefix;
///
/// # #[cfg(unix)]
/// # {
/// assert!(has_file_path_prefix("/src/foo/bar", "/src/foo"));
/// assert!(has_file_path_prefix("/src/foo", "/src/foo"));
/// assert!(!has_file_path_prefix("/src/foo2", "/src/foo"));
/// # }
/// ```
#[must_use]
pub fn has_file_path_prefix(s: &str, prefix: &str) -> bool {
    let sv = volume_name(s);
    let pv = volume_name(prefix);

    if sv != pv && sv.to_uppercase() != pv.to_uppercase() {
        return false;
    }

    let s = &s.as_bytes()[sv.len()..];
    let prefix = &prefix.as_bytes()[pv.len()..];

    if s.len() == prefix.len() {
        return s == prefix;
    }
    if prefix.is_empty() {
        return true;
    }
    if s.len() > prefix.len() {
        if is_path_separator(prefix[prefix.len() - 1]) {
            return s.starts_with(prefix);
        }
        return is_path_separator(s[prefix.len()]) && &s[..prefix.len()] == prefix;
    }
    false
}

/// Returns `s` without the leading path elements in `prefix`, such that
/// joining the result onto `prefix` produces `s` again.
///
/// If `s` does not start with `prefix` (per [`has_file_path_prefix`]) or
/// `prefix` is empty, `s` is returned unchanged. If `s` equals `prefix`, the
/// result is empty.
///
/// # Examples
///
/// ```rust,no_run
/// use gosrcs::utils::path::trim_file_path_prefix;
///
/// # #[cfg(unix)]
/// # {
/// assert_eq!(trim_file_path_prefix("/src/app/data/x.txt", "/src/app"), "data/x.txt");
/// assert_eq!(trim_file_path_prefix("/src/app", "/src/app"), "");
/// assert_eq!(trim_file_path_prefix("/src/app2/x", "/src/app"), "/src/app2/x");
/// # }
/// ```
#[must_use]
pub fn trim_file_path_prefix<'a>(s: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() || !has_file_path_prefix(s, prefix) {
        return s;
    }

    let Some(trimmed) = s.get(prefix.len()..) else {
        return s;
    };

    if trimmed.as_bytes().first().is_some_and(|b| is_path_separator(*b)) {
        // Joining onto a bare drive letter is relative to that drive's working
        // directory, so the separator stays to keep the result absolute.
        let bare_drive = platform::is_windows()
            && prefix == volume_name(prefix)
            && prefix.len() == 2
            && prefix.as_bytes()[1] == b':';
        if !bare_drive {
            return &trimmed[1..];
        }
    }
    trimmed
}

/// Returns `s` with a trailing path separator, unless it is empty or already
/// ends in one.
#[must_use]
pub fn with_file_path_separator(s: &str) -> Cow<'_, str> {
    match s.as_bytes().last() {
        None => Cow::Borrowed(s),
        Some(b) if is_path_separator(*b) => Cow::Borrowed(s),
        Some(_) => Cow::Owned(format!("{s}{SEPARATOR}")),
    }
}

/// Quotes every glob metacharacter (`*`, `?`, `[`, `]`) in `s` so it matches
/// itself literally when used as a pattern prefix.
///
/// Escaping uses single-character classes (`[*]`), the quoting form understood
/// by the `glob` crate. Backslash is left alone because it is a real path
/// character on Windows.
///
/// # Examples
///
/// ```rust,no_run
/// use gosrcs::utils::path::quote_glob;
///
/// assert_eq!(quote_glob("/src/app"), "/src/app");
/// assert_eq!(quote_glob("/src/[v2]*"), "/src/[[]v2[]][*]");
/// ```
#[must_use]
pub fn quote_glob(s: &str) -> Cow<'_, str> {
    if !s.contains(['*', '?', '[', ']']) {
        return Cow::Borrowed(s);
    }

    let mut quoted = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '*' | '?' | '[' | ']' => {
                quoted.push('[');
                quoted.push(c);
                quoted.push(']');
            }
            _ => quoted.push(c),
        }
    }
    Cow::Owned(quoted)
}

/// Lexically cleans `path`: drops `.` elements and folds `..` into the
/// preceding element. The filesystem is not consulted, so symlinks are not
/// resolved.
///
/// `..` directly below the root is dropped; leading `..` of a relative path
/// are kept.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Expresses `target` relative to `base` in forward-slash form.
///
/// Both paths should be absolute. Targets outside `base` are expressed with
/// leading `..` elements.
///
/// # Errors
///
/// Returns [`GosrcsError::PathRelativization`] if no relative path exists
/// (for example a relative `target` against an absolute `base`, or different
/// Windows volumes).
pub fn relative_slash_path(base: &Path, target: &Path) -> Result<String, GosrcsError> {
    pathdiff::diff_paths(target, base)
        .map(|rel| platform::normalize_path_for_storage(&rel))
        .ok_or_else(|| GosrcsError::PathRelativization {
            base: base.display().to_string(),
            target: target.display().to_string(),
        })
}
