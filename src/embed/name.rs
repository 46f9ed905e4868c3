//! File name rules for embeddable files.
//!
//! A file can only be embedded if it would survive being packaged into a
//! module archive: its name must be a portable path element, and it must not
//! be version-control metadata.

/// Version-control directories that never make it into a module archive.
const VCS_DIRS: &[&str] = &[".bzr", ".hg", ".git", ".svn"];

/// Names Windows reserves regardless of extension.
const BAD_WINDOWS_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reports whether `name` is the base name of a file that can't or won't be
/// included in a module, and therefore must not be treated as embeddable.
///
/// ```rust,no_run
/// use gosrcs::embed::is_bad_embed_name;
///
/// assert!(is_bad_embed_name(".git"));
/// assert!(is_bad_embed_name(""));
/// assert!(is_bad_embed_name("a*b"));
/// assert!(!is_bad_embed_name("index.html"));
/// assert!(!is_bad_embed_name(".hidden"));
/// ```
#[must_use]
pub fn is_bad_embed_name(name: &str) -> bool {
    name.is_empty() || VCS_DIRS.contains(&name) || check_file_path(name).is_err()
}

/// Checks that a slash-separated file path is portable across operating
/// systems and file systems.
///
/// The rules: non-empty, no leading or trailing slash, no empty elements, no
/// element made only of dots, no element ending in a dot, only letters, digits
/// and the punctuation ``!#$%&()+,-.=@[]^_{}~`` plus space, and no Windows
/// reserved name before the first dot of an element.
///
/// # Errors
///
/// Returns a description of the first rule the path breaks.
pub fn check_file_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("empty string".to_string());
    }
    if path.contains("//") {
        return Err("double slash".to_string());
    }
    if path.ends_with('/') {
        return Err("trailing slash".to_string());
    }
    path.split('/').try_for_each(check_elem).map_err(|reason| format!("{path}: {reason}"))
}

fn check_elem(elem: &str) -> Result<(), String> {
    if elem.is_empty() {
        return Err("empty path element".to_string());
    }
    if elem.chars().all(|c| c == '.') {
        return Err(format!("invalid path element {elem:?}"));
    }
    if elem.ends_with('.') {
        return Err("trailing dot in path element".to_string());
    }
    if let Some(c) = elem.chars().find(|c| !file_name_ok(*c)) {
        return Err(format!("invalid char {c:?}"));
    }

    let short = elem.split_once('.').map_or(elem, |(short, _)| short);
    if BAD_WINDOWS_NAMES.iter().any(|bad| bad.eq_ignore_ascii_case(short)) {
        return Err(format!("{short:?} disallowed as path element component on Windows"));
    }
    Ok(())
}

fn file_name_ok(c: char) -> bool {
    if c.is_ascii() {
        // Shell specials (" ' * < > ? ` |) and separators (/ : \) are out.
        const ALLOWED: &str = "!#$%&()+,-.=@[]^_{}~ ";
        return c.is_ascii_alphanumeric() || ALLOWED.contains(c);
    }
    c.is_alphabetic()
}
