//! Resolution of `//go:embed` patterns into concrete files.
//!
//! A package may ask for files to be bundled into its binary with embed
//! directives. Each directive carries one or more glob patterns, interpreted
//! relative to the package directory. This module expands those patterns the
//! way the Go toolchain does, so the file list matches what a build would
//! actually read.
//!
//! # Pattern Syntax
//!
//! - Patterns are slash-separated relative paths in Go's match syntax
//!   (`*`, `?`, `[...]`, `[^...]`, `\` escapes). They are rewritten for the
//!   `glob` crate before expansion; `**` means the same as `*`.
//! - A leading `all:` marker keeps files and directories whose names start
//!   with `.` or `_` when a pattern matches a directory.
//! - `.` on its own, empty elements, `..` and absolute paths are invalid.
//!
//! # Rules Enforced
//!
//! - **Module boundaries**: a match inside a directory that has its own
//!   `go.mod` is an error; while walking a matched directory, nested modules
//!   are silently skipped.
//! - **Portable names**: `.git`, `.hg`, `.svn`, `.bzr` and non-portable names
//!   are never embedded (see [`is_bad_embed_name`]).
//! - **Regular files only**: symlinks found while walking are skipped, and a
//!   pattern that directly matches an irregular file is an error.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gosrcs::embed::resolve_embed;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), gosrcs::embed::EmbedError> {
//! let files = resolve_embed(
//!     Path::new("/src/app"),
//!     &["templates/*.html".to_string(), "all:static".to_string()],
//! )?;
//! for file in files {
//!     println!("{file}"); // e.g. "static/.well-known/x", "templates/index.html"
//! }
//! # Ok(())
//! # }
//! ```

mod name;
mod pattern;

pub use name::{check_file_path, is_bad_embed_name};

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::manifest::MANIFEST_FILE;
use crate::utils::platform::{self, from_slash};
use crate::utils::{quote_glob, trim_file_path_prefix, with_file_path_separator};

/// Marker prefix that keeps hidden (`.`/`_`) names when walking directories.
pub const INCLUDE_HIDDEN_PREFIX: &str = "all:";

/// What an embed match turned out to be, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTarget {
    /// A regular (or irregular) file
    File,
    /// A directory
    Directory,
}

impl fmt::Display for EmbedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}

/// The specific way an embed pattern failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbedErrorKind {
    /// Not a valid glob, exactly `.`, or not a clean relative path
    #[error("invalid pattern syntax")]
    InvalidPatternSyntax,

    /// The glob engine rejected the expanded pattern
    #[error("{reason}")]
    Glob {
        /// Message from the glob engine, verbatim
        reason: String,
    },

    /// The pattern matched nothing
    #[error("no matching files found")]
    NoMatchingFiles,

    /// The match lies inside a nested module
    #[error("cannot embed {what} {rel}: in different module")]
    DifferentModule {
        /// Kind of the match
        what: EmbedTarget,
        /// Match path relative to the package directory
        rel: String,
    },

    /// An ancestor of the match is not a directory
    #[error("cannot embed {what} {rel}: in non-directory {dir}")]
    NonDirectory {
        /// Kind of the match
        what: EmbedTarget,
        /// Match path relative to the package directory
        rel: String,
        /// The offending ancestor, relative to the package directory
        dir: String,
    },

    /// The match itself has a reserved or non-portable name
    #[error("cannot embed {what} {rel}: invalid name {elem}")]
    InvalidName {
        /// Kind of the match
        what: EmbedTarget,
        /// Match path relative to the package directory
        rel: String,
        /// The offending base name
        elem: String,
    },

    /// An ancestor of the match has a reserved or non-portable name
    #[error("cannot embed {what} {rel}: in invalid directory {elem}")]
    InvalidDirectory {
        /// Kind of the match
        what: EmbedTarget,
        /// Match path relative to the package directory
        rel: String,
        /// The offending directory name
        elem: String,
    },

    /// The match is neither a regular file nor a directory
    #[error("cannot embed irregular file {rel}")]
    IrregularFile {
        /// Match path relative to the package directory
        rel: String,
    },

    /// A matched directory contributed no files
    #[error("cannot embed directory {rel}: contains no embeddable files")]
    EmptyDirectory {
        /// Match path relative to the package directory
        rel: String,
    },

    /// Stat or directory listing failed
    #[error("{path}: {reason}")]
    Io {
        /// Path being inspected
        path: String,
        /// Underlying I/O failure
        reason: String,
    },
}

/// An embed failure, tagged with the pattern that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("pattern {pattern}: {kind}")]
pub struct EmbedError {
    /// The pattern as written, including any `all:` marker
    pub pattern: String,
    /// What went wrong
    pub kind: EmbedErrorKind,
}

/// Expands embed `patterns` against `pkg_dir`.
///
/// Returns every matched file as a forward-slash path relative to `pkg_dir`,
/// deduplicated across patterns and sorted lexicographically. Patterns are
/// processed in order and the first failure aborts the whole call.
///
/// # Errors
///
/// Returns an [`EmbedError`] naming the failing pattern; see
/// [`EmbedErrorKind`] for the possible causes.
pub fn resolve_embed(pkg_dir: &Path, patterns: &[String]) -> Result<Vec<String>, EmbedError> {
    debug!("Resolving {} embed pattern(s) in {}", patterns.len(), pkg_dir.display());

    let mut resolver = EmbedResolver::new(pkg_dir);
    for (pid, pattern) in patterns.iter().enumerate() {
        resolver.expand(pid + 1, pattern).map_err(|kind| EmbedError {
            pattern: pattern.clone(),
            kind,
        })?;
    }

    Ok(resolver.have.into_keys().collect())
}

/// Per-call state shared across patterns.
struct EmbedResolver {
    pkg_dir_str: String,
    /// Matched file -> id of the last pattern that recorded it
    have: BTreeMap<String, usize>,
    /// Ancestors already checked for module boundaries and names
    dir_ok: HashSet<PathBuf>,
}

impl EmbedResolver {
    fn new(pkg_dir: &Path) -> Self {
        Self {
            pkg_dir_str: pkg_dir.to_string_lossy().into_owned(),
            have: BTreeMap::new(),
            dir_ok: HashSet::new(),
        }
    }

    fn expand(&mut self, pid: usize, pattern: &str) -> Result<(), EmbedErrorKind> {
        let (glob, all) = match pattern.strip_prefix(INCLUDE_HIDDEN_PREFIX) {
            Some(rest) => (rest, true),
            None => (pattern, false),
        };
        if !valid_embed_pattern(glob) {
            return Err(EmbedErrorKind::InvalidPatternSyntax);
        }
        let Some(translated) = pattern::translate(glob).filter(|p| glob::Pattern::new(p).is_ok()) else {
            return Err(EmbedErrorKind::InvalidPatternSyntax);
        };

        let full = format!(
            "{}{}",
            quote_glob(&with_file_path_separator(&self.pkg_dir_str)),
            from_slash(&translated)
        );
        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        let matches = glob::glob_with(&full, options).map_err(|e| EmbedErrorKind::Glob {
            reason: e.to_string(),
        })?;

        let mut added = 0usize;
        for entry in matches {
            let file = match entry {
                Ok(file) => file,
                Err(e) => {
                    trace!("Skipping unreadable path {}: {}", e.path().display(), e.error());
                    continue;
                }
            };
            added += self.add_match(pid, &file, all)?;
        }

        if added == 0 {
            return Err(EmbedErrorKind::NoMatchingFiles);
        }
        trace!("Pattern '{}' contributed {} file(s)", pattern, added);
        Ok(())
    }

    /// Validates one glob match and records the files it stands for.
    fn add_match(&mut self, pid: usize, file: &Path, all: bool) -> Result<usize, EmbedErrorKind> {
        let rel = self.rel(file);

        let info = fs::metadata(file).map_err(|e| EmbedErrorKind::Io {
            path: file.display().to_string(),
            reason: e.to_string(),
        })?;
        let what = if info.is_dir() {
            EmbedTarget::Directory
        } else {
            EmbedTarget::File
        };

        self.check_ancestors(file, what, &rel)?;

        if info.is_file() {
            return Ok(usize::from(self.record(pid, rel)));
        }
        if !info.is_dir() {
            return Err(EmbedErrorKind::IrregularFile {
                rel,
            });
        }

        let mut count = 0usize;
        let mut added = 0usize;
        let walker = WalkDir::new(file)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| keep_walk_entry(entry, all));
        for entry in walker {
            let entry = entry.map_err(|e| EmbedErrorKind::Io {
                path: e.path().map_or_else(|| file.display().to_string(), |p| p.display().to_string()),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            count += 1;
            let rel = self.rel(entry.path());
            added += usize::from(self.record(pid, rel));
        }

        if count == 0 {
            return Err(EmbedErrorKind::EmptyDirectory {
                rel,
            });
        }
        Ok(added)
    }

    /// Walks from the match up to the package directory, rejecting nested
    /// modules, non-directory ancestors and bad names along the way.
    fn check_ancestors(&mut self, file: &Path, what: EmbedTarget, rel: &str) -> Result<(), EmbedErrorKind> {
        let floor = self.pkg_dir_str.len() + 1;
        let mut dir = file.to_path_buf();

        while dir.as_os_str().len() > floor && !self.dir_ok.contains(&dir) {
            if dir.join(MANIFEST_FILE).exists() {
                return Err(EmbedErrorKind::DifferentModule {
                    what,
                    rel: rel.to_string(),
                });
            }
            if dir != file
                && let Ok(meta) = fs::symlink_metadata(&dir)
                && !meta.is_dir()
            {
                let dir_str = dir.to_string_lossy();
                return Err(EmbedErrorKind::NonDirectory {
                    what,
                    rel: rel.to_string(),
                    dir: dir_str.get(floor..).unwrap_or_default().to_string(),
                });
            }
            self.dir_ok.insert(dir.clone());

            let elem = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if is_bad_embed_name(elem) {
                let (rel, elem) = (rel.to_string(), elem.to_string());
                return Err(if dir == file {
                    EmbedErrorKind::InvalidName {
                        what,
                        rel,
                        elem,
                    }
                } else {
                    EmbedErrorKind::InvalidDirectory {
                        what,
                        rel,
                        elem,
                    }
                });
            }

            let Some(parent) = dir.parent().map(Path::to_path_buf) else {
                break;
            };
            dir = parent;
        }
        Ok(())
    }

    /// Records `rel` for pattern `pid`; returns whether this pattern had not
    /// recorded it yet.
    fn record(&mut self, pid: usize, rel: String) -> bool {
        if self.have.get(&rel) == Some(&pid) {
            return false;
        }
        trace!("Embedding {}", rel);
        self.have.insert(rel, pid);
        true
    }

    fn rel(&self, path: &Path) -> String {
        let path = path.to_string_lossy();
        let trimmed = trim_file_path_prefix(&path, &self.pkg_dir_str);
        platform::normalize_path_for_storage(Path::new(trimmed))
    }
}

/// Decides whether the directory walk keeps (and descends into) an entry.
fn keep_walk_entry(entry: &DirEntry, all: bool) -> bool {
    if entry.depth() > 0 {
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };
        if is_bad_embed_name(name) {
            return false;
        }
        // Hidden names need `all:`.
        if !all && (name.starts_with('.') || name.starts_with('_')) {
            return false;
        }
    }
    !(entry.file_type().is_dir() && entry.path().join(MANIFEST_FILE).exists())
}

/// An embed glob must be a clean relative slash path other than `.`.
fn valid_embed_pattern(glob: &str) -> bool {
    glob != "." && glob.split('/').all(|elem| !elem.is_empty() && elem != "." && elem != "..")
}
