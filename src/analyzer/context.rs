//! State of one resolution run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::trace;

use super::build_unit::BuildUnit;
use crate::core::GosrcsError;
use crate::utils::relative_slash_path;

/// A file needed by the build.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceFile {
    /// Forward-slash path relative to the base directory
    pub path: String,
    /// Import path of the package that needs the file; empty for manifests
    #[serde(rename = "importPath")]
    pub import_path: String,
}

/// Files collected so far, expressed relative to one base directory.
#[derive(Debug)]
pub struct FileSet {
    base_dir: PathBuf,
    files: Vec<SourceFile>,
}

impl FileSet {
    /// An empty set rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            files: Vec::new(),
        }
    }

    /// Directory every recorded path is relative to.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Records the file at absolute `path`, owned by `import_path`.
    ///
    /// # Errors
    ///
    /// [`GosrcsError::PathRelativization`] if `path` cannot be made relative
    /// to the base directory.
    pub fn add(&mut self, path: &Path, import_path: &str) -> Result<(), GosrcsError> {
        let rel = relative_slash_path(&self.base_dir, path)?;
        trace!("+ {} ({})", rel, if import_path.is_empty() { "manifest" } else { import_path });
        self.files.push(SourceFile {
            path: rel,
            import_path: import_path.to_string(),
        });
        Ok(())
    }

    /// Number of recorded entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The recorded files sorted by path, one entry per path.
    ///
    /// When several packages contributed the same path, the first recorded
    /// owner is kept.
    #[must_use]
    pub fn into_sorted(self) -> Vec<SourceFile> {
        let mut files = self.files;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|later, first| later.path == first.path);
        files
    }
}

/// Everything a single call to [`crate::analyzer::list_sources`] mutates.
///
/// Holds the entry unit, every unit reached through a local override (keyed
/// by the module path they were reached as), and the files collected so far.
/// Nothing here outlives the call.
#[derive(Debug)]
pub struct ResolutionContext {
    entry_key: String,
    pub(crate) units: HashMap<String, BuildUnit>,
    pub(crate) files: FileSet,
}

impl ResolutionContext {
    /// Starts a run for `entry`, recording its manifest files.
    ///
    /// # Errors
    ///
    /// Propagates relativization failures for the manifest files.
    pub fn new(entry: BuildUnit, base_dir: impl Into<PathBuf>) -> Result<Self, GosrcsError> {
        let mut files = FileSet::new(base_dir);
        entry.add_manifest_files(&mut files)?;

        let entry_key = entry.key().to_string();
        let mut units = HashMap::new();
        units.insert(entry_key.clone(), entry);

        Ok(Self {
            entry_key,
            units,
            files,
        })
    }

    /// Key of the entry unit.
    #[must_use]
    pub fn entry_key(&self) -> &str {
        &self.entry_key
    }

    /// The unit cached under `key`.
    #[must_use]
    pub fn unit(&self, key: &str) -> Option<&BuildUnit> {
        self.units.get(key)
    }

    /// Directory every output path is relative to.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.files.base_dir()
    }

    /// Ends the run, returning the sorted, unique file list.
    #[must_use]
    pub fn into_files(self) -> Vec<SourceFile> {
        self.files.into_sorted()
    }
}
