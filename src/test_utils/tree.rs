//! Temporary source trees.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A source tree in a temporary directory, removed on drop.
///
/// Helpers panic on I/O failure; they are meant for tests only.
pub struct SourceTree {
    temp_dir: TempDir,
}

impl SourceTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Root of the tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `rel` (slash-separated) joined onto the root.
    #[must_use]
    pub fn join(&self, rel: &str) -> PathBuf {
        rel.split('/').fold(self.path().to_path_buf(), |path, elem| path.join(elem))
    }

    /// Writes a file, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write file");
        self
    }

    /// Writes several files at once.
    pub fn files(&self, files: &[(&str, &str)]) -> &Self {
        for (rel, content) in files {
            self.file(rel, content);
        }
        self
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}
