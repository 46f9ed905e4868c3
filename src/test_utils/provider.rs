//! In-memory package graph provider.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::GosrcsError;
use crate::graph::{LoadRequest, ModuleInfo, PackageGraph, PackageGraphBuilder, PackageGraphProvider, PackageSpec};

/// Serves a fixed package graph, described with a builder API.
///
/// Packages are assigned to the registered module whose path is the longest
/// prefix of their import path; packages matching no module (and those added
/// with [`std_package`](Self::std_package)) are platform-provided.
#[derive(Debug, Default)]
pub struct StaticGraphProvider {
    modules: Vec<ModuleInfo>,
    packages: Vec<PackageSpec>,
    reverse_imports: bool,
    last_request: Mutex<Option<LoadRequest>>,
}

impl StaticGraphProvider {
    /// An empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module rooted at `dir`.
    #[must_use]
    pub fn module(mut self, path: &str, dir: impl AsRef<Path>) -> Self {
        self.modules.push(ModuleInfo {
            path: path.to_string(),
            dir: Some(dir.as_ref().to_path_buf()),
            version: None,
            main: self.modules.is_empty(),
        });
        self
    }

    /// Adds a package; `files` are Go files relative to `dir`.
    #[must_use]
    pub fn package(mut self, import_path: &str, dir: impl Into<PathBuf>, files: &[&str], imports: &[&str]) -> Self {
        let dir = dir.into();
        self.packages.push(PackageSpec {
            import_path: import_path.to_string(),
            go_files: files.iter().map(|f| dir.join(f)).collect(),
            imports: imports.iter().map(ToString::to_string).collect(),
            dir,
            ..PackageSpec::default()
        });
        self
    }

    /// Adds a platform-provided package with no files.
    #[must_use]
    pub fn std_package(mut self, import_path: &str) -> Self {
        self.packages.push(PackageSpec {
            import_path: import_path.to_string(),
            dir: PathBuf::from("/goroot/src").join(import_path),
            ..PackageSpec::default()
        });
        self
    }

    /// Adds auxiliary files (relative to the package dir) to a package.
    #[must_use]
    pub fn other_files(mut self, import_path: &str, files: &[&str]) -> Self {
        if let Some(spec) = self.spec_mut(import_path) {
            let dir = spec.dir.clone();
            spec.other_files.extend(files.iter().map(|f| dir.join(f)));
        }
        self
    }

    /// Sets the embed patterns of a package.
    #[must_use]
    pub fn embed(mut self, import_path: &str, patterns: &[&str]) -> Self {
        if let Some(spec) = self.spec_mut(import_path) {
            spec.embed_patterns = patterns.iter().map(ToString::to_string).collect();
        }
        self
    }

    /// Marks a package as requested.
    #[must_use]
    pub fn root(mut self, import_path: &str) -> Self {
        if let Some(spec) = self.spec_mut(import_path) {
            spec.root = true;
        }
        self
    }

    /// Serves every package's imports in reverse order.
    #[must_use]
    pub fn reversed_imports(mut self) -> Self {
        self.reverse_imports = !self.reverse_imports;
        self
    }

    /// The request of the most recent [`load`](PackageGraphProvider::load).
    pub fn last_request(&self) -> Option<LoadRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }

    fn spec_mut(&mut self, import_path: &str) -> Option<&mut PackageSpec> {
        self.packages.iter_mut().find(|s| s.import_path == import_path)
    }
}

impl PackageGraphProvider for StaticGraphProvider {
    fn load(&self, request: &LoadRequest) -> Result<PackageGraph, GosrcsError> {
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let mut builder = PackageGraphBuilder::new();
        for module in &self.modules {
            builder.module(module.clone());
        }
        for spec in &self.packages {
            let mut spec = spec.clone();
            if self.reverse_imports {
                spec.imports.reverse();
            }
            builder.package(spec);
        }
        builder.build(&request.package_dir.display().to_string())
    }
}
