//! Listing the files a Go package needs to build.
//!
//! [`list_sources`] is the entry point. Given a package directory it
//!
//! 1. finds the governing `go.mod` by walking up from the directory
//! 2. asks a [`PackageGraphProvider`] for the package and its transitive imports
//! 3. loads the entry [`BuildUnit`] and records its manifest files
//! 4. walks the import graph, crossing into locally overridden units and
//!    leaving out platform-provided and external packages
//! 5. returns every collected file once, sorted by path
//!
//! Each package contributes its Go sources, its auxiliary files and the files
//! matched by its `//go:embed` patterns.
//!
//! # Example
//!
//! ```rust,no_run
//! use gosrcs::analyzer::{ListOptions, list_sources};
//! use gosrcs::graph::GoListProvider;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let provider = GoListProvider::new(None);
//! let files = list_sources(Path::new("./cmd/server"), &provider, &ListOptions::default())?;
//! for file in files {
//!     println!("{}", file.path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod build_unit;
pub mod context;
pub mod walker;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::graph::{LoadRequest, PackageGraphProvider};
use crate::manifest::find_manifest_dir;
use crate::utils::normalize_path;

pub use build_unit::{BuildUnit, ImportStep, LocalOverride};
pub use context::{FileSet, ResolutionContext, SourceFile};

/// Settings for one [`list_sources`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Directory output paths are relative to; defaults to the entry unit's root
    pub base_dir: Option<PathBuf>,
    /// Build tags handed to the package graph provider
    pub build_tags: Vec<String>,
    /// Explicit `go` binary; looked up on `PATH` when `None`
    pub go_binary: Option<PathBuf>,
}

/// Lists every file needed to build the package in `package_dir`.
///
/// # Errors
///
/// Fails if no `go.mod` governs the directory, the provider cannot load the
/// package graph, a manifest along the way is invalid, an embed pattern
/// cannot be resolved, or a file cannot be expressed relative to the base
/// directory. No partial list is returned.
pub fn list_sources(
    package_dir: &Path,
    provider: &dyn PackageGraphProvider,
    options: &ListOptions,
) -> Result<Vec<SourceFile>> {
    let package_dir = std::path::absolute(package_dir)
        .map(|dir| normalize_path(&dir))
        .with_context(|| format!("Failed to resolve package directory {}", package_dir.display()))?;
    let manifest_dir = find_manifest_dir(&package_dir)?;
    info!("Listing sources of {} (module root {})", package_dir.display(), manifest_dir.display());

    let graph = provider.load(&LoadRequest {
        manifest_dir: manifest_dir.clone(),
        package_dir: package_dir.clone(),
        build_tags: options.build_tags.clone(),
    })?;
    debug!("Package graph has {} package(s), {} root(s)", graph.len(), graph.roots().len());

    let entry = BuildUnit::load(&manifest_dir)?;
    let base_dir = match &options.base_dir {
        Some(dir) => std::path::absolute(dir)
            .map(|dir| normalize_path(&dir))
            .with_context(|| format!("Failed to resolve base directory {}", dir.display()))?,
        None => entry.root().to_path_buf(),
    };

    let mut ctx = ResolutionContext::new(entry, base_dir)?;
    debug!("Output paths are relative to {}", ctx.base_dir().display());
    walker::walk(&graph, &mut ctx)
        .with_context(|| format!("Failed to list sources of {}", package_dir.display()))?;

    let files = ctx.into_files();
    info!("Found {} file(s)", files.len());
    Ok(files)
}

/// Just the paths of `files`, in order.
#[must_use]
pub fn paths(files: &[SourceFile]) -> Vec<String> {
    files.iter().map(|f| f.path.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SourceTree, StaticGraphProvider};

    #[test]
    fn test_lists_entry_package_and_same_unit_imports() {
        crate::test_utils::init_test_logging(None);
        let tree = SourceTree::new();
        tree.file("go.mod", "module example.com/m\n")
            .file("app/app.go", "package main\n")
            .file("lib/a.go", "package lib\n");

        let provider = StaticGraphProvider::new()
            .module("example.com/m", tree.path())
            .package("example.com/m/app", tree.path().join("app"), &["app.go"], &["example.com/m/lib", "fmt"])
            .package("example.com/m/lib", tree.path().join("lib"), &["a.go"], &[])
            .std_package("fmt")
            .root("example.com/m/app");

        let files = list_sources(&tree.path().join("app"), &provider, &ListOptions::default()).unwrap();
        assert_eq!(paths(&files), vec!["app/app.go", "go.mod", "lib/a.go"]);
        assert_eq!(files[0].import_path, "example.com/m/app");
        assert_eq!(files[1].import_path, "");
    }

    #[test]
    fn test_base_dir_option() {
        let tree = SourceTree::new();
        tree.file("go.mod", "module m\n").file("app/app.go", "package main\n");
        let provider = StaticGraphProvider::new()
            .module("m", tree.path())
            .package("m/app", tree.path().join("app"), &["app.go"], &[])
            .root("m/app");

        let options = ListOptions {
            base_dir: Some(tree.path().join("app")),
            ..ListOptions::default()
        };
        let files = list_sources(&tree.path().join("app"), &provider, &options).unwrap();
        assert_eq!(paths(&files), vec!["../go.mod", "app.go"]);
    }

    #[test]
    fn test_build_tags_reach_provider() {
        let tree = SourceTree::new();
        tree.file("go.mod", "module m\n").file("x.go", "package x\n");
        let provider = StaticGraphProvider::new()
            .module("m", tree.path())
            .package("m", tree.path(), &["x.go"], &[])
            .root("m");

        let options = ListOptions {
            build_tags: vec!["integration".to_string()],
            ..ListOptions::default()
        };
        list_sources(tree.path(), &provider, &options).unwrap();
        let request = provider.last_request().unwrap();
        assert_eq!(request.build_tags, vec!["integration"]);
        assert_eq!(request.manifest_dir, tree.path());
    }
}
