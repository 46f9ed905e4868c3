//! Resolved package graphs.
//!
//! Parsing Go source and resolving imports is delegated to a
//! [`PackageGraphProvider`]. The provider hands back a [`PackageGraph`]: an
//! arena of [`Package`] records indexed by [`PackageId`], where every import
//! edge points at another package in the same arena. Cycles are therefore
//! representable without shared ownership, and the walker in
//! [`crate::analyzer`] can track visits with plain ids.
//!
//! Two providers exist:
//!
//! - [`GoListProvider`] runs `go list -e -json -deps` and is what the binary uses
//! - `test_utils::StaticGraphProvider` serves a graph described in code
//!
//! Both build their graph through [`PackageGraphBuilder`], which resolves import
//! paths to ids and can assign packages to modules by import-path prefix.

pub mod go_list;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use tracing::trace;

use crate::core::GosrcsError;
use crate::utils::has_path_prefix;

pub use go_list::GoListProvider;

/// Index of a package inside its [`PackageGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId(usize);

impl PackageId {
    /// Position of the package in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The module a package belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Declared module path
    pub path: String,
    /// Directory holding the module's files, when known
    pub dir: Option<PathBuf>,
    /// Selected version; `None` for the main module and local replacements
    pub version: Option<String>,
    /// Whether this is the main module of the load
    pub main: bool,
}

impl ModuleInfo {
    /// A module with only a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dir: None,
            version: None,
            main: false,
        }
    }
}

/// One resolved package.
#[derive(Debug, Clone)]
pub struct Package {
    /// Import path, e.g. `example.com/app/lib`
    pub import_path: String,
    /// Absolute package directory
    pub dir: PathBuf,
    /// Owning module; `None` for platform-provided packages (the standard library)
    pub module: Option<ModuleInfo>,
    /// Absolute paths of the Go source files that take part in the build
    pub go_files: Vec<PathBuf>,
    /// Absolute paths of auxiliary files (C, assembly, syso, ...)
    pub other_files: Vec<PathBuf>,
    /// `//go:embed` patterns declared by the package, in source order
    pub embed_patterns: Vec<String>,
    /// Direct imports
    pub imports: Vec<PackageId>,
}

/// What a provider is asked to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Directory of the governing `go.mod`; the provider runs here
    pub manifest_dir: PathBuf,
    /// Directory of the package to resolve
    pub package_dir: PathBuf,
    /// Build tags to select files with
    pub build_tags: Vec<String>,
}

/// Source of resolved package graphs.
///
/// Implementations must report every load failure as a single error and
/// must not return a graph with zero roots.
pub trait PackageGraphProvider: Send + Sync {
    /// Resolves the requested package and everything it transitively imports.
    ///
    /// # Errors
    ///
    /// A graph-load variant of [`GosrcsError`] when the packages cannot be
    /// resolved.
    fn load(&self, request: &LoadRequest) -> Result<PackageGraph, GosrcsError>;
}

/// An arena of packages plus the roots that were requested.
#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    packages: Vec<Package>,
    roots: Vec<PackageId>,
    by_import_path: HashMap<String, PackageId>,
}

impl PackageGraph {
    /// The package stored under `id`.
    ///
    /// # Panics
    ///
    /// If `id` came from a different graph and is out of range.
    #[must_use]
    pub fn get(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }

    /// Looks a package up by import path.
    #[must_use]
    pub fn find(&self, import_path: &str) -> Option<PackageId> {
        self.by_import_path.get(import_path).copied()
    }

    /// The requested packages, in request order.
    #[must_use]
    pub fn roots(&self) -> &[PackageId] {
        &self.roots
    }

    /// Number of packages in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the graph holds no packages at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterates over all packages with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages.iter().enumerate().map(|(i, pkg)| (PackageId(i), pkg))
    }
}

/// A package whose imports are still import paths.
#[derive(Debug, Clone, Default)]
pub struct PackageSpec {
    /// Import path
    pub import_path: String,
    /// Absolute package directory
    pub dir: PathBuf,
    /// Owning module, if already known
    pub module: Option<ModuleInfo>,
    /// Absolute Go source files
    pub go_files: Vec<PathBuf>,
    /// Absolute auxiliary files
    pub other_files: Vec<PathBuf>,
    /// Embed patterns
    pub embed_patterns: Vec<String>,
    /// Imported import paths
    pub imports: Vec<String>,
    /// Whether the package was requested directly
    pub root: bool,
}

/// Assembles a [`PackageGraph`] from [`PackageSpec`]s.
#[derive(Debug, Default)]
pub struct PackageGraphBuilder {
    specs: Vec<PackageSpec>,
    modules: Vec<ModuleInfo>,
}

impl PackageGraphBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package. A later spec with the same import path replaces an earlier one.
    pub fn package(&mut self, spec: PackageSpec) -> &mut Self {
        if let Some(existing) = self.specs.iter_mut().find(|s| s.import_path == spec.import_path) {
            *existing = spec;
        } else {
            self.specs.push(spec);
        }
        self
    }

    /// Registers a module used to fill in [`PackageSpec::module`] when a
    /// spec leaves it empty.
    pub fn module(&mut self, module: ModuleInfo) -> &mut Self {
        self.modules.push(module);
        self
    }

    /// Resolves import paths to ids and produces the graph.
    ///
    /// Packages without a module are matched against the registered modules
    /// by longest import-path prefix; packages matching none stay
    /// platform-provided. Imports naming a package that is not in the graph
    /// (such as cgo's `C`) are dropped.
    ///
    /// # Errors
    ///
    /// [`GosrcsError::NoPackagesFound`] if no spec is marked as a root.
    pub fn build(self, package_dir: &str) -> Result<PackageGraph, GosrcsError> {
        let by_import_path: HashMap<String, PackageId> = self
            .specs
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.import_path.clone(), PackageId(i)))
            .collect();

        let mut roots = Vec::new();
        let mut packages = Vec::with_capacity(self.specs.len());
        for (i, spec) in self.specs.into_iter().enumerate() {
            if spec.root {
                roots.push(PackageId(i));
            }

            let imports = spec
                .imports
                .iter()
                .filter_map(|path| {
                    let id = by_import_path.get(path).copied();
                    if id.is_none() {
                        trace!("Dropping import {} of {}: not in graph", path, spec.import_path);
                    }
                    id
                })
                .collect();

            let module = spec.module.or_else(|| owning_module(&self.modules, &spec.import_path).cloned());

            packages.push(Package {
                import_path: spec.import_path,
                dir: spec.dir,
                module,
                go_files: spec.go_files,
                other_files: spec.other_files,
                embed_patterns: spec.embed_patterns,
                imports,
            });
        }

        if roots.is_empty() {
            return Err(GosrcsError::NoPackagesFound {
                dir: package_dir.to_string(),
            });
        }

        Ok(PackageGraph {
            packages,
            roots,
            by_import_path,
        })
    }
}

/// The module whose path is the longest prefix of `import_path`.
fn owning_module<'a>(modules: &'a [ModuleInfo], import_path: &str) -> Option<&'a ModuleInfo> {
    modules
        .iter()
        .filter(|m| !m.path.is_empty() && has_path_prefix(import_path, &m.path))
        .max_by_key(|m| m.path.len())
}
