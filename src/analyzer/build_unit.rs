//! Build units: source trees governed by one `go.mod`.
//!
//! A [`BuildUnit`] knows three things:
//!
//! - where its files live and which module path it answers to
//! - which dependencies are redirected to local directories ([`LocalOverride`])
//! - which packages it has already contributed
//!
//! Only the entry unit's `replace` directives count. A unit reached through
//! an override inherits the entry unit's table, so overrides keep applying to
//! everything reached through them, and its own `replace` lines are ignored,
//! the same way the Go toolchain only honors the main module's replacements.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::context::FileSet;
use crate::core::GosrcsError;
use crate::embed::resolve_embed;
use crate::graph::{Package, PackageGraph, PackageId};
use crate::manifest::{CHECKSUM_FILE, GoModFile, MANIFEST_FILE};
use crate::utils::normalize_path;
use crate::utils::platform::from_slash;

/// A dependency redirected to a directory inside the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalOverride {
    /// Module path being replaced
    pub old_path: String,
    /// Absolute directory of the replacement
    pub dir: PathBuf,
    /// Pinned version; always empty for local-directory redirects
    pub version: String,
}

/// Override table shared by every unit of one run.
pub type OverrideTable = Arc<BTreeMap<String, LocalOverride>>;

/// Where an import leads, seen from the unit that imports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStep {
    /// Same unit as the importer
    SameUnit(PackageId),
    /// Back into the entry unit from an overridden one
    EntryUnit(PackageId),
    /// Into the unit a local override points at
    Override {
        /// Package to continue with
        package: PackageId,
        /// The override that applies
        target: LocalOverride,
    },
}

/// One `go.mod`-governed source tree.
#[derive(Debug)]
pub struct BuildUnit {
    root: PathBuf,
    module_path: String,
    key: String,
    entry_module: String,
    overrides: OverrideTable,
    processed: HashSet<String>,
}

impl BuildUnit {
    /// Loads the entry unit rooted at `root`.
    ///
    /// Its `replace` directives become the run's override table. A
    /// replacement counts as a local override only when it has no version and
    /// its target is a relative path; the target is resolved against `root`.
    ///
    /// # Errors
    ///
    /// Manifest read and parse errors.
    pub fn load(root: &Path) -> Result<Self, GosrcsError> {
        let manifest = GoModFile::load(&root.join(MANIFEST_FILE))?;

        let mut overrides = BTreeMap::new();
        for replacement in &manifest.replacements {
            let new = &replacement.new;
            if !new.version.is_empty() || Path::new(&new.path).is_absolute() {
                debug!(
                    "Ignoring replace {} => {} {} (line {}): not a local directory",
                    replacement.old.path, new.path, new.version, replacement.line
                );
                continue;
            }
            overrides.insert(
                replacement.old.path.clone(),
                LocalOverride {
                    old_path: replacement.old.path.clone(),
                    dir: normalize_path(&root.join(from_slash(&new.path))),
                    version: String::new(),
                },
            );
        }

        debug!(
            "Loaded build unit {} at {} with {} local override(s)",
            manifest.module_path,
            root.display(),
            overrides.len()
        );

        Ok(Self {
            root: root.to_path_buf(),
            key: manifest.module_path.clone(),
            entry_module: manifest.module_path.clone(),
            module_path: manifest.module_path,
            overrides: Arc::new(overrides),
            processed: HashSet::new(),
        })
    }

    /// Loads the unit `target` points at, inheriting `parent`'s overrides.
    ///
    /// # Errors
    ///
    /// Manifest read and parse errors for the override directory.
    pub fn for_override(target: &LocalOverride, parent: &Self) -> Result<Self, GosrcsError> {
        let manifest = GoModFile::load(&target.dir.join(MANIFEST_FILE))?;
        if manifest.module_path != target.old_path {
            warn!(
                "{} declares its path as {} but replaces {}",
                target.dir.join(MANIFEST_FILE).display(),
                manifest.module_path,
                target.old_path
            );
        }
        debug!("Loaded overridden build unit {} at {}", target.old_path, target.dir.display());

        Ok(Self {
            root: target.dir.clone(),
            module_path: manifest.module_path,
            key: target.old_path.clone(),
            entry_module: parent.entry_module.clone(),
            overrides: Arc::clone(&parent.overrides),
            processed: HashSet::new(),
        })
    }

    /// Absolute root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Module path declared in the unit's own `go.mod`.
    #[must_use]
    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Module path the unit is known by in this run.
    ///
    /// For the entry unit this is its declared path; for an overridden unit
    /// it is the path that was replaced.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The local overrides in effect.
    #[must_use]
    pub fn overrides(&self) -> &BTreeMap<String, LocalOverride> {
        &self.overrides
    }

    /// Whether `import_path` was already processed by this unit.
    #[must_use]
    pub fn is_processed(&self, import_path: &str) -> bool {
        self.processed.contains(import_path)
    }

    /// Records `go.mod` and, if present, `go.sum`.
    ///
    /// # Errors
    ///
    /// Relativization failures.
    pub fn add_manifest_files(&self, files: &mut FileSet) -> Result<(), GosrcsError> {
        files.add(&self.root.join(MANIFEST_FILE), "")?;
        let checksum = self.root.join(CHECKSUM_FILE);
        if checksum.is_file() {
            files.add(&checksum, "")?;
        }
        Ok(())
    }

    /// Contributes package `id` and reports where its imports lead.
    ///
    /// Does nothing and returns no steps if the package was already processed
    /// by this unit. Imports that are platform-provided, already processed,
    /// or owned by a module that is neither this unit, the entry unit, nor
    /// locally overridden are left out of the returned steps.
    ///
    /// # Errors
    ///
    /// Embed resolution and relativization failures.
    pub fn process_package(
        &mut self,
        id: PackageId,
        graph: &PackageGraph,
        files: &mut FileSet,
    ) -> Result<Vec<ImportStep>, GosrcsError> {
        let pkg = graph.get(id);
        if !self.processed.insert(pkg.import_path.clone()) {
            return Ok(Vec::new());
        }
        debug!("Processing package {} in unit {}", pkg.import_path, self.key);

        self.add_package_files(pkg, files)?;

        let mut steps = Vec::new();
        for &import in &pkg.imports {
            let dep = graph.get(import);
            if self.processed.contains(&dep.import_path) {
                continue;
            }
            if let Some(step) = self.classify(import, dep) {
                steps.push(step);
            }
        }
        Ok(steps)
    }

    fn add_package_files(&self, pkg: &Package, files: &mut FileSet) -> Result<(), GosrcsError> {
        for file in pkg.go_files.iter().chain(&pkg.other_files) {
            files.add(file, &pkg.import_path)?;
        }

        if !pkg.embed_patterns.is_empty() {
            let embedded = resolve_embed(&pkg.dir, &pkg.embed_patterns).map_err(|error| GosrcsError::Embed {
                import_path: pkg.import_path.clone(),
                error,
            })?;
            for rel in embedded {
                files.add(&pkg.dir.join(from_slash(&rel)), &pkg.import_path)?;
            }
        }
        Ok(())
    }

    fn classify(&self, id: PackageId, dep: &Package) -> Option<ImportStep> {
        let Some(module) = &dep.module else {
            trace!("Skipping {}: platform-provided", dep.import_path);
            return None;
        };

        if module.path == self.key {
            return Some(ImportStep::SameUnit(id));
        }
        if let Some(target) = self.overrides.get(&module.path) {
            return Some(ImportStep::Override {
                package: id,
                target: target.clone(),
            });
        }
        if module.path == self.entry_module {
            return Some(ImportStep::EntryUnit(id));
        }

        trace!("Skipping {}: external module {}", dep.import_path, module.path);
        None
    }
}
