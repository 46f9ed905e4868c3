//! Package graphs from `go list`.
//!
//! The provider runs
//!
//! ```text
//! go list -e -json -deps [-tags a,b] <package-dir>
//! ```
//!
//! in the manifest directory. With `-json` the tool prints one JSON object per
//! package, back to back, dependencies before dependents; `-e` turns load
//! failures into an `Error` field instead of a non-zero exit, so errors can be
//! reported per package.
//!
//! Embed patterns are taken from `EmbedPatterns` and resolved by
//! [`crate::embed`]; the tool's own `EmbedFiles` list is ignored.

use std::path::PathBuf;
use std::process::{Command, Output};

use serde::Deserialize;
use tracing::debug;

use super::{LoadRequest, ModuleInfo, PackageGraph, PackageGraphBuilder, PackageGraphProvider, PackageSpec};
use crate::core::GosrcsError;
use crate::utils::platform::is_windows;

/// Name of the Go executable on this platform.
#[must_use]
pub const fn go_command_name() -> &'static str {
    if is_windows() { "go.exe" } else { "go" }
}

/// [`PackageGraphProvider`] backed by the `go` tool.
#[derive(Debug, Clone, Default)]
pub struct GoListProvider {
    go: Option<PathBuf>,
}

impl GoListProvider {
    /// Uses `go` if given, otherwise looks the tool up on `PATH` when the
    /// first graph is loaded.
    #[must_use]
    pub fn new(go: Option<PathBuf>) -> Self {
        Self {
            go,
        }
    }

    /// Uses exactly this binary.
    pub fn with_binary(go: impl Into<PathBuf>) -> Self {
        Self::new(Some(go.into()))
    }

    /// The binary this provider runs.
    ///
    /// # Errors
    ///
    /// [`GosrcsError::GoToolNotFound`] if no binary was configured and none
    /// is on `PATH`.
    pub fn go_binary(&self) -> Result<PathBuf, GosrcsError> {
        match &self.go {
            Some(go) => Ok(go.clone()),
            None => which::which(go_command_name()).map_err(|e| GosrcsError::GoToolNotFound {
                reason: e.to_string(),
            }),
        }
    }

    fn run(&self, request: &LoadRequest) -> Result<Output, GosrcsError> {
        let go = self.go_binary()?;
        let args = list_args(request);
        debug!("Executing command: {} {} (in {})", go.display(), args.join(" "), request.manifest_dir.display());

        let output = Command::new(&go)
            .args(&args)
            .current_dir(&request.manifest_dir)
            // Keeps `Dir` fields on the logical path when the checkout sits behind a symlink.
            .env("PWD", &request.manifest_dir)
            .output()
            .map_err(|e| GosrcsError::GraphLoadFailed {
                dir: request.manifest_dir.display().to_string(),
                reason: format!("failed to run {}: {e}", go.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GosrcsError::GraphLoadFailed {
                dir: request.manifest_dir.display().to_string(),
                reason: if stderr.is_empty() {
                    format!("go list exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }
        Ok(output)
    }
}

impl PackageGraphProvider for GoListProvider {
    fn load(&self, request: &LoadRequest) -> Result<PackageGraph, GosrcsError> {
        let output = self.run(request)?;
        decode_packages(&output.stdout, request)
    }
}

/// Arguments for one `go list` invocation.
fn list_args(request: &LoadRequest) -> Vec<String> {
    let mut args: Vec<String> = ["list", "-e", "-json", "-deps"].iter().map(ToString::to_string).collect();
    if !request.build_tags.is_empty() {
        args.push("-tags".to_string());
        args.push(request.build_tags.join(","));
    }
    args.push(request.package_dir.display().to_string());
    args
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedPackage {
    #[serde(default)]
    dir: PathBuf,
    import_path: String,
    #[serde(default)]
    module: Option<ListedModule>,
    #[serde(default)]
    dep_only: bool,
    #[serde(default)]
    go_files: Vec<String>,
    #[serde(default)]
    cgo_files: Vec<String>,
    #[serde(default, rename = "CFiles")]
    c_files: Vec<String>,
    #[serde(default, rename = "CXXFiles")]
    cxx_files: Vec<String>,
    #[serde(default, rename = "MFiles")]
    m_files: Vec<String>,
    #[serde(default, rename = "HFiles")]
    h_files: Vec<String>,
    #[serde(default, rename = "FFiles")]
    f_files: Vec<String>,
    #[serde(default, rename = "SFiles")]
    s_files: Vec<String>,
    #[serde(default)]
    swig_files: Vec<String>,
    #[serde(default, rename = "SwigCXXFiles")]
    swig_cxx_files: Vec<String>,
    #[serde(default)]
    syso_files: Vec<String>,
    #[serde(default)]
    embed_patterns: Vec<String>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    error: Option<ListedError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedModule {
    path: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default)]
    main: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedError {
    err: String,
}

impl ListedPackage {
    fn into_spec(self) -> PackageSpec {
        let dir = self.dir;
        let join_all = |files: Vec<String>| -> Vec<PathBuf> { files.into_iter().map(|f| dir.join(f)).collect() };

        let go_files = join_all([self.go_files, self.cgo_files].concat());
        let other_files = join_all(
            [
                self.c_files,
                self.cxx_files,
                self.m_files,
                self.h_files,
                self.f_files,
                self.s_files,
                self.swig_files,
                self.swig_cxx_files,
                self.syso_files,
            ]
            .concat(),
        );

        PackageSpec {
            import_path: self.import_path,
            module: self.module.map(|m| ModuleInfo {
                path: m.path,
                dir: m.dir,
                version: m.version,
                main: m.main,
            }),
            go_files,
            other_files,
            embed_patterns: self.embed_patterns,
            imports: self.imports,
            root: !self.dep_only,
            dir,
        }
    }
}

/// Decodes the concatenated JSON objects printed by `go list -json`.
fn decode_packages(stdout: &[u8], request: &LoadRequest) -> Result<PackageGraph, GosrcsError> {
    let package_dir = request.package_dir.display().to_string();

    let listed = serde_json::Deserializer::from_slice(stdout)
        .into_iter::<ListedPackage>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| GosrcsError::GraphLoadFailed {
            dir: request.manifest_dir.display().to_string(),
            reason: format!("cannot decode go list output: {e}"),
        })?;

    if listed.is_empty() {
        return Err(GosrcsError::NoPackagesFound {
            dir: package_dir,
        });
    }

    let errors: Vec<String> = listed
        .iter()
        .filter(|pkg| !pkg.dep_only)
        .filter_map(|pkg| pkg.error.as_ref().map(|e| e.err.clone()))
        .collect();
    if !errors.is_empty() {
        return Err(GosrcsError::PackageLoadErrors {
            errors,
        });
    }

    debug!("go list resolved {} package(s)", listed.len());
    let mut builder = PackageGraphBuilder::new();
    for pkg in listed {
        builder.package(pkg.into_spec());
    }
    builder.build(&package_dir)
}
