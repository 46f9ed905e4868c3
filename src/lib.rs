//! gosrcs: the files a Go package needs to build.
//!
//! Given a package directory inside a Go module, gosrcs computes the minimal,
//! deterministic set of files required to build that package and everything
//! it imports:
//!
//! - the Go sources and auxiliary files (C, assembly, syso, ...) of every
//!   package reached through imports inside the same module
//! - the same for packages of modules redirected to a local directory with a
//!   `replace` directive, transitively
//! - the files matched by `//go:embed` patterns, with the same boundary and
//!   naming rules the Go toolchain applies
//! - `go.mod` and `go.sum` of every module involved
//!
//! Standard library packages and external (non-replaced) dependencies are left
//! out. The output is meant for export tooling that builds hermetic archives or
//! container contexts without copying a whole source tree.
//!
//! # Architecture
//!
//! - [`manifest`]: reads the `module` and `replace` directives of `go.mod`
//! - [`graph`]: the package graph interface and the `go list` provider
//! - [`embed`]: expands `//go:embed` patterns into files
//! - [`analyzer`]: build units and the dependency closure walk
//! - [`utils`]: path comparison, trimming, and glob quoting
//! - [`core`]: errors and user-facing error reporting
//! - [`cli`]: the command-line surface
//!
//! # Example
//!
//! ```rust,no_run
//! use gosrcs::analyzer::{ListOptions, list_sources};
//! use gosrcs::graph::GoListProvider;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let files = list_sources(Path::new("."), &GoListProvider::new(None), &ListOptions::default())?;
//! println!("{} files", files.len());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cli;
pub mod core;
pub mod embed;
pub mod graph;
pub mod manifest;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
