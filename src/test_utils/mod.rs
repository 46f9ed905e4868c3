//! Test utilities for gosrcs
//!
//! Fixtures shared by the unit tests and the `tests/integration` suite:
//!
//! - [`SourceTree`]: a temporary source tree built file by file
//! - [`StaticGraphProvider`]: a package graph provider described in code, so
//!   tests never need a Go toolchain
//! - [`init_test_logging`]: opt-in tracing output for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use gosrcs::analyzer::{ListOptions, list_sources};
//! use gosrcs::test_utils::{SourceTree, StaticGraphProvider};
//!
//! let tree = SourceTree::new();
//! tree.file("go.mod", "module m\n").file("main.go", "package main\n");
//!
//! let provider = StaticGraphProvider::new()
//!     .module("m", tree.path())
//!     .package("m", tree.path(), &["main.go"], &[])
//!     .root("m");
//!
//! let files = list_sources(tree.path(), &provider, &ListOptions::default()).unwrap();
//! assert_eq!(files.len(), 2);
//! ```

mod provider;
mod tree;

pub use provider::StaticGraphProvider;
pub use tree::SourceTree;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Installs a test-writer subscriber once per process. `level` wins if
/// given; otherwise `RUST_LOG` is used, and without either nothing is logged.
///
/// ```bash
/// RUST_LOG=gosrcs=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
