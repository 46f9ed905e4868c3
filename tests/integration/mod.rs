//! Integration test suite for gosrcs
//!
//! End-to-end tests of [`gosrcs::analyzer::list_sources`] over real temporary
//! source trees, with package graphs served by
//! [`gosrcs::test_utils::StaticGraphProvider`] so no Go toolchain is needed,
//! plus tests of the binary's argument and error handling.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: the `gosrcs` binary (help, exit codes, error messages)
//! - **embed**: `//go:embed` boundaries, hidden names, invalid patterns
//! - **overrides**: local `replace` directives and their transitivity
//! - **properties**: determinism, order independence, no duplicates, exclusions
//! - **scenario**: a small module with an embedding app and a library

mod cli;
mod embed;
mod overrides;
mod properties;
mod scenario;

use gosrcs::core::GosrcsError;

/// The first [`GosrcsError`] in the chain of `err`.
pub fn gosrcs_error(err: &anyhow::Error) -> Option<&GosrcsError> {
    err.chain().find_map(|e| e.downcast_ref::<GosrcsError>())
}
