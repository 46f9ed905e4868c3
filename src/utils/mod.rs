//! Cross-platform path utilities
//!
//! This module provides the pure path helpers the resolver is built on. All
//! utilities behave consistently across Windows, macOS, and Linux.
//!
//! # Modules
//!
//! - [`path`] - Prefix-safe path comparison, trimming, glob quoting, relativization
//! - [`platform`] - Separator and volume-name conventions, forward-slash normalization
//!
//! # Example
//!
//! ```rust,no_run
//! use gosrcs::utils::{has_file_path_prefix, quote_glob, trim_file_path_prefix};
//!
//! # #[cfg(unix)]
//! # {
//! assert!(has_file_path_prefix("/src/app/data", "/src/app"));
//! assert_eq!(trim_file_path_prefix("/src/app/data", "/src/app"), "data");
//! assert_eq!(quote_glob("v[1]"), "v[[]1[]]");
//! # }
//! ```

pub mod path;
pub mod platform;

pub use path::{
    has_file_path_prefix, has_path_prefix, normalize_path, quote_glob, relative_slash_path, trim_file_path_prefix,
    with_file_path_separator,
};
pub use platform::normalize_path_for_storage;
