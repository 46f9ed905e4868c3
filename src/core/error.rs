//! Error handling for gosrcs
//!
//! This module provides the error types and user-facing error reporting for
//! the source lister. The error system follows two rules:
//! 1. **Strongly-typed errors** for precise handling in library code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`GosrcsError`] - Enumerated failure cases of a resolution run
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion for display
//!
//! # Error Categories
//!
//! - **Manifest**: [`GosrcsError::ManifestNotFound`], [`GosrcsError::ManifestReadError`],
//!   [`GosrcsError::ManifestParseError`]
//! - **Package graph**: [`GosrcsError::GoToolNotFound`], [`GosrcsError::GraphLoadFailed`],
//!   [`GosrcsError::NoPackagesFound`], [`GosrcsError::PackageLoadErrors`]
//! - **Embedding**: [`GosrcsError::Embed`], always carrying the offending pattern
//! - **Paths**: [`GosrcsError::PathRelativization`]
//!
//! Every error is fatal to the run. Nothing is retried, and no partial file
//! list is ever returned.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gosrcs::core::{GosrcsError, user_friendly_error};
//!
//! let error = GosrcsError::ManifestNotFound {
//!     start: "/src/app".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::embed::EmbedError;

/// The main error type for gosrcs operations
///
/// Fields are plain strings so the error stays `Clone` and can be re-wrapped
/// into an [`ErrorContext`] after travelling through `anyhow`.
#[derive(Error, Debug, Clone)]
pub enum GosrcsError {
    /// No `go.mod` between the starting directory and the filesystem root
    #[error("go.mod not found in {start} or any parent directory")]
    ManifestNotFound {
        /// Directory the upward search started from
        start: String,
    },

    /// Manifest exists but could not be read
    #[error("failed to read {file}: {reason}")]
    ManifestReadError {
        /// Path of the manifest file
        file: String,
        /// Underlying I/O failure
        reason: String,
    },

    /// Manifest syntax is invalid
    #[error("{file}:{line}: {reason}")]
    ManifestParseError {
        /// Path of the manifest file
        file: String,
        /// 1-based line of the offending directive
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The `go` executable could not be located
    #[error("go toolchain not found: {reason}")]
    GoToolNotFound {
        /// Why the lookup failed
        reason: String,
    },

    /// The package graph provider failed outright
    #[error("failed to load packages in {dir}: {reason}")]
    GraphLoadFailed {
        /// Directory the provider ran in
        dir: String,
        /// Provider output or decode failure
        reason: String,
    },

    /// The provider succeeded but resolved nothing
    #[error("no packages found for dir: {dir}")]
    NoPackagesFound {
        /// The requested package directory
        dir: String,
    },

    /// The provider reported errors for the requested packages
    #[error("errors loading package: {}", errors.join("; "))]
    PackageLoadErrors {
        /// One entry per reported package error
        errors: Vec<String>,
    },

    /// An embed directive could not be resolved
    #[error("package {import_path}: {error}")]
    Embed {
        /// Import path of the package declaring the directive
        import_path: String,
        /// Pattern-qualified embed failure
        error: EmbedError,
    },

    /// A path could not be expressed relative to the base directory
    #[error("cannot express {target} relative to {base}")]
    PathRelativization {
        /// Base directory
        base: String,
        /// Path that could not be relativized
        target: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` pairs a [`GosrcsError`] with optional details and a
/// suggestion, displayed in color on the terminal.
///
/// ```rust,no_run
/// use gosrcs::core::{ErrorContext, GosrcsError};
///
/// let context = ErrorContext::new(GosrcsError::NoPackagesFound {
///     dir: "/src/app".to_string(),
/// })
/// .with_suggestion("Check that the directory contains .go files")
/// .with_details("go list matched nothing");
///
/// println!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: GosrcsError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: GosrcsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`]
///
/// A [`GosrcsError`] anywhere in the chain selects tailored suggestions;
/// anything else is rendered with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(gosrcs_error) = error.chain().find_map(|e| e.downcast_ref::<GosrcsError>()) {
        return create_error_context(gosrcs_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::PermissionDenied
    {
        return ErrorContext::new(GosrcsError::Other {
            message: error.to_string(),
        })
        .with_suggestion("Check read permissions on the source tree")
        .with_details("Every directory reached by the walk must be readable");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(GosrcsError::Other {
        message,
    })
}

/// Maps each [`GosrcsError`] variant to suggestions and details.
fn create_error_context(error: GosrcsError) -> ErrorContext {
    match &error {
        GosrcsError::ManifestNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run gosrcs inside a Go module, or pass the package directory as an argument")
            .with_details("gosrcs looks for go.mod in the package directory and its parents up to the filesystem root"),

        GosrcsError::ManifestParseError { file, .. } => {
            let suggestion = format!("Run 'go mod edit -fmt' in the directory containing {file} to check its syntax");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        GosrcsError::GoToolNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Install Go from https://go.dev/dl/ or pass --go / set GOSRCS_GO to the go binary")
            .with_details("Package graphs are resolved with 'go list'"),

        GosrcsError::GraphLoadFailed { .. } | GosrcsError::PackageLoadErrors { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'go list -deps' in the module to see the full diagnostics")
            .with_details("Packages must load cleanly before their files can be listed"),

        GosrcsError::NoPackagesFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check that the directory contains buildable .go files for the selected tags"),

        GosrcsError::Embed { .. } => ErrorContext::new(error)
            .with_suggestion("Fix the //go:embed directive named in the error")
            .with_details("Embed patterns must match files inside the package's own module, excluding .git, .hg, .svn and .bzr"),

        _ => ErrorContext::new(error),
    }
}
