//! Core types for gosrcs
//!
//! Error handling is designed for both developer ergonomics and end-user
//! experience:
//! - **Strongly-typed errors** ([`GosrcsError`]) for precise handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions
//! - [`user_friendly_error`] to convert any `anyhow::Error` for CLI display

pub mod error;

pub use error::{ErrorContext, GosrcsError, user_friendly_error};
