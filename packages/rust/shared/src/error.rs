//! Error types for websift.
//!
//! Library crates use [`WebsiftError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all websift operations.
///
/// Only configuration errors are fatal; everything that happens per page or
/// per link during a crawl is recovered locally by the caller.
#[derive(Debug, thiserror::Error)]
pub enum WebsiftError {
    /// Configuration loading or validation error (bad start URL, bad regex).
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error during a fetch.
    #[error("network error: {0}")]
    Network(String),

    /// HTML-to-Markdown conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Output sink write error.
    #[error("sink error: {0}")]
    Sink(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WebsiftError>;

impl WebsiftError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
