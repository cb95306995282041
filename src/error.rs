//! Error handling for isa-perf
//!
//! Defines the typed errors raised at the statement and configuration
//! boundaries and a unified Result type using anyhow for context chaining.
//! The return calculator never fails; it maps degenerate input to 0.0.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning statements and config into portfolios
#[derive(Error, Debug)]
pub enum StatementError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("extraction error: {}: {message}", path.display())]
    ExtractionError { path: PathBuf, message: String },

    #[error("statements directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for statement and reporting operations
pub type Result<T> = anyhow::Result<T>;
