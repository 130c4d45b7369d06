//! Error types for the fixture harness.

use thiserror::Error;

/// Errors that can occur while loading or running a fixture.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The fixture text or TOML is malformed.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The fixture parsed but its parts do not fit together.
    #[error("invalid fixture: {message}")]
    Invalid { message: String },

    /// Error loading a fixture file.
    #[error("failed to load fixture: {path}: {message}")]
    Load { path: String, message: String },
}

/// Result type for harness operations.
pub type SpecResult<T> = Result<T, SpecError>;
