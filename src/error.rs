//! Error types for the non-manual feature detection library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filter initialization or specifier parsing error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Label rule table is inconsistent
    #[error("Classifier error: {0}")]
    ClassifierError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Recorded landmark stream could not be parsed
    #[error("Recording error: {0}")]
    RecordingError(String),

    /// Dataset snapshot requested before any features were smoothed
    #[error("Nothing to save: no smoothed features available yet")]
    NothingToSave,
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
