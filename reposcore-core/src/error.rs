//! Error types for RepoScore core.

use std::{error::Error, fmt, io};

/// Error type for RepoScore core operations.
#[derive(Debug)]
pub enum RepoScoreError {
    /// A raw count field violated the non-negative precondition.
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// An underlying I/O error.
    Io(io::Error),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for RepoScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, value } => {
                write!(f, "invalid input: {field} is negative ({value})")
            }
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for RepoScoreError {}

impl From<io::Error> for RepoScoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Convenience result type for RepoScore core.
pub type Result<T> = std::result::Result<T, RepoScoreError>;
