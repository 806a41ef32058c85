//! Error types shared by every casebook crate
//!
//! Storage and service layers report failures through [`Error`]; the root
//! crate converts it into the public facade error.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the core, storage and engine crates
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading, writing or reorganising test cases
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem operation failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON could not be parsed or produced
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// File, folder or step does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Destination already occupied
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// File or folder name is not usable
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Record failed a validation rule (e.g. blank name)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Operation is not allowed in the current state
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the error reports a missing entity
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
