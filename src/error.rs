//! Unified error type for casebook.
//!
//! Wraps the errors of the internal crates and presents a stable interface
//! to applications.

use std::path::PathBuf;
use thiserror::Error;

/// All casebook errors.
#[derive(Debug, Error)]
pub enum Error {
    /// File, folder or step not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Target already exists (name clash on create, rename, attach)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unusable file, folder or field name
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Record failed validation
    #[error("validation failed: {0}")]
    Validation(String),

    /// Operation not allowed in the current state
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Configuration could not be read
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON could not be read or written
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for casebook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Check if the caller supplied bad input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidName(_) | Error::Validation(_) | Error::InvalidOperation(_)
        )
    }
}

// Convert from internal core errors
impl From<casebook_core::Error> for Error {
    fn from(e: casebook_core::Error) -> Self {
        use casebook_core::Error as CoreError;
        match e {
            CoreError::Io { path, source } => Error::Io { path, source },
            CoreError::SerializationError(msg) => Error::Serialization(msg),
            CoreError::NotFound(what) => Error::NotFound(what),
            CoreError::AlreadyExists(what) => Error::Conflict(what),
            CoreError::InvalidName(msg) => Error::InvalidName(msg),
            CoreError::ValidationError(msg) => Error::Validation(msg),
            CoreError::InvalidOperation(msg) => Error::InvalidOperation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: Error = casebook_core::Error::AlreadyExists("a.json".into()).into();
        assert!(err.is_conflict());
        let err: Error = casebook_core::Error::NotFound("a.json".into()).into();
        assert!(err.is_not_found());
        let err: Error = casebook_core::Error::ValidationError("blank".into()).into();
        assert!(err.is_invalid_input());
        let err: Error =
            casebook_core::Error::io("x", std::io::ErrorKind::NotFound.into()).into();
        assert!(err.is_not_found());
    }
}
