//! Storage error types
//!
//! `NotFound` is a first-class variant so callers can distinguish "the key
//! does not exist" from genuine I/O or corruption failures without
//! inspecting message text. Everything else must propagate untouched.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage collaborator errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested key has no stored artifact
    #[error("Not found in storage: {0}")]
    NotFound(String),

    /// The backend does not implement this operation
    #[error("Storage operation not supported: {0}")]
    Unsupported(&'static str),

    /// Disk I/O failure
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stored artifact exists but does not parse
    #[error("Malformed JSON in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a corruption error with path context
    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }

    /// Returns whether this is the distinguishable not-found signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguishable() {
        let err = StorageError::NotFound("doc1".into());
        assert!(err.is_not_found());

        let io_err = StorageError::io(
            "/tmp/doc1.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io_err.is_not_found());
    }

    #[test]
    fn test_display_includes_path_context() {
        let err = StorageError::io(
            "/data/doc1.json",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        let display = format!("{}", err);
        assert!(display.contains("/data/doc1.json"));
        assert!(display.contains("disk full"));
    }
}
