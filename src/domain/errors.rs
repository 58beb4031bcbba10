//! Store-level error taxonomy
//!
//! Every recoverable failure a caller can observe is a distinct variant so
//! that a surrounding transport layer can map it to a stable error code.
//! Unexpected storage failures pass through as `Storage` and are never
//! downgraded to `DocumentNotFound`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::storage::StorageError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A single structured validation failure.
///
/// `path` is the location of the offending node as tokens from the document
/// root; `rule` names the violated constraint and `rule_value` carries the
/// constraint's parameter (the required list, the expected type, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub message: String,
    pub path: Vec<String>,
    pub rule: String,
    pub rule_value: Value,
}

impl Violation {
    /// Create a violation with an explicit rule parameter
    pub fn new(
        message: impl Into<String>,
        path: Vec<String>,
        rule: impl Into<String>,
        rule_value: Value,
    ) -> Self {
        Self {
            message: message.into(),
            path,
            rule: rule.into(),
            rule_value,
        }
    }

    /// Violation raised when reference resolution re-enters a schema
    pub fn circular_reference(schema_id: &str) -> Self {
        Self {
            message: format!("Circular reference detected: {}", schema_id),
            path: Vec::new(),
            rule: "ref_resolution".to_string(),
            rule_value: Value::String(schema_id.to_string()),
        }
    }

    /// Violation raised when a `#/` reference path has no referent
    pub fn unresolvable_reference(reference: &str) -> Self {
        Self {
            message: format!("Cannot resolve reference path: {}", reference),
            path: Vec::new(),
            rule: "ref_resolution".to_string(),
            rule_value: Value::String(reference.to_string()),
        }
    }
}

/// Store error type covering every caller-visible failure kind
#[derive(Debug, Error)]
pub enum StoreError {
    /// Target document does not exist (content or metadata missing)
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// A pointer did not resolve; carries the full original pointer string
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Optimistic lock rejected the write
    #[error("Version conflict: expected {expected}, but found {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    /// Schema conformance check failed; the list is non-empty and ordered
    #[error("Validation failed with {} error(s)", .0.len())]
    ValidationFailed(Vec<Violation>),

    /// Malformed pointer, root mutation attempt, or wrong-shape append parent
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Caller-supplied document id does not have the expected format
    #[error("Invalid document ID format: {0}")]
    InvalidId(String),

    /// Caller-supplied document id is already in use
    #[error("Document with ID {0} already exists")]
    AlreadyExists(String),

    /// Named schema does not exist in the schema store
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    /// Unexpected storage failure, propagated verbatim
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Stable snake_case code for transport layers
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DocumentNotFound(_) => "document_not_found",
            StoreError::PathNotFound(_) => "path_not_found",
            StoreError::VersionConflict { .. } => "version_conflict",
            StoreError::ValidationFailed(_) => "validation_failed",
            StoreError::InvalidOperation(_) => "invalid_operation",
            StoreError::InvalidId(_) => "invalid_id",
            StoreError::AlreadyExists(_) => "already_exists",
            StoreError::SchemaNotFound(_) => "schema_not_found",
            StoreError::Storage(_) => "storage_error",
        }
    }

    /// Returns the violation list for validation failures
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            StoreError::ValidationFailed(violations) => Some(violations),
            _ => None,
        }
    }
}
