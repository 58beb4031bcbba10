//! Schema resolution error types

use thiserror::Error;

use crate::domain::{StoreError, Violation};
use crate::storage::StorageError;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema resolution errors
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema id has no stored document
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// Reference resolution re-entered a schema already being resolved
    #[error("Circular reference detected: {0}")]
    CircularReference(String),

    /// A `#/` fragment pointed at nothing in its base schema
    #[error("Cannot resolve reference path: {0}")]
    UnresolvableReference(String),

    /// Unexpected storage failure, propagated verbatim
    #[error(transparent)]
    Storage(StorageError),
}

// Reference problems surface through the same structured-violation channel
// as document validation; storage problems pass through untouched.
impl From<SchemaError> for StoreError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::NotFound(schema_id) => StoreError::SchemaNotFound(schema_id),
            SchemaError::CircularReference(schema_id) => {
                StoreError::ValidationFailed(vec![Violation::circular_reference(&schema_id)])
            }
            SchemaError::UnresolvableReference(reference) => {
                StoreError::ValidationFailed(vec![Violation::unresolvable_reference(&reference)])
            }
            SchemaError::Storage(e) => StoreError::Storage(e),
        }
    }
}
