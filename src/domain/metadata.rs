//! Per-document metadata
//!
//! Metadata is an immutable value: every successful mutation produces a new
//! instance via [`DocumentMetadata::bump`]. `doc_id`, `schema_id` and
//! `created_at` never change after creation; `version` increases by exactly
//! one per mutation and `updated_at` tracks the mutation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Versioning record stored alongside each document.
///
/// `schema_id` names the schema the document was created against; all later
/// mutations are validated against exactly this schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document identifier
    pub doc_id: String,
    /// Version for optimistic locking, starts at 1
    pub version: u64,
    /// Schema the document was created against
    pub schema_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl DocumentMetadata {
    /// Creates version-1 metadata for a freshly created document.
    pub fn new(doc_id: impl Into<String>, schema_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            doc_id: doc_id.into(),
            version: 1,
            schema_id: schema_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns new metadata with `version + 1` and a fresh update timestamp.
    pub fn bump(&self) -> Self {
        Self {
            doc_id: self.doc_id.clone(),
            version: self.version + 1,
            schema_id: self.schema_id.clone(),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}
