//! Storage collaborators
//!
//! The store reads and writes two artifacts per document: its content tree
//! and its metadata record. Each write is individually atomic from the
//! perspective of concurrent readers; the content/metadata pair is written
//! content-first, and the narrow crash window between the two writes is an
//! accepted, documented inconsistency.

mod errors;
mod file;
mod memory;

pub use errors::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde_json::Value;

use crate::domain::DocumentMetadata;

/// Persistence interface for documents, metadata, and schemas.
///
/// Schemas are stored as ordinary documents, so a schema store is just a
/// second instance of the same trait.
pub trait Storage: Send + Sync {
    /// Reads a document tree by id. Fails `NotFound` when absent.
    fn read_document(&self, id: &str) -> StorageResult<Value>;

    /// Writes a document tree atomically.
    fn write_document(&self, id: &str, content: &Value) -> StorageResult<()>;

    /// Removes a document. Backends may decline with `Unsupported`.
    fn delete_document(&self, id: &str) -> StorageResult<()>;

    /// Returns a lexicographically sorted page of document ids.
    fn list_documents(&self, limit: usize, offset: usize) -> StorageResult<Vec<String>>;

    /// Reads a metadata record; `None` when absent.
    fn read_metadata(&self, id: &str) -> StorageResult<Option<DocumentMetadata>>;

    /// Writes a metadata record atomically.
    fn write_metadata(&self, id: &str, metadata: &DocumentMetadata) -> StorageResult<()>;
}
