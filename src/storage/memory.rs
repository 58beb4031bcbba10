//! In-memory storage
//!
//! Mutex-guarded maps implementing the same contract as the file backend.
//! Used by tests and by embedders that do not need durability.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::errors::{StorageError, StorageResult};
use super::Storage;
use crate::domain::DocumentMetadata;

/// Volatile storage backed by two maps.
#[derive(Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, Value>>,
    metadata: Mutex<HashMap<String, DocumentMetadata>>,
}

// A poisoned lock still guards a structurally valid map; recover the guard.
fn guard<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document directly, bypassing the service layer.
    pub fn with_document(self, id: impl Into<String>, content: Value) -> Self {
        guard(&self.documents).insert(id.into(), content);
        self
    }
}

impl Storage for MemoryStorage {
    fn read_document(&self, id: &str) -> StorageResult<Value> {
        guard(&self.documents)
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn write_document(&self, id: &str, content: &Value) -> StorageResult<()> {
        guard(&self.documents).insert(id.to_string(), content.clone());
        Ok(())
    }

    fn delete_document(&self, _id: &str) -> StorageResult<()> {
        Err(StorageError::Unsupported("delete_document"))
    }

    fn list_documents(&self, limit: usize, offset: usize) -> StorageResult<Vec<String>> {
        let mut ids: Vec<String> = guard(&self.documents).keys().cloned().collect();
        ids.sort();
        Ok(ids.into_iter().skip(offset).take(limit).collect())
    }

    fn read_metadata(&self, id: &str) -> StorageResult<Option<DocumentMetadata>> {
        Ok(guard(&self.metadata).get(id).cloned())
    }

    fn write_metadata(&self, id: &str, metadata: &DocumentMetadata) -> StorageResult<()> {
        guard(&self.metadata).insert(id.to_string(), metadata.clone());
        Ok(())
    }
}
