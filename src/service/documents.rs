//! The document service
//!
//! Every operation is a self-contained read-modify-write: no internal
//! queues, timers, or cross-request locks. Optimistic versioning is the
//! only coordination between concurrent callers; a stale expected version
//! is rejected before any write happens.
//!
//! Mutations validate the entire resulting document against the schema the
//! document was created with (recorded in its metadata), never against
//! whichever schema happens to be cached. Partial validation cannot see
//! required-field sets or array length constraints, so there is no
//! field-level fast path.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{DocumentId, DocumentMetadata, StoreError, StoreResult};
use crate::observability::Logger;
use crate::pointer;
use crate::schema::SchemaResolver;
use crate::storage::{Storage, StorageError};
use crate::validation::Validator;

/// Orchestrates storage, schema resolution, and validation.
pub struct DocumentService {
    storage: Arc<dyn Storage>,
    resolver: SchemaResolver,
    validator: Validator,
}

impl DocumentService {
    /// Creates a service over a document store, schema resolver, and
    /// validator.
    pub fn new(storage: Arc<dyn Storage>, resolver: SchemaResolver, validator: Validator) -> Self {
        Self {
            storage,
            resolver,
            validator,
        }
    }

    /// Creates a document against a named schema.
    ///
    /// A caller-supplied id must be 26 uppercase alphanumeric characters
    /// and not already in use. Schema defaults are applied before
    /// validation. Returns the id and the version-1 metadata.
    pub fn create(
        &self,
        schema_id: &str,
        document: &Value,
        custom_id: Option<&str>,
    ) -> StoreResult<(String, DocumentMetadata)> {
        if let Some(id) = custom_id {
            if !DocumentId::is_valid(id) {
                return Err(StoreError::InvalidId(id.to_string()));
            }
            match self.storage.read_document(id) {
                Ok(_) => return Err(StoreError::AlreadyExists(id.to_string())),
                Err(StorageError::NotFound(_)) => {}
                Err(e) => return Err(StoreError::Storage(e)),
            }
        }

        let schema = self.resolver.load(schema_id)?;
        let document = self.validator.apply_defaults(document, &schema);
        self.validator.validate(&document, &schema)?;

        let id = custom_id
            .map(DocumentId::new)
            .unwrap_or_else(DocumentId::generate);
        let metadata = DocumentMetadata::new(id.as_str(), schema_id);

        self.storage.write_document(id.as_str(), &document)?;
        self.storage.write_metadata(id.as_str(), &metadata)?;

        Logger::info(
            "document_created",
            &[("doc_id", id.as_str()), ("schema_id", schema_id)],
        );
        Ok((id.into(), metadata))
    }

    /// Reads the value at `pointer` together with the current version.
    ///
    /// The empty pointer and `/` both read the whole document. Reads never
    /// mutate and take no version argument.
    pub fn read(&self, doc_id: &str, pointer: &str) -> StoreResult<(Value, u64)> {
        let (document, metadata) = self.load_pair(doc_id)?;

        let value = if is_root(pointer) {
            document
        } else {
            pointer::resolve(&document, pointer)?.clone()
        };

        Ok((value, metadata.version))
    }

    /// Replaces the value at `pointer`, guarded by the expected version.
    ///
    /// Returns the written value and the new version.
    pub fn update(
        &self,
        doc_id: &str,
        pointer: &str,
        value: Value,
        expected_version: u64,
    ) -> StoreResult<(Value, u64)> {
        let (document, metadata) = self.load_pair(doc_id)?;
        self.check_version(&metadata, expected_version)?;

        if is_root(pointer) {
            return Err(StoreError::InvalidOperation(
                "cannot replace the document root".to_string(),
            ));
        }

        let updated = pointer::set(&document, pointer, value.clone())?;
        let metadata = self.commit(&metadata, &updated)?;

        Logger::info(
            "node_updated",
            &[
                ("doc_id", doc_id),
                ("pointer", pointer),
                ("version", &metadata.version.to_string()),
            ],
        );
        Ok((value, metadata.version))
    }

    /// Appends `value` to the sequence at `parent_pointer`.
    ///
    /// Appending is defined for sequence parents only; a map or scalar
    /// parent is an invalid operation, not a validation failure. The
    /// insertion index is the new sequence length minus one.
    pub fn create_node(
        &self,
        doc_id: &str,
        parent_pointer: &str,
        value: Value,
        expected_version: u64,
    ) -> StoreResult<(Value, u64)> {
        let (document, metadata) = self.load_pair(doc_id)?;
        self.check_version(&metadata, expected_version)?;

        let mut updated = document;
        let parent = if is_root(parent_pointer) {
            &mut updated
        } else {
            pointer::resolve_mut(&mut updated, parent_pointer)?
        };

        match parent {
            Value::Array(items) => items.push(value.clone()),
            _ => {
                return Err(StoreError::InvalidOperation(format!(
                    "cannot append at {:?}: parent is not a sequence",
                    parent_pointer
                )))
            }
        }

        let metadata = self.commit(&metadata, &updated)?;

        Logger::info(
            "node_appended",
            &[
                ("doc_id", doc_id),
                ("pointer", parent_pointer),
                ("version", &metadata.version.to_string()),
            ],
        );
        Ok((value, metadata.version))
    }

    /// Removes the node at `pointer` and returns it with the new version.
    ///
    /// The root cannot be deleted, whatever state the document is in.
    pub fn delete_node(
        &self,
        doc_id: &str,
        pointer: &str,
        expected_version: u64,
    ) -> StoreResult<(Value, u64)> {
        if is_root(pointer) {
            return Err(StoreError::InvalidOperation(
                "cannot delete the document root".to_string(),
            ));
        }

        let (document, metadata) = self.load_pair(doc_id)?;
        self.check_version(&metadata, expected_version)?;

        let removed = pointer::resolve(&document, pointer)?.clone();
        let updated = pointer::delete(&document, pointer)?;
        let metadata = self.commit(&metadata, &updated)?;

        Logger::info(
            "node_deleted",
            &[
                ("doc_id", doc_id),
                ("pointer", pointer),
                ("version", &metadata.version.to_string()),
            ],
        );
        Ok((removed, metadata.version))
    }

    /// Returns a page of document metadata.
    ///
    /// Ids whose metadata is unexpectedly absent are skipped rather than
    /// failing the whole page.
    pub fn list(&self, limit: usize, offset: usize) -> StoreResult<Vec<DocumentMetadata>> {
        let ids = self.storage.list_documents(limit, offset)?;

        let mut page = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(metadata) = self.storage.read_metadata(&id)? {
                page.push(metadata);
            }
        }
        Ok(page)
    }

    /// Loads a document together with its metadata.
    ///
    /// Missing content and missing metadata both mean the document does not
    /// exist; any other storage failure propagates untouched.
    fn load_pair(&self, doc_id: &str) -> StoreResult<(Value, DocumentMetadata)> {
        let document = match self.storage.read_document(doc_id) {
            Ok(document) => document,
            Err(StorageError::NotFound(_)) => {
                return Err(StoreError::DocumentNotFound(doc_id.to_string()))
            }
            Err(e) => return Err(StoreError::Storage(e)),
        };

        let metadata = self
            .storage
            .read_metadata(doc_id)?
            .ok_or_else(|| StoreError::DocumentNotFound(doc_id.to_string()))?;

        Ok((document, metadata))
    }

    fn check_version(&self, metadata: &DocumentMetadata, expected: u64) -> StoreResult<()> {
        if metadata.version != expected {
            Logger::warn(
                "version_conflict",
                &[
                    ("doc_id", metadata.doc_id.as_str()),
                    ("expected", &expected.to_string()),
                    ("actual", &metadata.version.to_string()),
                ],
            );
            return Err(StoreError::VersionConflict {
                expected,
                actual: metadata.version,
            });
        }
        Ok(())
    }

    /// Validates the mutated document against its originating schema, then
    /// persists content first and bumped metadata second.
    fn commit(
        &self,
        metadata: &DocumentMetadata,
        document: &Value,
    ) -> StoreResult<DocumentMetadata> {
        let schema = self.resolver.load(&metadata.schema_id)?;
        self.validator.validate(document, &schema)?;

        let bumped = metadata.bump();
        self.storage.write_document(&metadata.doc_id, document)?;
        self.storage.write_metadata(&metadata.doc_id, &bumped)?;
        Ok(bumped)
    }
}

/// The empty pointer is the RFC 6901 root; `/` is accepted as an alias at
/// the service boundary (the engine itself reads `/` as one empty token).
fn is_root(pointer: &str) -> bool {
    pointer.is_empty() || pointer == "/"
}
