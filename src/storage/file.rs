//! File system storage
//!
//! One `<id>.json` per document and one `<id>.meta.json` per metadata
//! record. Every write goes to a temporary sibling first, is flushed and
//! fsynced, then atomically renamed over the target, so a concurrent reader
//! never observes a half-written artifact. The temporary file is removed on
//! any failure.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::{StorageError, StorageResult};
use super::Storage;
use crate::domain::DocumentMetadata;

const DOC_SUFFIX: &str = ".json";
const META_SUFFIX: &str = ".meta.json";

/// File-backed storage rooted at a single directory.
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Opens storage at `base_dir`, creating the directory if missing.
    pub fn open(base_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| StorageError::io(&base_dir, e))?;
        Ok(Self { base_dir })
    }

    /// Returns the storage root directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{}{}", id, DOC_SUFFIX))
    }

    fn metadata_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{}{}", id, META_SUFFIX))
    }

    /// Writes `content` to `path` via temp file, fsync, then atomic rename.
    fn write_atomic(&self, path: &Path, content: &str) -> StorageResult<()> {
        let tmp_path = path.with_extension("tmp");

        let result = (|| {
            let mut file = File::create(&tmp_path).map_err(|e| StorageError::io(&tmp_path, e))?;
            file.write_all(content.as_bytes())
                .map_err(|e| StorageError::io(&tmp_path, e))?;
            file.flush().map_err(|e| StorageError::io(&tmp_path, e))?;
            // Durability barrier before the rename
            file.sync_all().map_err(|e| StorageError::io(&tmp_path, e))?;
            fs::rename(&tmp_path, path).map_err(|e| StorageError::io(path, e))
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }

        result
    }

    fn read_to_string(&self, path: &Path) -> StorageResult<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}

impl Storage for FileStorage {
    fn read_document(&self, id: &str) -> StorageResult<Value> {
        let path = self.document_path(id);
        let content = self
            .read_to_string(&path)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        serde_json::from_str(&content).map_err(|e| StorageError::corrupt(&path, e))
    }

    fn write_document(&self, id: &str, content: &Value) -> StorageResult<()> {
        let path = self.document_path(id);
        let encoded = serde_json::to_string_pretty(content)
            .map_err(|e| StorageError::corrupt(&path, e))?;
        self.write_atomic(&path, &encoded)
    }

    fn delete_document(&self, _id: &str) -> StorageResult<()> {
        Err(StorageError::Unsupported("delete_document"))
    }

    fn list_documents(&self, limit: usize, offset: usize) -> StorageResult<Vec<String>> {
        let entries =
            fs::read_dir(&self.base_dir).map_err(|e| StorageError::io(&self.base_dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.base_dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(META_SUFFIX) {
                continue;
            }
            if let Some(id) = name.strip_suffix(DOC_SUFFIX) {
                ids.push(id.to_string());
            }
        }

        ids.sort();
        Ok(ids.into_iter().skip(offset).take(limit).collect())
    }

    fn read_metadata(&self, id: &str) -> StorageResult<Option<DocumentMetadata>> {
        let path = self.metadata_path(id);
        match self.read_to_string(&path)? {
            Some(content) => {
                let metadata =
                    serde_json::from_str(&content).map_err(|e| StorageError::corrupt(&path, e))?;
                Ok(Some(metadata))
            }
            None => Ok(None),
        }
    }

    fn write_metadata(&self, id: &str, metadata: &DocumentMetadata) -> StorageResult<()> {
        let path = self.metadata_path(id);
        let encoded = serde_json::to_string_pretty(metadata)
            .map_err(|e| StorageError::corrupt(&path, e))?;
        self.write_atomic(&path, &encoded)
    }
}
