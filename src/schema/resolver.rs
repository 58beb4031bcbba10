//! `$ref` resolution with cycle detection
//!
//! A reference marker is any map carrying a `$ref` key. `#/`-prefixed
//! values are fragments navigated within the original base schema; any
//! other value names another stored schema, which becomes the new base for
//! everything inlined from it. A set of visited schema ids travels through
//! the recursion: re-entering one is a cycle. Local fragments never extend
//! the visited set beyond the current base.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use crate::storage::{Storage, StorageError};

/// Loads schemas from a storage collaborator and inlines their references.
///
/// Resolved schemas are cached per id. The cache hands out deep copies on
/// every access, so callers can never corrupt a cached entry.
pub struct SchemaResolver {
    storage: Arc<dyn Storage>,
    cache: Mutex<HashMap<String, Value>>,
}

impl SchemaResolver {
    /// Creates a resolver backed by the given schema store.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            cache: Mutex::new(HashMap::new()),
        }
    }

    // A poisoned lock still guards a structurally valid map.
    fn cache(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads a schema by id with every reference inlined.
    ///
    /// Returns a deep copy of the cached result when the id was resolved
    /// before; otherwise fetches, resolves, caches, and returns a copy.
    pub fn load(&self, schema_id: &str) -> SchemaResult<Value> {
        if let Some(cached) = self.cache().get(schema_id) {
            return Ok(cached.clone());
        }

        let base = self.fetch(schema_id)?;
        let mut resolved = base.clone();

        let mut visited = HashSet::new();
        visited.insert(schema_id.to_string());
        self.resolve_node(&mut resolved, &base, &visited)?;

        self.cache()
            .insert(schema_id.to_string(), resolved.clone());
        Ok(resolved)
    }

    /// Scans a schema for the ids of every cross-schema reference at any
    /// depth. Local `#/` fragments are not dependencies.
    pub fn dependencies(&self, schema_id: &str) -> SchemaResult<HashSet<String>> {
        let raw = self.fetch(schema_id)?;
        let mut found = HashSet::new();
        collect_dependencies(&raw, &mut found);
        Ok(found)
    }

    /// Empties the resolved-schema cache.
    pub fn clear(&self) {
        self.cache().clear();
    }

    fn fetch(&self, schema_id: &str) -> SchemaResult<Value> {
        match self.storage.read_document(schema_id) {
            Ok(schema) => Ok(schema),
            Err(StorageError::NotFound(_)) => Err(SchemaError::NotFound(schema_id.to_string())),
            Err(e) => Err(SchemaError::Storage(e)),
        }
    }

    /// Recursively replaces reference markers under `node`.
    ///
    /// `base` is the untouched base schema that local fragments navigate;
    /// it changes only when a cross-schema reference makes the referenced
    /// schema the new base.
    fn resolve_node(
        &self,
        node: &mut Value,
        base: &Value,
        visited: &HashSet<String>,
    ) -> SchemaResult<()> {
        match node {
            Value::Object(map) => {
                let reference = map.get("$ref").and_then(Value::as_str).map(str::to_owned);

                if let Some(reference) = reference {
                    if let Some(fragment) = reference.strip_prefix("#/") {
                        let referent = navigate_fragment(base, fragment)
                            .ok_or_else(|| {
                                SchemaError::UnresolvableReference(reference.clone())
                            })?
                            .clone();
                        *node = referent;
                        // The referent may itself contain references
                        self.resolve_node(node, base, visited)
                    } else {
                        if visited.contains(&reference) {
                            return Err(SchemaError::CircularReference(reference));
                        }
                        let next_base = self.fetch(&reference)?;
                        let mut next_visited = visited.clone();
                        next_visited.insert(reference);
                        *node = next_base.clone();
                        self.resolve_node(node, &next_base, &next_visited)
                    }
                } else {
                    for value in map.values_mut() {
                        self.resolve_node(value, base, visited)?;
                    }
                    Ok(())
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.resolve_node(item, base, visited)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Navigates a `#/`-fragment path (slash-delimited map keys) in a schema.
fn navigate_fragment<'a>(base: &'a Value, fragment: &str) -> Option<&'a Value> {
    let mut current = base;
    for key in fragment.split('/') {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

fn collect_dependencies(node: &Value, found: &mut HashSet<String>) {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                if !reference.starts_with("#/") {
                    found.insert(reference.to_string());
                }
            } else {
                for value in map.values() {
                    collect_dependencies(value, found);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_dependencies(item, found);
            }
        }
        _ => {}
    }
}
