//! Validation and default application
//!
//! `validate` delegates conformance checking to the configured checker and
//! turns a non-empty violation list into `ValidationFailed`. `apply_defaults`
//! fills schema-declared defaults into a copy of the document before
//! validation; it recurses into nested object schemas but never into arrays.

use std::sync::Arc;

use serde_json::Value;

use super::checker::ConformanceChecker;
use crate::domain::{StoreError, StoreResult};

/// Validates documents against resolved schemas.
pub struct Validator {
    checker: Arc<dyn ConformanceChecker>,
}

impl Validator {
    /// Creates a validator around a conformance checker.
    pub fn new(checker: Arc<dyn ConformanceChecker>) -> Self {
        Self { checker }
    }

    /// Checks `document` against `schema`.
    ///
    /// Fails `ValidationFailed` carrying the checker's full ordered
    /// violation list; succeeds silently when the list is empty.
    pub fn validate(&self, document: &Value, schema: &Value) -> StoreResult<()> {
        let violations = self.checker.check(document, schema);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(StoreError::ValidationFailed(violations))
        }
    }

    /// Returns a copy of `document` with schema defaults filled in.
    ///
    /// For each schema property with a `default` absent from the document,
    /// a deep copy of the default is inserted. Where the schema property is
    /// object-typed and the document value is a map, the walk recurses into
    /// the pair. Array contents are never recursed into. The input document
    /// is untouched.
    pub fn apply_defaults(&self, document: &Value, schema: &Value) -> Value {
        let mut result = document.clone();
        fill_defaults(&mut result, schema);
        result
    }
}

fn fill_defaults(node: &mut Value, schema: &Value) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };
    let Some(map) = node.as_object_mut() else {
        return;
    };

    for (name, property_schema) in properties {
        if !map.contains_key(name) {
            if let Some(default) = property_schema.get("default") {
                map.insert(name.clone(), default.clone());
            }
            continue;
        }

        let object_typed = property_schema.get("type").and_then(Value::as_str) == Some("object");
        if object_typed {
            if let Some(child) = map.get_mut(name) {
                if child.is_object() {
                    fill_defaults(child, property_schema);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::StructuralChecker;
    use serde_json::json;

    fn validator() -> Validator {
        Validator::new(Arc::new(StructuralChecker::new()))
    }

    #[test]
    fn test_validate_passes_conforming_document() {
        let schema = json!({"type": "object", "required": ["title"],
            "properties": {"title": {"type": "string"}}});
        assert!(validator().validate(&json!({"title": "T"}), &schema).is_ok());
    }

    #[test]
    fn test_validate_surfaces_full_violation_list() {
        let schema = json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {"a": {"type": "string"}, "b": {"type": "string"}}
        });

        let err = validator().validate(&json!({}), &schema).unwrap_err();
        let violations = err.violations().expect("validation failure");
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_apply_defaults_fills_missing_fields() {
        let schema = json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "tags": {"type": "array", "default": []},
                "draft": {"type": "boolean", "default": true}
            }
        });

        let result = validator().apply_defaults(&json!({"title": "T"}), &schema);
        assert_eq!(result, json!({"title": "T", "tags": [], "draft": true}));
    }

    #[test]
    fn test_apply_defaults_keeps_existing_values() {
        let schema = json!({
            "properties": {"draft": {"type": "boolean", "default": true}}
        });

        let result = validator().apply_defaults(&json!({"draft": false}), &schema);
        assert_eq!(result, json!({"draft": false}));
    }

    #[test]
    fn test_apply_defaults_recurses_into_object_properties() {
        let schema = json!({
            "type": "object",
            "properties": {
                "meta": {
                    "type": "object",
                    "properties": {
                        "lang": {"type": "string", "default": "en"}
                    }
                }
            }
        });

        let result = validator().apply_defaults(&json!({"meta": {}}), &schema);
        assert_eq!(result, json!({"meta": {"lang": "en"}}));
    }

    #[test]
    fn test_apply_defaults_does_not_recurse_into_arrays() {
        let schema = json!({
            "type": "object",
            "properties": {
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"done": {"type": "boolean", "default": false}}
                    }
                }
            }
        });

        let doc = json!({"items": [{}]});
        let result = validator().apply_defaults(&doc, &schema);
        // Per-item defaults are not applied
        assert_eq!(result, doc);
    }

    #[test]
    fn test_apply_defaults_leaves_input_untouched() {
        let schema = json!({"properties": {"x": {"default": 1}}});
        let doc = json!({});
        let before = doc.clone();

        let _ = validator().apply_defaults(&doc, &schema);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_inserted_default_is_an_independent_copy() {
        let schema = json!({"properties": {"tags": {"type": "array", "default": []}}});
        let validator = validator();

        let mut first = validator.apply_defaults(&json!({}), &schema);
        first["tags"].as_array_mut().unwrap().push(json!("x"));

        let second = validator.apply_defaults(&json!({}), &schema);
        assert_eq!(second["tags"], json!([]));
    }
}
