//! Shallow schema introspection
//!
//! Readers for the `required` list and per-property `default` values of an
//! already-resolved schema. These never recurse; nested objects carry their
//! own `required`/`default` and are consulted where the caller walks them.

use std::collections::HashMap;

use serde_json::Value;

/// Returns the schema's top-level `required` field names.
///
/// Missing or non-array `required` yields an empty list; non-string entries
/// are skipped.
pub fn required_fields(schema: &Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Returns each top-level property's declared `default`, keyed by property
/// name. Properties without a `default` are absent from the map.
pub fn default_values(schema: &Value) -> HashMap<String, Value> {
    let mut defaults = HashMap::new();

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return defaults;
    };

    for (name, property) in properties {
        if let Some(default) = property.get("default") {
            defaults.insert(name.clone(), default.clone());
        }
    }

    defaults
}
