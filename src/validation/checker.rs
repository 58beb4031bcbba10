//! Schema conformance checking
//!
//! The checker walks document and schema together, collecting one violation
//! per broken constraint. Every violation carries its path from the document
//! root, the rule name, and the rule's parameter. Checking never mutates the
//! document and reports all violations rather than stopping at the first.

use serde_json::Value;

use crate::domain::Violation;

/// External conformance-checking collaborator.
///
/// An empty result means the document conforms.
pub trait ConformanceChecker: Send + Sync {
    /// Checks `document` against a fully resolved `schema`.
    fn check(&self, document: &Value, schema: &Value) -> Vec<Violation>;
}

/// Bundled structural checker.
///
/// Covers `type`, `required`, `properties`, `additionalProperties: false`,
/// `items`, `enum`, `minimum`/`maximum`, `minLength`/`maxLength`, and
/// `minItems`/`maxItems`. The schema must already have its references
/// inlined.
#[derive(Default)]
pub struct StructuralChecker;

impl StructuralChecker {
    /// Creates a checker.
    pub fn new() -> Self {
        Self
    }

    fn check_node(
        &self,
        value: &Value,
        schema: &Value,
        path: &[String],
        violations: &mut Vec<Violation>,
    ) {
        let Some(schema) = schema.as_object() else {
            return;
        };

        if let Some(expected) = schema.get("type").and_then(Value::as_str) {
            if !type_matches(value, expected) {
                violations.push(Violation::new(
                    format!(
                        "Expected type '{}', found '{}'",
                        expected,
                        type_name(value)
                    ),
                    path.to_vec(),
                    "type",
                    Value::String(expected.to_string()),
                ));
                // Remaining constraints assume the declared type
                return;
            }
        }

        if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                violations.push(Violation::new(
                    "Value is not one of the allowed values",
                    path.to_vec(),
                    "enum",
                    Value::Array(allowed.clone()),
                ));
            }
        }

        match value {
            Value::Object(map) => {
                if let Some(required) = schema.get("required").and_then(Value::as_array) {
                    for name in required.iter().filter_map(Value::as_str) {
                        if !map.contains_key(name) {
                            let mut field_path = path.to_vec();
                            field_path.push(name.to_string());
                            violations.push(Violation::new(
                                format!("Missing required field: {}", name),
                                field_path,
                                "required",
                                Value::Array(required.clone()),
                            ));
                        }
                    }
                }

                let properties = schema.get("properties").and_then(Value::as_object);

                if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
                    for key in map.keys() {
                        let declared =
                            properties.map_or(false, |props| props.contains_key(key));
                        if !declared {
                            let mut field_path = path.to_vec();
                            field_path.push(key.clone());
                            violations.push(Violation::new(
                                format!("Undeclared field: {}", key),
                                field_path,
                                "additionalProperties",
                                Value::Bool(false),
                            ));
                        }
                    }
                }

                if let Some(properties) = properties {
                    for (name, property_schema) in properties {
                        if let Some(child) = map.get(name) {
                            let mut child_path = path.to_vec();
                            child_path.push(name.clone());
                            self.check_node(child, property_schema, &child_path, violations);
                        }
                    }
                }
            }
            Value::Array(items) => {
                if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
                    if (items.len() as u64) < min {
                        violations.push(Violation::new(
                            format!("Expected at least {} item(s), found {}", min, items.len()),
                            path.to_vec(),
                            "minItems",
                            Value::from(min),
                        ));
                    }
                }
                if let Some(max) = schema.get("maxItems").and_then(Value::as_u64) {
                    if (items.len() as u64) > max {
                        violations.push(Violation::new(
                            format!("Expected at most {} item(s), found {}", max, items.len()),
                            path.to_vec(),
                            "maxItems",
                            Value::from(max),
                        ));
                    }
                }
                if let Some(item_schema) = schema.get("items") {
                    for (index, item) in items.iter().enumerate() {
                        let mut item_path = path.to_vec();
                        item_path.push(index.to_string());
                        self.check_node(item, item_schema, &item_path, violations);
                    }
                }
            }
            Value::String(s) => {
                let length = s.chars().count() as u64;
                if let Some(min) = schema.get("minLength").and_then(Value::as_u64) {
                    if length < min {
                        violations.push(Violation::new(
                            format!("String shorter than {} character(s)", min),
                            path.to_vec(),
                            "minLength",
                            Value::from(min),
                        ));
                    }
                }
                if let Some(max) = schema.get("maxLength").and_then(Value::as_u64) {
                    if length > max {
                        violations.push(Violation::new(
                            format!("String longer than {} character(s)", max),
                            path.to_vec(),
                            "maxLength",
                            Value::from(max),
                        ));
                    }
                }
            }
            Value::Number(n) => {
                if let (Some(value), Some(min)) = (
                    n.as_f64(),
                    schema.get("minimum").and_then(Value::as_f64),
                ) {
                    if value < min {
                        violations.push(Violation::new(
                            format!("Value {} is below minimum {}", value, min),
                            path.to_vec(),
                            "minimum",
                            schema["minimum"].clone(),
                        ));
                    }
                }
                if let (Some(value), Some(max)) = (
                    n.as_f64(),
                    schema.get("maximum").and_then(Value::as_f64),
                ) {
                    if value > max {
                        violations.push(Violation::new(
                            format!("Value {} is above maximum {}", value, max),
                            path.to_vec(),
                            "maximum",
                            schema["maximum"].clone(),
                        ));
                    }
                }
            }
            _ => {}
        }
    }
}

impl ConformanceChecker for StructuralChecker {
    fn check(&self, document: &Value, schema: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_node(document, schema, &[], &mut violations);
        violations
    }
}

fn type_matches(value: &Value, expected: &str) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        // An integral float like 3.0 is not an integer
        "integer" => value.as_i64().is_some() || value.as_u64().is_some(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article_schema() -> Value {
        json!({
            "type": "object",
            "required": ["title"],
            "properties": {
                "title": {"type": "string", "minLength": 1},
                "rating": {"type": "integer", "minimum": 0, "maximum": 5},
                "tags": {
                    "type": "array",
                    "maxItems": 3,
                    "items": {"type": "string"}
                },
                "state": {"enum": ["draft", "published"]}
            }
        })
    }

    #[test]
    fn test_conforming_document_has_no_violations() {
        let checker = StructuralChecker::new();
        let doc = json!({
            "title": "T",
            "rating": 4,
            "tags": ["a", "b"],
            "state": "draft"
        });
        assert!(checker.check(&doc, &article_schema()).is_empty());
    }

    #[test]
    fn test_missing_required_field_is_reported_with_path() {
        let checker = StructuralChecker::new();
        let violations = checker.check(&json!({}), &article_schema());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "required");
        assert_eq!(violations[0].path, vec!["title"]);
        assert!(violations[0].message.contains("title"));
    }

    #[test]
    fn test_type_mismatch_names_both_types() {
        let checker = StructuralChecker::new();
        let violations = checker.check(&json!({"title": 7}), &article_schema());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "type");
        assert_eq!(violations[0].path, vec!["title"]);
        assert!(violations[0].message.contains("string"));
        assert!(violations[0].message.contains("number"));
    }

    #[test]
    fn test_nested_array_item_paths_include_index() {
        let checker = StructuralChecker::new();
        let doc = json!({"title": "T", "tags": ["ok", 42]});
        let violations = checker.check(&doc, &article_schema());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, vec!["tags", "1"]);
    }

    #[test]
    fn test_numeric_bounds() {
        let checker = StructuralChecker::new();
        let schema = article_schema();

        assert!(checker.check(&json!({"title": "T", "rating": 0}), &schema).is_empty());
        assert_eq!(
            checker.check(&json!({"title": "T", "rating": 6}), &schema)[0].rule,
            "maximum"
        );
        assert_eq!(
            checker.check(&json!({"title": "T", "rating": -1}), &schema)[0].rule,
            "minimum"
        );
    }

    #[test]
    fn test_array_length_bounds() {
        let checker = StructuralChecker::new();
        let doc = json!({"title": "T", "tags": ["a", "b", "c", "d"]});
        let violations = checker.check(&doc, &article_schema());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "maxItems");
    }

    #[test]
    fn test_enum_restricts_values() {
        let checker = StructuralChecker::new();
        let doc = json!({"title": "T", "state": "archived"});
        let violations = checker.check(&doc, &article_schema());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "enum");
    }

    #[test]
    fn test_additional_properties_false_rejects_undeclared() {
        let checker = StructuralChecker::new();
        let schema = json!({
            "type": "object",
            "properties": {"a": {"type": "number"}},
            "additionalProperties": false
        });

        let violations = checker.check(&json!({"a": 1, "b": 2}), &schema);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "additionalProperties");
        assert_eq!(violations[0].path, vec!["b"]);
    }

    #[test]
    fn test_multiple_violations_are_all_collected() {
        let checker = StructuralChecker::new();
        let doc = json!({"rating": 9, "state": "gone"});
        let violations = checker.check(&doc, &article_schema());

        let rules: Vec<_> = violations.iter().map(|v| v.rule.as_str()).collect();
        assert!(rules.contains(&"required"));
        assert!(rules.contains(&"maximum"));
        assert!(rules.contains(&"enum"));
    }

    #[test]
    fn test_integer_type_rejects_floats() {
        let checker = StructuralChecker::new();
        let schema = json!({"type": "integer"});

        assert!(checker.check(&json!(3), &schema).is_empty());
        assert_eq!(checker.check(&json!(3.5), &schema)[0].rule, "type");
    }
}
