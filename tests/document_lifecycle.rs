//! Document lifecycle end to end
//!
//! Create-validate-mutate-list flows through the full service, covering
//! default application, the optimistic-lock discipline, and pagination.

use std::collections::HashSet;
use std::sync::Arc;

use nodestore::domain::StoreError;
use nodestore::schema::SchemaResolver;
use nodestore::service::DocumentService;
use nodestore::storage::MemoryStorage;
use nodestore::validation::{StructuralChecker, Validator};
use serde_json::{json, Value};

/// Schema with a required `title` (no default) and `tags` defaulting to [].
fn article_schema() -> Value {
    json!({
        "type": "object",
        "required": ["title"],
        "properties": {
            "title": {"type": "string"},
            "tags": {"type": "array", "default": [], "items": {"type": "string"}}
        }
    })
}

fn service() -> DocumentService {
    let documents = Arc::new(MemoryStorage::new());
    let schemas = Arc::new(MemoryStorage::new().with_document("article", article_schema()));
    DocumentService::new(
        documents,
        SchemaResolver::new(schemas),
        Validator::new(Arc::new(StructuralChecker::new())),
    )
}

#[test]
fn create_rejects_missing_required_field_and_applies_defaults() {
    let service = service();

    let err = service.create("article", &json!({}), None).unwrap_err();
    let violations = err.violations().expect("validation failure");
    assert!(violations.iter().any(|v| v.message.contains("title")));

    let (id, metadata) = service
        .create("article", &json!({"title": "T"}), None)
        .unwrap();
    assert_eq!(metadata.version, 1);

    let (document, version) = service.read(&id, "").unwrap();
    assert_eq!(document, json!({"title": "T", "tags": []}));
    assert_eq!(version, 1);
}

#[test]
fn append_then_read_sees_the_new_element_and_version() {
    let service = service();
    let (id, _) = service
        .create("article", &json!({"title": "T", "tags": []}), None)
        .unwrap();

    let (value, version) = service
        .create_node(&id, "/tags", json!("python"), 1)
        .unwrap();
    assert_eq!(value, json!("python"));
    assert_eq!(version, 2);

    let (tags, tags_version) = service.read(&id, "/tags").unwrap();
    assert_eq!(tags, json!(["python"]));
    assert_eq!(tags_version, 2);
}

#[test]
fn stale_update_is_rejected_and_changes_nothing() {
    let service = service();
    let (id, _) = service
        .create("article", &json!({"title": "T", "tags": []}), None)
        .unwrap();
    service.create_node(&id, "/tags", json!("python"), 1).unwrap();

    // The caller still believes in version 1
    let err = service
        .update(&id, "/title", json!("New"), 1)
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::VersionConflict {
            expected: 1,
            actual: 2
        }
    ));

    let (title, version) = service.read(&id, "/title").unwrap();
    assert_eq!(title, json!("T"));
    assert_eq!(version, 2);
}

#[test]
fn root_deletion_always_fails_invalid_operation() {
    let service = service();
    let (id, _) = service
        .create("article", &json!({"title": "T"}), None)
        .unwrap();

    for (doc, version) in [(id.as_str(), 1), ("no-such-document", 1)] {
        let err = service.delete_node(doc, "/", version).unwrap_err();
        assert!(
            matches!(err, StoreError::InvalidOperation(_)),
            "expected InvalidOperation for {:?}",
            doc
        );
    }
}

#[test]
fn versions_climb_one_per_mutation_without_gaps() {
    let service = service();
    let (id, metadata) = service
        .create("article", &json!({"title": "T", "tags": ["seed"]}), None)
        .unwrap();
    assert_eq!(metadata.version, 1);

    let (_, v2) = service.update(&id, "/title", json!("A"), 1).unwrap();
    let (_, v3) = service.create_node(&id, "/tags", json!("b"), v2).unwrap();
    let (_, v4) = service.delete_node(&id, "/tags/0", v3).unwrap();
    let (_, v5) = service.update(&id, "/title", json!("B"), v4).unwrap();

    assert_eq!((v2, v3, v4, v5), (2, 3, 4, 5));

    // A replayed old version is rejected at any point in the chain
    for stale in 1..5 {
        let err = service
            .update(&id, "/title", json!("stale"), stale)
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));
    }

    let (_, current) = service.read(&id, "").unwrap();
    assert_eq!(current, 5);
}

#[test]
fn deleted_value_comes_back_to_the_caller() {
    let service = service();
    let (id, _) = service
        .create(
            "article",
            &json!({"title": "T", "tags": ["keep", "drop"]}),
            None,
        )
        .unwrap();

    let (removed, version) = service.delete_node(&id, "/tags/1", 1).unwrap();
    assert_eq!(removed, json!("drop"));
    assert_eq!(version, 2);

    let (tags, _) = service.read(&id, "/tags").unwrap();
    assert_eq!(tags, json!(["keep"]));
}

#[test]
fn delete_then_append_restores_sequence_content() {
    let service = service();
    let (id, _) = service
        .create("article", &json!({"title": "T", "tags": ["a", "b"]}), None)
        .unwrap();

    let (removed, v2) = service.delete_node(&id, "/tags/1", 1).unwrap();
    let (_, v3) = service.create_node(&id, "/tags", removed, v2).unwrap();
    assert_eq!(v3, 3);

    let (tags, _) = service.read(&id, "/tags").unwrap();
    assert_eq!(tags, json!(["a", "b"]));
}

#[test]
fn pagination_partitions_all_documents() {
    let service = service();

    let mut created = HashSet::new();
    for i in 0..5 {
        let (id, _) = service
            .create("article", &json!({"title": format!("D{}", i)}), None)
            .unwrap();
        created.insert(id);
    }

    let mut seen = HashSet::new();
    for offset in [0, 2, 4] {
        for metadata in service.list(2, offset).unwrap() {
            assert!(
                seen.insert(metadata.doc_id.clone()),
                "page overlap at {}",
                metadata.doc_id
            );
        }
    }

    assert_eq!(seen, created);
}

#[test]
fn operations_against_absent_documents_fail_not_found() {
    let service = service();

    assert!(matches!(
        service.read("missing", "").unwrap_err(),
        StoreError::DocumentNotFound(_)
    ));
    assert!(matches!(
        service.update("missing", "/x", json!(1), 1).unwrap_err(),
        StoreError::DocumentNotFound(_)
    ));
    assert!(matches!(
        service.create_node("missing", "/x", json!(1), 1).unwrap_err(),
        StoreError::DocumentNotFound(_)
    ));
    assert!(matches!(
        service.delete_node("missing", "/x", 1).unwrap_err(),
        StoreError::DocumentNotFound(_)
    ));
}
