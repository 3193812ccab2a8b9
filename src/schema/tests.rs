//! Schema inference, merge, and walker tests

use super::*;
use crate::store::{DocumentStore, MemoryStore, Value};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn fields(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn object(pairs: &[(&str, Schema)]) -> Schema {
    Schema::object(
        pairs
            .iter()
            .map(|(k, s)| ((*k).to_string(), s.clone()))
            .collect(),
    )
}

fn scalar(kind: ScalarKind) -> Schema {
    Schema::Scalar(kind)
}

// ============================================================================
// Inference
// ============================================================================

#[test]
fn test_infer_scalars() {
    assert_eq!(infer(&Value::Null), scalar(ScalarKind::Null));
    assert_eq!(infer(&Value::Boolean(true)), scalar(ScalarKind::Boolean));
    assert_eq!(infer(&Value::Integer(3)), scalar(ScalarKind::Integer));
    assert_eq!(infer(&Value::Double(2.5)), scalar(ScalarKind::Float));
    assert_eq!(infer(&Value::Text("x".into())), scalar(ScalarKind::String));
    assert_eq!(
        infer(&Value::Timestamp(chrono::Utc::now())),
        scalar(ScalarKind::Timestamp)
    );
    assert_eq!(infer(&Value::Bytes(vec![1])), scalar(ScalarKind::Bytes));
    assert_eq!(
        infer(&Value::Reference("projects/p/databases/(default)/documents/a/b".into())),
        scalar(ScalarKind::Reference)
    );
    assert_eq!(
        infer(&Value::GeoPoint {
            latitude: 1.0,
            longitude: 2.0
        }),
        scalar(ScalarKind::GeoPoint)
    );
}

#[test]
fn test_infer_unknown_value_uses_type_name() {
    let value = Value::Unknown("vectorValue".into());
    assert_eq!(infer(&value), scalar(ScalarKind::Other("vectorValue".into())));
}

#[test]
fn test_infer_simple_document() {
    let value = Value::Map(fields(&[
        ("rank", Value::Integer(3)),
        ("name", Value::Text("x".into())),
    ]));

    let expected = object(&[
        ("rank", scalar(ScalarKind::Integer)),
        ("name", scalar(ScalarKind::String)),
    ]);
    assert_eq!(infer(&value), expected);
}

#[test]
fn test_infer_mixed_number_array() {
    // integer and float conflict, so the item schema collapses to mixed
    let value = Value::Array(vec![Value::Integer(1), Value::Double(2.5)]);
    assert_eq!(infer(&value), Schema::array(Some(Schema::mixed())));
}

#[test]
fn test_infer_empty_array_has_no_item_schema() {
    assert_eq!(infer(&Value::Array(vec![])), Schema::array(None));
}

#[test]
fn test_infer_nested_arrays_empty_then_typed() {
    // [[], [1]] -> the empty inner array imposes no constraint
    let value = Value::Array(vec![
        Value::Array(vec![]),
        Value::Array(vec![Value::Integer(1)]),
    ]);
    assert_eq!(
        infer(&value),
        Schema::array(Some(Schema::array(Some(scalar(ScalarKind::Integer)))))
    );
}

#[test]
fn test_infer_homogeneous_array() {
    let value = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
    assert_eq!(
        infer(&value),
        Schema::array(Some(scalar(ScalarKind::Integer)))
    );
}

#[test]
fn test_infer_nested_map_has_no_subcollections() {
    let value = Value::Map(fields(&[(
        "meta",
        Value::Map(fields(&[("active", Value::Boolean(true))])),
    )]));

    let Schema::Object { properties, .. } = infer(&value) else {
        panic!("expected object");
    };
    let Schema::Object {
        properties: inner,
        subcollections,
    } = &properties["meta"]
    else {
        panic!("expected nested object");
    };
    assert_eq!(inner["active"], scalar(ScalarKind::Boolean));
    assert!(subcollections.is_empty());
}

// ============================================================================
// Merge laws
// ============================================================================

fn sample_schemas() -> Vec<Schema> {
    vec![
        scalar(ScalarKind::Integer),
        scalar(ScalarKind::String),
        scalar(ScalarKind::Mixed),
        Schema::array(None),
        Schema::array(Some(scalar(ScalarKind::Float))),
        object(&[("a", scalar(ScalarKind::Integer))]),
        object(&[
            ("a", scalar(ScalarKind::Float)),
            ("b", Schema::array(Some(scalar(ScalarKind::String)))),
        ]),
    ]
}

#[test]
fn test_merge_idempotent() {
    for schema in sample_schemas() {
        assert_eq!(merge(&schema, &schema), schema);
    }
}

#[test]
fn test_merge_commutative() {
    let samples = sample_schemas();
    for a in &samples {
        for b in &samples {
            assert_eq!(merge(a, b), merge(b, a), "merge({a:?}, {b:?})");
        }
    }
}

#[test]
fn test_merge_associative() {
    let samples = sample_schemas();
    for a in &samples {
        for b in &samples {
            for c in &samples {
                assert_eq!(
                    merge(&merge(a, b), c),
                    merge(a, &merge(b, c)),
                    "merge({a:?}, {b:?}, {c:?})"
                );
            }
        }
    }
}

#[test]
fn test_mixed_absorbs_everything() {
    for schema in sample_schemas() {
        assert_eq!(merge(&Schema::mixed(), &schema), Schema::mixed());
        assert_eq!(merge(&schema, &Schema::mixed()), Schema::mixed());
    }
}

#[test]
fn test_merge_scalar_conflict_collapses() {
    assert_eq!(
        merge(&scalar(ScalarKind::Integer), &scalar(ScalarKind::String)),
        Schema::mixed()
    );
    assert_eq!(
        merge(&scalar(ScalarKind::Integer), &scalar(ScalarKind::Float)),
        Schema::mixed()
    );
}

#[test]
fn test_merge_container_kind_conflict() {
    assert_eq!(merge(&object(&[]), &Schema::array(None)), Schema::mixed());
    assert_eq!(
        merge(&object(&[]), &scalar(ScalarKind::String)),
        Schema::mixed()
    );
    assert_eq!(
        merge(&Schema::array(None), &scalar(ScalarKind::Null)),
        Schema::mixed()
    );
}

#[test]
fn test_merge_object_key_union_without_penalty() {
    // A field present in only one document keeps its schema unmerged
    let a = object(&[("a", scalar(ScalarKind::Integer))]);
    let b = object(&[("b", scalar(ScalarKind::String))]);

    let expected = object(&[
        ("a", scalar(ScalarKind::Integer)),
        ("b", scalar(ScalarKind::String)),
    ]);
    assert_eq!(merge(&a, &b), expected);
}

#[test]
fn test_merge_object_shared_keys_recurse() {
    let a = object(&[
        ("rank", scalar(ScalarKind::Integer)),
        ("name", scalar(ScalarKind::String)),
    ]);
    let b = object(&[
        ("rank", scalar(ScalarKind::String)),
        ("name", scalar(ScalarKind::String)),
    ]);

    let expected = object(&[
        ("rank", Schema::mixed()),
        ("name", scalar(ScalarKind::String)),
    ]);
    assert_eq!(merge(&a, &b), expected);
}

#[test]
fn test_merge_array_absent_items_is_identity() {
    let typed = Schema::array(Some(scalar(ScalarKind::Integer)));
    assert_eq!(merge(&Schema::array(None), &typed), typed);
    assert_eq!(merge(&typed, &Schema::array(None)), typed);
    assert_eq!(merge(&Schema::array(None), &Schema::array(None)), Schema::array(None));
}

#[test]
fn test_merge_subcollections_union() {
    let notes = CollectionSchema {
        schema: Some(object(&[("text", scalar(ScalarKind::String))])),
        example: Some(object(&[("text", scalar(ScalarKind::String))])),
    };
    let logs = CollectionSchema {
        schema: Some(object(&[("at", scalar(ScalarKind::Timestamp))])),
        example: Some(object(&[("at", scalar(ScalarKind::Timestamp))])),
    };

    let a = Schema::Object {
        properties: BTreeMap::new(),
        subcollections: [("notes".to_string(), notes.clone())].into(),
    };
    let b = Schema::Object {
        properties: BTreeMap::new(),
        subcollections: [("logs".to_string(), logs.clone())].into(),
    };

    let Schema::Object { subcollections, .. } = merge(&a, &b) else {
        panic!("expected object");
    };
    assert_eq!(subcollections.len(), 2);
    assert_eq!(subcollections["notes"], notes);
    assert_eq!(subcollections["logs"], logs);
}

#[test]
fn test_merge_collections_keeps_first_example() {
    let a = CollectionSchema {
        schema: Some(object(&[("x", scalar(ScalarKind::Integer))])),
        example: Some(object(&[("x", scalar(ScalarKind::Integer))])),
    };
    let b = CollectionSchema {
        schema: Some(object(&[("x", scalar(ScalarKind::String))])),
        example: Some(object(&[("x", scalar(ScalarKind::String))])),
    };

    let merged = merge_collections(&a, &b);
    assert_eq!(merged.schema, Some(object(&[("x", Schema::mixed())])));
    assert_eq!(merged.example, a.example);
}

// ============================================================================
// Serialized shape
// ============================================================================

#[test]
fn test_scalar_serializes_as_bare_string() {
    let yaml = serde_yaml::to_string(&scalar(ScalarKind::Integer)).unwrap();
    assert_eq!(yaml.trim(), "integer");

    let yaml = serde_yaml::to_string(&Schema::mixed()).unwrap();
    assert_eq!(yaml.trim(), "mixed");
}

#[test]
fn test_object_serialized_shape() {
    let schema = object(&[("rank", scalar(ScalarKind::Integer))]);
    let json = serde_json::to_value(&schema).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "object",
            "properties": {"rank": "integer"}
        })
    );
}

#[test]
fn test_array_serializes_absent_items_as_null() {
    let json = serde_json::to_value(Schema::array(None)).unwrap();
    assert_eq!(json, serde_json::json!({"type": "array", "items": null}));

    let json = serde_json::to_value(Schema::array(Some(scalar(ScalarKind::String)))).unwrap();
    assert_eq!(json, serde_json::json!({"type": "array", "items": "string"}));
}

#[test]
fn test_empty_collection_serializes_as_empty_map() {
    let json = serde_json::to_value(CollectionSchema::default()).unwrap();
    assert_eq!(json, serde_json::json!({}));
}

// ============================================================================
// Walker
// ============================================================================

#[tokio::test]
async fn test_walker_merges_sibling_documents() {
    let store = MemoryStore::new();
    store
        .insert(
            "quests/q1",
            fields(&[
                ("rank", Value::Integer(1)),
                ("name", Value::Text("a".into())),
            ]),
        )
        .await;
    store
        .insert(
            "quests/q2",
            fields(&[
                ("rank", Value::Text("two".into())),
                ("aura", Value::Double(1.5)),
            ]),
        )
        .await;

    let walker = SchemaWalker::new(&store);
    let schemas = walker.store_schema().await.unwrap();

    let quests = &schemas["quests"];
    let expected = object(&[
        ("rank", Schema::mixed()),
        ("name", scalar(ScalarKind::String)),
        ("aura", scalar(ScalarKind::Float)),
    ]);
    assert_eq!(quests.schema, Some(expected));

    // Example is the first document (stable order: q1), unmerged
    let expected_example = object(&[
        ("rank", scalar(ScalarKind::Integer)),
        ("name", scalar(ScalarKind::String)),
    ]);
    assert_eq!(quests.example, Some(expected_example));
}

#[tokio::test]
async fn test_walker_empty_collection_yields_nothing() {
    let store = MemoryStore::new();
    let walker = SchemaWalker::new(&store);
    let collection = walker.collection_schema("quests".to_string()).await.unwrap();
    assert!(collection.is_empty());
    assert_eq!(serde_json::to_value(&collection).unwrap(), serde_json::json!({}));
}

#[tokio::test]
async fn test_walker_attaches_subcollections() {
    let store = MemoryStore::new();
    store
        .insert(
            "questSystems/walk",
            fields(&[("name", Value::Text("Walk".into()))]),
        )
        .await;
    store
        .insert(
            "questSystems/walk/quests/q1",
            fields(&[("questRank", Value::Integer(1))]),
        )
        .await;

    let walker = SchemaWalker::new(&store);
    let schemas = walker.store_schema().await.unwrap();

    let Some(Schema::Object {
        properties,
        subcollections,
    }) = &schemas["questSystems"].schema
    else {
        panic!("expected object schema");
    };
    assert_eq!(properties["name"], scalar(ScalarKind::String));

    let quests = &subcollections["quests"];
    assert_eq!(
        quests.schema,
        Some(object(&[("questRank", scalar(ScalarKind::Integer))]))
    );
}

#[tokio::test]
async fn test_walker_document_with_no_fields_but_subcollection() {
    let store = MemoryStore::new();
    store.insert("things/t1", BTreeMap::new()).await;
    store
        .insert(
            "things/t1/notes/n1",
            fields(&[("text", Value::Text("hi".into()))]),
        )
        .await;

    let walker = SchemaWalker::new(&store);
    let schemas = walker.store_schema().await.unwrap();

    let Some(Schema::Object {
        properties,
        subcollections,
    }) = &schemas["things"].schema
    else {
        panic!("expected object schema");
    };
    assert!(properties.is_empty());
    assert!(subcollections.contains_key("notes"));
}
