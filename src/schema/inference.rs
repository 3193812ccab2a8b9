//! Schema inference and merging
//!
//! `infer` maps one field value to a schema; `merge` folds schemas from
//! sibling samples into an aggregate, collapsing type conflicts into the
//! `mixed` marker. Both are total: every value has a schema, and every
//! pair of schemas has a merge.

use super::types::{CollectionSchema, ScalarKind, Schema};
use crate::store::Value;
use std::collections::BTreeMap;

/// Infer the schema of a single value
///
/// Plain nested maps infer to objects with no subcollections; only the
/// walker attaches subcollection schemas, from the store's actual tree.
pub fn infer(value: &Value) -> Schema {
    match value {
        Value::Null => Schema::Scalar(ScalarKind::Null),
        Value::Boolean(_) => Schema::Scalar(ScalarKind::Boolean),
        Value::Integer(_) => Schema::Scalar(ScalarKind::Integer),
        Value::Double(_) => Schema::Scalar(ScalarKind::Float),
        Value::Text(_) => Schema::Scalar(ScalarKind::String),
        Value::Timestamp(_) => Schema::Scalar(ScalarKind::Timestamp),
        Value::Bytes(_) => Schema::Scalar(ScalarKind::Bytes),
        Value::Reference(_) => Schema::Scalar(ScalarKind::Reference),
        Value::GeoPoint { .. } => Schema::Scalar(ScalarKind::GeoPoint),
        Value::Unknown(name) => Schema::Scalar(ScalarKind::Other(name.clone())),
        Value::Array(items) => {
            let item_schema = items
                .iter()
                .map(infer)
                .reduce(|acc, next| merge(&acc, &next));
            Schema::array(item_schema)
        }
        Value::Map(fields) => infer_fields(fields),
    }
}

/// Infer the schema of a document field map
pub fn infer_fields(fields: &BTreeMap<String, Value>) -> Schema {
    Schema::object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), infer(value)))
            .collect(),
    )
}

/// Merge two schemas
///
/// Pure, commutative, associative, and idempotent. `mixed` absorbs
/// everything; object merge unions property keys, keeping a key's schema
/// unchanged when the other operand lacks it; array merge treats an absent
/// item schema as no constraint.
pub fn merge(a: &Schema, b: &Schema) -> Schema {
    if a == b {
        return a.clone();
    }
    if a.is_mixed() || b.is_mixed() {
        return Schema::mixed();
    }
    match (a, b) {
        // Equal scalars were handled above; what remains is a conflict.
        (Schema::Scalar(_), Schema::Scalar(_)) => Schema::mixed(),
        (
            Schema::Object {
                properties: props_a,
                subcollections: subs_a,
            },
            Schema::Object {
                properties: props_b,
                subcollections: subs_b,
            },
        ) => Schema::Object {
            properties: merge_keyed(props_a, props_b, merge),
            subcollections: merge_keyed(subs_a, subs_b, merge_collections),
        },
        (Schema::Array { items: items_a }, Schema::Array { items: items_b }) => Schema::Array {
            items: match (items_a, items_b) {
                (Some(x), Some(y)) => Some(Box::new(merge(x, y))),
                (Some(x), None) | (None, Some(x)) => Some(x.clone()),
                (None, None) => None,
            },
        },
        _ => Schema::mixed(),
    }
}

/// Merge two collection schemas from sibling documents
///
/// Aggregated schemas are merged; the example stays the first one seen.
pub fn merge_collections(a: &CollectionSchema, b: &CollectionSchema) -> CollectionSchema {
    CollectionSchema {
        schema: match (&a.schema, &b.schema) {
            (Some(x), Some(y)) => Some(merge(x, y)),
            (Some(x), None) | (None, Some(x)) => Some(x.clone()),
            (None, None) => None,
        },
        example: a.example.clone().or_else(|| b.example.clone()),
    }
}

/// Union two keyed maps: keys in both are combined with `combine`, keys in
/// only one keep that side's entry unchanged
fn merge_keyed<V: Clone>(
    a: &BTreeMap<String, V>,
    b: &BTreeMap<String, V>,
    combine: impl Fn(&V, &V) -> V,
) -> BTreeMap<String, V> {
    let mut merged = a.clone();
    for (key, value_b) in b {
        match merged.get_mut(key) {
            Some(value_a) => *value_a = combine(value_a, value_b),
            None => {
                merged.insert(key.clone(), value_b.clone());
            }
        }
    }
    merged
}
