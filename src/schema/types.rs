//! Schema types
//!
//! A [`Schema`] describes the shape of a field value; a
//! [`CollectionSchema`] aggregates the schemas of every document sampled
//! from a collection, keeping the first document's schema as a
//! representative example.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// Scalar schema kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    Boolean,
    Integer,
    Float,
    String,
    Null,
    Timestamp,
    Bytes,
    Reference,
    GeoPoint,
    /// Irreconcilable type conflict across samples
    Mixed,
    /// Foreign value type, named by its wire kind
    Other(String),
}

impl ScalarKind {
    /// The kind name used in serialized schemas
    pub fn as_str(&self) -> &str {
        match self {
            ScalarKind::Boolean => "boolean",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::String => "string",
            ScalarKind::Null => "null",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Reference => "reference",
            ScalarKind::GeoPoint => "geopoint",
            ScalarKind::Mixed => "mixed",
            ScalarKind::Other(name) => name,
        }
    }
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inferred type shape of a field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// A scalar kind
    Scalar(ScalarKind),
    /// A field map; `subcollections` is populated only on schemas derived
    /// from actual stored documents, never from plain nested maps
    Object {
        properties: BTreeMap<String, Schema>,
        subcollections: BTreeMap<String, CollectionSchema>,
    },
    /// An ordered sequence; `items` is `None` only when the source array
    /// was empty in every sample seen
    Array { items: Option<Box<Schema>> },
}

impl Schema {
    /// The absorbing conflict marker
    pub fn mixed() -> Self {
        Schema::Scalar(ScalarKind::Mixed)
    }

    /// An object schema with no subcollections
    pub fn object(properties: BTreeMap<String, Schema>) -> Self {
        Schema::Object {
            properties,
            subcollections: BTreeMap::new(),
        }
    }

    /// An array schema
    pub fn array(items: Option<Schema>) -> Self {
        Schema::Array {
            items: items.map(Box::new),
        }
    }

    /// Whether this schema is the conflict marker
    pub fn is_mixed(&self) -> bool {
        matches!(self, Schema::Scalar(ScalarKind::Mixed))
    }
}

// Serialized shape: a scalar is a bare kind string, an object is
// `{"type": "object", "properties": {...}, "subcollections": {...}?}` and
// an array is `{"type": "array", "items": <schema>|null}`.
impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Schema::Scalar(kind) => serializer.serialize_str(kind.as_str()),
            Schema::Object {
                properties,
                subcollections,
            } => {
                let len = if subcollections.is_empty() { 2 } else { 3 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("type", "object")?;
                map.serialize_entry("properties", properties)?;
                if !subcollections.is_empty() {
                    map.serialize_entry("subcollections", subcollections)?;
                }
                map.end()
            }
            Schema::Array { items } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items)?;
                map.end()
            }
        }
    }
}

/// Aggregated schema of one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CollectionSchema {
    /// Fold of every sampled document's schema; absent for an empty
    /// collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Schema of the first document sampled, kept unmerged for reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Schema>,
}

impl CollectionSchema {
    /// Whether the collection had no documents
    pub fn is_empty(&self) -> bool {
        self.schema.is_none() && self.example.is_none()
    }
}

/// Root collection name -> aggregated collection schema
pub type StoreSchema = BTreeMap<String, CollectionSchema>;
