//! Domain model for documents in the store
//!
//! `Value` is the explicit tagged union over every field type the store can
//! hold. Everything downstream (schema inference, uploads, migrations)
//! pattern-matches on this union instead of poking at raw JSON.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A single field value in a stored document
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit float
    Double(f64),
    /// UTF-8 string
    Text(String),
    /// Timestamp with timezone
    Timestamp(DateTime<Utc>),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Reference to another document (full resource name)
    Reference(String),
    /// Geographic point
    GeoPoint { latitude: f64, longitude: f64 },
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Nested field map
    Map(BTreeMap<String, Value>),
    /// Escape hatch for wire types this crate does not model.
    /// Carries the wire kind name so the schema walk never fails on it.
    Unknown(String),
}

impl Value {
    /// The value's type name, as used for unknown-kind schema fallbacks
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Double(_) => "float",
            Value::Text(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Bytes(_) => "bytes",
            Value::Reference(_) => "reference",
            Value::GeoPoint { .. } => "geopoint",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Unknown(name) => name,
        }
    }

    /// The string payload, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a plain JSON value into a domain value
    ///
    /// Integers stay integers; other numbers become doubles. Used when
    /// uploading content authored as JSON/YAML.
    pub fn from_json(value: &serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Double(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a YAML value into a domain value
    ///
    /// Quest content files are YAML; mapping keys must be strings.
    pub fn from_yaml(value: &serde_yaml::Value) -> Result<Value> {
        match value {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Boolean(*b)),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Integer(i)),
                None => Ok(Value::Double(n.as_f64().unwrap_or(0.0))),
            },
            serde_yaml::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_yaml::Value::Sequence(items) => Ok(Value::Array(
                items.iter().map(Value::from_yaml).collect::<Result<_>>()?,
            )),
            serde_yaml::Value::Mapping(map) => {
                let mut fields = BTreeMap::new();
                for (k, v) in map {
                    let key = k
                        .as_str()
                        .ok_or_else(|| Error::decode("YAML mapping key is not a string"))?;
                    fields.insert(key.to_string(), Value::from_yaml(v)?);
                }
                Ok(Value::Map(fields))
            }
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }
}

/// A document fetched from (or destined for) the store
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path relative to the database root, e.g. `questSystems/walk/quests/q1`
    pub path: String,
    /// Field map
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    /// Create a document at the given path
    pub fn new(path: impl Into<String>, fields: BTreeMap<String, Value>) -> Self {
        Self {
            path: path.into(),
            fields,
        }
    }

    /// The document id (last path segment)
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// The path of the collection containing this document
    pub fn collection(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }
}

/// A single write in a batched commit
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Create or replace a document; with `merge` only the given fields
    /// are touched and the rest of the document is left alone
    Set {
        path: String,
        fields: BTreeMap<String, Value>,
        merge: bool,
    },
    /// Update fields of an existing document (fails if it does not exist)
    Update {
        path: String,
        fields: BTreeMap<String, Value>,
    },
    /// Delete a document
    Delete { path: String },
}
