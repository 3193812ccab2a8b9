//! Typed wire value codec
//!
//! The REST API wraps every field value in a single-key object naming its
//! type (`{"integerValue": "42"}`, `{"mapValue": {"fields": {...}}}`).
//! Decoding maps those onto the domain [`Value`] union; a wire kind this
//! crate does not model decodes to [`Value::Unknown`] instead of failing,
//! so a schema walk over newer data always completes.

use crate::error::{Error, Result};
use crate::store::Value;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::{json, Map};
use std::collections::BTreeMap;

/// Decode a document's wire field map
pub fn decode_fields(fields: &Map<String, serde_json::Value>) -> Result<BTreeMap<String, Value>> {
    fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
        .collect()
}

/// Decode one typed wire value
pub fn decode_value(value: &serde_json::Value) -> Result<Value> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::decode(format!("expected typed value object, got: {value}")))?;
    let (kind, payload) = obj
        .iter()
        .next()
        .ok_or_else(|| Error::decode("typed value object has no type key"))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => payload
            .as_bool()
            .map(Value::Boolean)
            .ok_or_else(|| Error::decode(format!("booleanValue is not a bool: {payload}"))),
        // Integers arrive as decimal strings to survive 64-bit precision
        "integerValue" => {
            let text = match payload {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                other => {
                    return Err(Error::decode(format!("integerValue is not numeric: {other}")))
                }
            };
            text.parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| Error::decode(format!("integerValue '{text}': {e}")))
        }
        "doubleValue" => payload
            .as_f64()
            .map(Value::Double)
            .ok_or_else(|| Error::decode(format!("doubleValue is not a number: {payload}"))),
        "stringValue" => payload
            .as_str()
            .map(|s| Value::Text(s.to_string()))
            .ok_or_else(|| Error::decode(format!("stringValue is not a string: {payload}"))),
        "timestampValue" => {
            let text = payload
                .as_str()
                .ok_or_else(|| Error::decode(format!("timestampValue is not a string: {payload}")))?;
            DateTime::parse_from_rfc3339(text)
                .map(|dt| Value::Timestamp(dt.with_timezone(&Utc)))
                .map_err(|e| Error::decode(format!("timestampValue '{text}': {e}")))
        }
        "bytesValue" => {
            let text = payload
                .as_str()
                .ok_or_else(|| Error::decode(format!("bytesValue is not a string: {payload}")))?;
            base64::engine::general_purpose::STANDARD
                .decode(text)
                .map(Value::Bytes)
                .map_err(|e| Error::decode(format!("bytesValue: {e}")))
        }
        "referenceValue" => payload
            .as_str()
            .map(|s| Value::Reference(s.to_string()))
            .ok_or_else(|| Error::decode(format!("referenceValue is not a string: {payload}"))),
        "geoPointValue" => Ok(Value::GeoPoint {
            latitude: payload.get("latitude").and_then(|v| v.as_f64()).unwrap_or(0.0),
            longitude: payload.get("longitude").and_then(|v| v.as_f64()).unwrap_or(0.0),
        }),
        "arrayValue" => {
            let values = payload
                .get("values")
                .and_then(|v| v.as_array())
                .map(|items| items.iter().map(decode_value).collect::<Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = payload
                .get("fields")
                .and_then(|v| v.as_object())
                .map(decode_fields)
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Map(fields))
        }
        other => Ok(Value::Unknown(other.to_string())),
    }
}

/// Encode a field map into wire form
pub fn encode_fields(fields: &BTreeMap<String, Value>) -> Result<serde_json::Value> {
    let mut out = Map::new();
    for (key, value) in fields {
        out.insert(key.clone(), encode_value(value)?);
    }
    Ok(serde_json::Value::Object(out))
}

/// Encode one value into wire form
pub fn encode_value(value: &Value) -> Result<serde_json::Value> {
    match value {
        Value::Null => Ok(json!({ "nullValue": null })),
        Value::Boolean(b) => Ok(json!({ "booleanValue": b })),
        Value::Integer(i) => Ok(json!({ "integerValue": i.to_string() })),
        Value::Double(d) => Ok(json!({ "doubleValue": d })),
        Value::Text(s) => Ok(json!({ "stringValue": s })),
        Value::Timestamp(ts) => Ok(json!({
            "timestampValue": ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
        })),
        Value::Bytes(bytes) => Ok(json!({
            "bytesValue": base64::engine::general_purpose::STANDARD.encode(bytes)
        })),
        Value::Reference(path) => Ok(json!({ "referenceValue": path })),
        Value::GeoPoint {
            latitude,
            longitude,
        } => Ok(json!({
            "geoPointValue": { "latitude": latitude, "longitude": longitude }
        })),
        Value::Array(items) => {
            let values = items.iter().map(encode_value).collect::<Result<Vec<_>>>()?;
            Ok(json!({ "arrayValue": { "values": values } }))
        }
        Value::Map(fields) => Ok(json!({ "mapValue": { "fields": encode_fields(fields)? } })),
        Value::Unknown(kind) => Err(Error::decode(format!(
            "cannot encode unknown value kind '{kind}'"
        ))),
    }
}
