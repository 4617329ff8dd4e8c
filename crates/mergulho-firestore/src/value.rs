//! Conversion between plain JSON and Firestore typed values.
//!
//! Firestore wraps every value in a single-key object naming its type,
//! e.g. `{"integerValue": "2024"}`. Integers travel as decimal strings.

use serde_json::{Map, Number, Value, json};

use mergulho_core::error::InvalidInputError;
use mergulho_core::{Error, Fields, Result};

/// Encode a JSON value as a Firestore value.
pub(crate) fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

/// Encode a document body.
pub(crate) fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), encode(value)))
        .collect()
}

fn malformed(message: impl Into<String>) -> Error {
    Error::InvalidInput(InvalidInputError::Document {
        message: message.into(),
    })
}

fn decode_integer(raw: &Value) -> Result<Value> {
    match raw {
        Value::String(s) => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| malformed(format!("bad integerValue {:?}", s))),
        Value::Number(n) if n.is_i64() => Ok(Value::Number(n.clone())),
        other => Err(malformed(format!("bad integerValue {}", other))),
    }
}

fn decode_double(raw: &Value) -> Result<Value> {
    let number = match raw {
        Value::Number(n) => n.as_f64(),
        // NaN and the infinities arrive as strings and have no JSON form.
        Value::String(_) => return Ok(Value::Null),
        _ => None,
    };
    number
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| malformed(format!("bad doubleValue {}", raw)))
}

/// Decode a Firestore value into plain JSON.
///
/// Timestamps, references and bytes decode to their string form; geo
/// points decode to `{"latitude": .., "longitude": ..}`.
pub(crate) fn decode(value: &Value) -> Result<Value> {
    let Some((kind, raw)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Err(malformed(format!("expected a typed value, got {}", value)));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => raw
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| malformed("bad booleanValue")),
        "integerValue" => decode_integer(raw),
        "doubleValue" => decode_double(raw),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => raw
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| malformed(format!("bad {}", kind))),
        "geoPointValue" => Ok(json!({
            "latitude": raw.get("latitude").cloned().unwrap_or(json!(0.0)),
            "longitude": raw.get("longitude").cloned().unwrap_or(json!(0.0)),
        })),
        "arrayValue" => {
            let values = match raw.get("values") {
                Some(Value::Array(values)) => values.iter().map(decode).collect::<Result<_>>()?,
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = match raw.get("fields") {
                Some(Value::Object(fields)) => decode_fields(fields)?,
                _ => Fields::new(),
            };
            Ok(Value::Object(fields))
        }
        other => Err(malformed(format!("unknown value type {}", other))),
    }
}

/// Decode a document body.
pub(crate) fn decode_fields(fields: &Map<String, Value>) -> Result<Fields> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), decode(value)?)))
        .collect()
}
