//! Relaxed extended JSON conversion.

use base64::Engine;
use chrono::SecondsFormat;
use serde_json::{json, Map, Number};

use super::{Document, Value};

pub(super) fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int32(i) => serde_json::Value::Number((*i).into()),
        Value::Int64(i) => serde_json::Value::Number((*i).into()),
        Value::Double(d) => match Number::from_f64(*d) {
            Some(n) => serde_json::Value::Number(n),
            None => json!({ "$numberDouble": non_finite_name(*d) }),
        },
        Value::Decimal(d) => json!({ "$numberDecimal": d.to_string() }),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Binary { subtype, bytes } => json!({
            "$binary": {
                "base64": base64::engine::general_purpose::STANDARD.encode(bytes),
                "subType": format!("{:02x}", subtype),
            }
        }),
        Value::DateTime(dt) => json!({ "$date": dt.to_rfc3339_opts(SecondsFormat::Millis, true) }),
        Value::Document(doc) => document_to_json(doc),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::ObjectId(oid) => json!({ "$oid": oid.to_hex() }),
        Value::Regex { pattern, options } => json!({
            "$regularExpression": { "pattern": pattern, "options": options }
        }),
        Value::MinKey => json!({ "$minKey": 1 }),
        Value::MaxKey => json!({ "$maxKey": 1 }),
        Value::Timestamp { time, increment } => json!({
            "$timestamp": { "t": time, "i": increment }
        }),
    }
}

pub(super) fn document_to_json(doc: &Document) -> serde_json::Value {
    let mut map = Map::with_capacity(doc.len());
    for (key, value) in doc.iter() {
        map.insert(key.to_string(), value_to_json(value));
    }
    serde_json::Value::Object(map)
}

pub(super) fn value_from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Value::Int32(small),
                    Err(_) => Value::Int64(i),
                }
            } else {
                Value::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(value_from_json).collect())
        }
        serde_json::Value::Object(map) => Value::Document(
            map.into_iter()
                .map(|(k, v)| (k, value_from_json(v)))
                .collect(),
        ),
    }
}

fn non_finite_name(d: f64) -> &'static str {
    if d.is_nan() {
        "NaN"
    } else if d > 0.0 {
        "Infinity"
    } else {
        "-Infinity"
    }
}
