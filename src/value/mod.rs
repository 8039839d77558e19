//! Canonical document value model.
//!
//! Every rendered filter, update, projection, sort key and pipeline stage ends
//! up as a tree of [`Value`]s rooted in a [`Document`]. This is exactly the set
//! of values the wire encoder has to support losslessly.

mod document;
mod json;
mod object_id;

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub use document::Document;
pub use object_id::ObjectId;

/// Binary subtype used for UUIDs.
pub const BINARY_SUBTYPE_UUID: u8 = 0x04;

/// Binary subtype used for generic bytes.
pub const BINARY_SUBTYPE_GENERIC: u8 = 0x00;

/// A canonical document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Binary { subtype: u8, bytes: Vec<u8> },
    DateTime(DateTime<Utc>),
    Document(Document),
    Array(Vec<Value>),
    ObjectId(ObjectId),
    Regex { pattern: String, options: String },
    MinKey,
    MaxKey,
    Timestamp { time: u32, increment: u32 },
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int",
            Value::Int64(_) => "long",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Binary { .. } => "binData",
            Value::DateTime(_) => "date",
            Value::Document(_) => "object",
            Value::Array(_) => "array",
            Value::ObjectId(_) => "objectId",
            Value::Regex { .. } => "regex",
            Value::MinKey => "minKey",
            Value::MaxKey => "maxKey",
            Value::Timestamp { .. } => "timestamp",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Widen any numeric value to an i64, if it is integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            Value::Double(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    /// Render as canonical relaxed extended JSON.
    pub fn to_json(&self) -> serde_json::Value {
        json::value_to_json(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Value::Document(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<ObjectId> for Value {
    fn from(v: ObjectId) -> Self {
        Value::ObjectId(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        json::value_from_json(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Int32(1).type_name(), "int");
        assert_eq!(Value::Int64(1).type_name(), "long");
        assert_eq!(Value::Array(vec![]).type_name(), "array");
        assert_eq!(Value::MaxKey.type_name(), "maxKey");
    }

    #[test]
    fn test_as_i64_widens_integral_numbers() {
        assert_eq!(Value::Int32(7).as_i64(), Some(7));
        assert_eq!(Value::Double(2.0).as_i64(), Some(2));
        assert_eq!(Value::Double(2.5).as_i64(), None);
        assert_eq!(Value::from("2").as_i64(), None);
    }

    #[test]
    fn test_display_is_compact_json() {
        let value = Value::from(json!({"a": [1, "x", null]}));
        assert_eq!(value.to_string(), r#"{"a":[1,"x",null]}"#);
    }
}
