//! Language-native values, the input side of a codec.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::value::{ObjectId, Value, BINARY_SUBTYPE_GENERIC, BINARY_SUBTYPE_UUID};

/// A typed value as application code holds it, before any codec has decided
/// how it goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    DateTime(DateTime<Utc>),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    ObjectId(ObjectId),
    /// An enum value; which half goes on the wire is the codec's decision.
    Enum { ordinal: i64, name: String },
    List(Vec<Native>),
    /// An instance of a structured type, fields keyed by member name.
    Struct {
        type_name: String,
        fields: Vec<(String, Native)>,
    },
    /// An already-canonical value, passed through untouched.
    Raw(Value),
}

impl Native {
    pub fn enum_value(ordinal: i64, name: impl Into<String>) -> Self {
        Native::Enum {
            ordinal,
            name: name.into(),
        }
    }

    pub fn list<T: Into<Native>>(items: impl IntoIterator<Item = T>) -> Self {
        Native::List(items.into_iter().map(Into::into).collect())
    }

    pub fn structure(
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = (&'static str, Native)>,
    ) -> Self {
        Native::Struct {
            type_name: type_name.into(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Native::Null => "null",
            Native::Bool(_) => "bool",
            Native::Int(_) => "int",
            Native::Float(_) => "float",
            Native::Decimal(_) => "decimal",
            Native::String(_) => "string",
            Native::DateTime(_) => "datetime",
            Native::Bytes(_) => "bytes",
            Native::Uuid(_) => "uuid",
            Native::ObjectId(_) => "objectId",
            Native::Enum { .. } => "enum",
            Native::List(_) => "list",
            Native::Struct { .. } => "struct",
            Native::Raw(_) => "raw",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Native::Null | Native::Raw(Value::Null))
    }

    /// True for list-shaped values, the ones a collection codec expects.
    pub fn is_list(&self) -> bool {
        matches!(self, Native::List(_) | Native::Raw(Value::Array(_)))
    }

    /// Encode without any codec context, based only on the runtime shape.
    pub fn infer(&self) -> Value {
        match self {
            Native::Null => Value::Null,
            Native::Bool(b) => Value::Bool(*b),
            Native::Int(i) => match i32::try_from(*i) {
                Ok(small) => Value::Int32(small),
                Err(_) => Value::Int64(*i),
            },
            Native::Float(f) => Value::Double(*f),
            Native::Decimal(d) => Value::Decimal(*d),
            Native::String(s) => Value::String(s.clone()),
            Native::DateTime(dt) => Value::DateTime(*dt),
            Native::Bytes(bytes) => Value::Binary {
                subtype: BINARY_SUBTYPE_GENERIC,
                bytes: bytes.clone(),
            },
            Native::Uuid(uuid) => Value::Binary {
                subtype: BINARY_SUBTYPE_UUID,
                bytes: uuid.as_bytes().to_vec(),
            },
            Native::ObjectId(oid) => Value::ObjectId(*oid),
            Native::Enum { ordinal, .. } => match i32::try_from(*ordinal) {
                Ok(small) => Value::Int32(small),
                Err(_) => Value::Int64(*ordinal),
            },
            Native::List(items) => Value::Array(items.iter().map(Native::infer).collect()),
            Native::Struct { fields, .. } => Value::Document(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.infer()))
                    .collect(),
            ),
            Native::Raw(value) => value.clone(),
        }
    }
}

impl From<bool> for Native {
    fn from(v: bool) -> Self {
        Native::Bool(v)
    }
}

impl From<i32> for Native {
    fn from(v: i32) -> Self {
        Native::Int(v as i64)
    }
}

impl From<i64> for Native {
    fn from(v: i64) -> Self {
        Native::Int(v)
    }
}

impl From<u32> for Native {
    fn from(v: u32) -> Self {
        Native::Int(v as i64)
    }
}

impl From<f64> for Native {
    fn from(v: f64) -> Self {
        Native::Float(v)
    }
}

impl From<&str> for Native {
    fn from(v: &str) -> Self {
        Native::String(v.to_string())
    }
}

impl From<String> for Native {
    fn from(v: String) -> Self {
        Native::String(v)
    }
}

impl From<Decimal> for Native {
    fn from(v: Decimal) -> Self {
        Native::Decimal(v)
    }
}

impl From<DateTime<Utc>> for Native {
    fn from(v: DateTime<Utc>) -> Self {
        Native::DateTime(v)
    }
}

impl From<Uuid> for Native {
    fn from(v: Uuid) -> Self {
        Native::Uuid(v)
    }
}

impl From<ObjectId> for Native {
    fn from(v: ObjectId) -> Self {
        Native::ObjectId(v)
    }
}

impl From<Value> for Native {
    fn from(v: Value) -> Self {
        Native::Raw(v)
    }
}

impl<T: Into<Native>> From<Vec<T>> for Native {
    fn from(v: Vec<T>) -> Self {
        Native::list(v)
    }
}

impl<T: Into<Native>> From<Option<T>> for Native {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Native::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_narrows_ints() {
        assert_eq!(Native::Int(3).infer(), Value::Int32(3));
        assert_eq!(Native::Int(1 << 40).infer(), Value::Int64(1 << 40));
    }

    #[test]
    fn test_infer_enum_uses_ordinal() {
        assert_eq!(Native::enum_value(2, "Female").infer(), Value::Int32(2));
    }

    #[test]
    fn test_infer_struct_keeps_member_names() {
        let native = Native::structure(
            "Name",
            [("First", Native::from("Jack")), ("Last", Native::from("Bauer"))],
        );
        let value = native.infer();
        let doc = value.as_document().unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["First", "Last"]);
    }

    #[test]
    fn test_is_list() {
        assert!(Native::from(vec![1, 2]).is_list());
        assert!(!Native::from(1).is_list());
        assert!(Native::Raw(Value::Array(vec![])).is_list());
    }
}
