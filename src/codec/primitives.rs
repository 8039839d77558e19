//! Codecs for scalar types.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::CodecError;
use crate::value::{ObjectId, Value, BINARY_SUBTYPE_GENERIC, BINARY_SUBTYPE_UUID};

use super::{undecodable, unencodable, Codec, CodecResult, Native, SemanticType};

/// Null and already-canonical values go through every scalar codec unchanged.
fn passthrough(value: &Native) -> Option<Value> {
    match value {
        Native::Null => Some(Value::Null),
        Native::Raw(raw) => Some(raw.clone()),
        _ => None,
    }
}

fn null_or<T>(value: &Value, f: impl FnOnce(&Value) -> Option<T>) -> Option<Option<T>> {
    if value.is_null() {
        Some(None)
    } else {
        f(value).map(Some)
    }
}

#[derive(Debug, Default)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::Bool
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        match value {
            Native::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::Bool(b) => Ok(Native::Bool(*b)),
            other => Err(undecodable(self, other)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Int32Codec;

impl Codec for Int32Codec {
    fn value_type(&self) -> SemanticType {
        SemanticType::Int32
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        match value {
            Native::Int(i) => i32::try_from(*i).map(Value::Int32).map_err(|_| {
                CodecError::unencodable("Int32", i.to_string(), "value out of range")
            }),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::Int32(i) => Ok(Native::Int(*i as i64)),
            other => Err(undecodable(self, other)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Int64Codec;

impl Codec for Int64Codec {
    fn value_type(&self) -> SemanticType {
        SemanticType::Int64
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        match value {
            Native::Int(i) => Ok(Value::Int64(*i)),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::Int32(i) => Ok(Native::Int(*i as i64)),
            Value::Int64(i) => Ok(Native::Int(*i)),
            other => Err(undecodable(self, other)),
        }
    }
}

#[derive(Debug, Default)]
pub struct DoubleCodec;

impl Codec for DoubleCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::Double
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        match value {
            Native::Float(f) => Ok(Value::Double(*f)),
            Native::Int(i) => Ok(Value::Double(*i as f64)),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::Double(f) => Ok(Native::Float(*f)),
            Value::Int32(i) => Ok(Native::Float(*i as f64)),
            Value::Int64(i) => Ok(Native::Float(*i as f64)),
            other => Err(undecodable(self, other)),
        }
    }
}

/// How decimals are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalRepresentation {
    #[default]
    Decimal128,
    String,
}

#[derive(Debug, Default)]
pub struct DecimalCodec {
    representation: DecimalRepresentation,
}

impl DecimalCodec {
    pub fn new(representation: DecimalRepresentation) -> Self {
        Self { representation }
    }

    fn write(&self, d: Decimal) -> Value {
        match self.representation {
            DecimalRepresentation::Decimal128 => Value::Decimal(d),
            DecimalRepresentation::String => Value::String(d.to_string()),
        }
    }
}

impl Codec for DecimalCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::Decimal
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        match value {
            Native::Decimal(d) => Ok(self.write(*d)),
            Native::Int(i) => Ok(self.write(Decimal::from(*i))),
            Native::Float(f) => Decimal::try_from(*f)
                .map(|d| self.write(d))
                .map_err(|e| CodecError::unencodable("Decimal", f.to_string(), e.to_string())),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::Decimal(d) => Ok(Native::Decimal(*d)),
            Value::String(s) => Decimal::from_str(s)
                .map(Native::Decimal)
                .map_err(|_| undecodable(self, value)),
            Value::Double(f) => Decimal::try_from(*f)
                .map(Native::Decimal)
                .map_err(|_| undecodable(self, value)),
            other => Err(undecodable(self, other)),
        }
    }
}

#[derive(Debug, Default)]
pub struct StringCodec;

impl Codec for StringCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::String
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        match value {
            Native::String(s) => Ok(Value::String(s.clone())),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::String(s) => Ok(Native::String(s.clone())),
            other => Err(undecodable(self, other)),
        }
    }
}

#[derive(Debug, Default)]
pub struct DateTimeCodec;

impl Codec for DateTimeCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::DateTime
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        match value {
            Native::DateTime(dt) => Ok(Value::DateTime(*dt)),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::DateTime(dt) => Ok(Native::DateTime(*dt)),
            other => Err(undecodable(self, other)),
        }
    }
}

#[derive(Debug, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::Binary
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        match value {
            Native::Bytes(bytes) => Ok(Value::Binary {
                subtype: BINARY_SUBTYPE_GENERIC,
                bytes: bytes.clone(),
            }),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::Binary { bytes, .. } => Ok(Native::Bytes(bytes.clone())),
            other => Err(undecodable(self, other)),
        }
    }
}

/// UUIDs go out as binary subtype 4; strings are parsed on the way in.
#[derive(Debug, Default)]
pub struct UuidCodec;

impl Codec for UuidCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::Uuid
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        let uuid = match value {
            Native::Uuid(uuid) => *uuid,
            Native::String(s) => Uuid::parse_str(s)
                .map_err(|e| CodecError::unencodable("Uuid", s.clone(), e.to_string()))?,
            other => return Err(unencodable(self, other)),
        };
        Ok(Value::Binary {
            subtype: BINARY_SUBTYPE_UUID,
            bytes: uuid.as_bytes().to_vec(),
        })
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        let decoded = null_or(value, |v| match v {
            Value::Binary { subtype, bytes } if *subtype == BINARY_SUBTYPE_UUID => {
                Uuid::from_slice(bytes).ok()
            }
            _ => None,
        });
        match decoded {
            Some(Some(uuid)) => Ok(Native::Uuid(uuid)),
            Some(None) => Ok(Native::Null),
            None => Err(undecodable(self, value)),
        }
    }
}

#[derive(Debug, Default)]
pub struct ObjectIdCodec;

impl Codec for ObjectIdCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::ObjectId
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if let Some(v) = passthrough(value) {
            return Ok(v);
        }
        match value {
            Native::ObjectId(oid) => Ok(Value::ObjectId(*oid)),
            Native::String(s) => ObjectId::from_str(s)
                .map(Value::ObjectId)
                .map_err(|reason| CodecError::unencodable("ObjectId", s.clone(), reason)),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::ObjectId(oid) => Ok(Native::ObjectId(*oid)),
            other => Err(undecodable(self, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int32_range_checked() {
        assert_eq!(Int32Codec.encode(&Native::Int(5)).unwrap(), Value::Int32(5));
        assert!(Int32Codec.encode(&Native::Int(i64::MAX)).is_err());
        assert!(Int32Codec.encode(&Native::from("5")).is_err());
    }

    #[test]
    fn test_int64_widens() {
        assert_eq!(Int64Codec.encode(&Native::Int(5)).unwrap(), Value::Int64(5));
        assert_eq!(Int64Codec.decode(&Value::Int32(5)).unwrap(), Native::Int(5));
    }

    #[test]
    fn test_double_accepts_ints() {
        assert_eq!(DoubleCodec.encode(&Native::Int(2)).unwrap(), Value::Double(2.0));
    }

    #[test]
    fn test_decimal_representations() {
        let d = Decimal::from_str("12.50").unwrap();
        assert_eq!(
            DecimalCodec::new(DecimalRepresentation::Decimal128)
                .encode(&Native::Decimal(d))
                .unwrap(),
            Value::Decimal(d)
        );
        assert_eq!(
            DecimalCodec::new(DecimalRepresentation::String)
                .encode(&Native::Decimal(d))
                .unwrap(),
            Value::String("12.50".to_string())
        );
    }

    #[test]
    fn test_null_and_raw_pass_through() {
        assert_eq!(StringCodec.encode(&Native::Null).unwrap(), Value::Null);
        assert_eq!(
            StringCodec.encode(&Native::Raw(Value::Int32(1))).unwrap(),
            Value::Int32(1)
        );
    }

    #[test]
    fn test_uuid_from_string() {
        let value = UuidCodec
            .encode(&Native::from("67e55044-10b1-426f-9247-bb680e5fe0c8"))
            .unwrap();
        match &value {
            Value::Binary { subtype, bytes } => {
                assert_eq!(*subtype, BINARY_SUBTYPE_UUID);
                assert_eq!(bytes.len(), 16);
            }
            other => panic!("Expected binary, got {:?}", other),
        }
        assert!(matches!(UuidCodec.decode(&value).unwrap(), Native::Uuid(_)));
    }

    #[test]
    fn test_object_id_from_hex_string() {
        let value = ObjectIdCodec
            .encode(&Native::from("5f1d7f3c9a4b2c0012345678"))
            .unwrap();
        assert_eq!(value.to_json(), serde_json::json!({"$oid": "5f1d7f3c9a4b2c0012345678"}));
        assert!(ObjectIdCodec.encode(&Native::from("nope")).is_err());
    }
}
