//! Codecs derived from an element or inner codec.

use crate::value::Value;

use super::{undecodable, unencodable, Codec, CodecRef, CodecResult, Native, SemanticType};

/// Encodes lists element by element.
#[derive(Debug)]
pub struct ArrayCodec {
    element: CodecRef,
}

impl ArrayCodec {
    pub fn new(element: CodecRef) -> Self {
        Self { element }
    }
}

impl Codec for ArrayCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::array_of(self.element.value_type())
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        match value {
            Native::Null => Ok(Value::Null),
            Native::Raw(raw) => Ok(raw.clone()),
            Native::List(items) => items
                .iter()
                .map(|item| self.element.encode(item))
                .collect::<CodecResult<Vec<_>>>()
                .map(Value::Array),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::Array(items) => items
                .iter()
                .map(|item| self.element.decode(item))
                .collect::<CodecResult<Vec<_>>>()
                .map(Native::List),
            other => Err(undecodable(self, other)),
        }
    }

    fn element_codec(&self) -> Option<CodecRef> {
        Some(self.element.clone())
    }
}

/// Lets null through and defers everything else to the inner codec.
#[derive(Debug)]
pub struct NullableCodec {
    inner: CodecRef,
}

impl NullableCodec {
    pub fn new(inner: CodecRef) -> Self {
        Self { inner }
    }
}

impl Codec for NullableCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::nullable(self.inner.value_type())
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.inner.encode(value)
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        if value.is_null() {
            return Ok(Native::Null);
        }
        self.inner.decode(value)
    }

    fn element_codec(&self) -> Option<CodecRef> {
        self.inner.element_codec()
    }

    fn class_map(&self) -> Option<crate::class_map::ClassMapRef> {
        self.inner.class_map()
    }
}

/// Scalar-for-array adapter.
///
/// Stands in for an array field's codec when a single value is matched
/// against it: lists are encoded element-wise, anything else is encoded as
/// one element.
#[derive(Debug)]
pub struct ConvertIfPossibleCodec {
    element: CodecRef,
}

impl ConvertIfPossibleCodec {
    pub fn new(element: CodecRef) -> Self {
        Self { element }
    }
}

impl Codec for ConvertIfPossibleCodec {
    fn value_type(&self) -> SemanticType {
        self.element.value_type()
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        match value {
            Native::List(items) => items
                .iter()
                .map(|item| self.element.encode(item))
                .collect::<CodecResult<Vec<_>>>()
                .map(Value::Array),
            scalar => self.element.encode(scalar),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| self.element.decode(item))
                .collect::<CodecResult<Vec<_>>>()
                .map(Native::List),
            scalar => self.element.decode(scalar),
        }
    }

    fn element_codec(&self) -> Option<CodecRef> {
        self.element.element_codec()
    }

    fn class_map(&self) -> Option<crate::class_map::ClassMapRef> {
        self.element.class_map()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::codec::{EnumCodec, EnumDef, EnumRepresentation, Int32Codec, StringCodec};

    #[test]
    fn test_array_codec() {
        let codec = ArrayCodec::new(Arc::new(StringCodec));
        let value = codec.encode(&Native::from(vec!["a", "b"])).unwrap();
        assert_eq!(value.to_json(), serde_json::json!(["a", "b"]));
        assert!(codec.encode(&Native::from("a")).is_err());
        assert_eq!(
            codec.value_type(),
            SemanticType::array_of(SemanticType::String)
        );
    }

    #[test]
    fn test_nullable_codec() {
        let codec = NullableCodec::new(Arc::new(Int32Codec));
        assert_eq!(codec.encode(&Native::Null).unwrap(), Value::Null);
        assert_eq!(codec.encode(&Native::Int(3)).unwrap(), Value::Int32(3));
    }

    #[test]
    fn test_convert_if_possible_accepts_scalar_and_list() {
        let gender = EnumCodec::new(
            EnumDef::new("Gender", ["Male", "Female"]),
            EnumRepresentation::String,
        );
        let codec = ConvertIfPossibleCodec::new(Arc::new(gender));
        assert_eq!(
            codec.encode(&Native::enum_value(1, "Female")).unwrap(),
            Value::String("Female".to_string())
        );
        assert_eq!(
            codec
                .encode(&Native::List(vec![Native::enum_value(0, "Male")]))
                .unwrap()
                .to_json(),
            serde_json::json!(["Male"])
        );
    }
}
