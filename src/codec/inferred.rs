use crate::value::Value;

use super::{Codec, CodecResult, Native, SemanticType};

/// Codec for `Any`: encodes by runtime shape, decodes to raw values.
#[derive(Debug, Default)]
pub struct InferredCodec;

impl Codec for InferredCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::Any
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        Ok(value.infer())
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        Ok(match value {
            Value::Null => Native::Null,
            Value::Bool(b) => Native::Bool(*b),
            Value::Int32(i) => Native::Int(*i as i64),
            Value::Int64(i) => Native::Int(*i),
            Value::Double(f) => Native::Float(*f),
            Value::String(s) => Native::String(s.clone()),
            other => Native::Raw(other.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inferred_round_trip() {
        let value = InferredCodec.encode(&Native::Int(7)).unwrap();
        assert_eq!(value, Value::Int32(7));
        assert_eq!(InferredCodec.decode(&value).unwrap(), Native::Int(7));
    }
}
