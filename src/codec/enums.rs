//! Enum definitions and the enum codec.

use serde::Deserialize;

use crate::error::CodecError;
use crate::value::Value;

use super::{undecodable, unencodable, Codec, CodecResult, Native, SemanticType};

/// Wire representation of enum values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumRepresentation {
    #[default]
    Int32,
    Int64,
    String,
}

impl EnumRepresentation {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" | "int32" => Some(EnumRepresentation::Int32),
            "long" | "int64" => Some(EnumRepresentation::Int64),
            "string" | "name" => Some(EnumRepresentation::String),
            _ => None,
        }
    }
}

/// A registered enum type: its name and `(variant, ordinal)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<(String, i64)>,
}

impl EnumDef {
    /// Variants numbered from zero in declaration order.
    pub fn new<S: Into<String>>(name: impl Into<String>, variants: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            variants: variants
                .into_iter()
                .enumerate()
                .map(|(i, v)| (v.into(), i as i64))
                .collect(),
        }
    }

    pub fn with_ordinals<S: Into<String>>(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = (S, i64)>,
    ) -> Self {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(|(v, i)| (v.into(), i)).collect(),
        }
    }

    pub fn by_name(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ordinal)| *ordinal)
    }

    pub fn by_ordinal(&self, ordinal: i64) -> Option<&str> {
        self.variants
            .iter()
            .find(|(_, o)| *o == ordinal)
            .map(|(n, _)| n.as_str())
    }

    /// Build the native value for a variant name.
    pub fn value(&self, name: &str) -> Option<Native> {
        self.by_name(name).map(|ordinal| Native::enum_value(ordinal, name))
    }
}

#[derive(Debug)]
pub struct EnumCodec {
    def: EnumDef,
    representation: EnumRepresentation,
}

impl EnumCodec {
    pub fn new(def: EnumDef, representation: EnumRepresentation) -> Self {
        Self {
            def,
            representation,
        }
    }

    pub fn representation(&self) -> EnumRepresentation {
        self.representation
    }

    fn bad_variant(&self, found: impl Into<String>) -> CodecError {
        CodecError::unencodable(self.def.name.clone(), found, "not a variant of this enum")
    }

    fn write(&self, ordinal: i64, name: &str) -> CodecResult<Value> {
        match self.representation {
            EnumRepresentation::Int32 => i32::try_from(ordinal)
                .map(Value::Int32)
                .map_err(|_| self.bad_variant(ordinal.to_string())),
            EnumRepresentation::Int64 => Ok(Value::Int64(ordinal)),
            EnumRepresentation::String => Ok(Value::String(name.to_string())),
        }
    }
}

impl Codec for EnumCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::enumeration(self.def.name.clone())
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        match value {
            Native::Null => Ok(Value::Null),
            Native::Raw(raw) => Ok(raw.clone()),
            Native::Enum { ordinal, name } => {
                if self.def.by_name(name) != Some(*ordinal) {
                    return Err(self.bad_variant(name.clone()));
                }
                self.write(*ordinal, name)
            }
            Native::Int(ordinal) => {
                let name = self
                    .def
                    .by_ordinal(*ordinal)
                    .ok_or_else(|| self.bad_variant(ordinal.to_string()))?;
                self.write(*ordinal, name)
            }
            Native::String(name) => {
                let ordinal = self
                    .def
                    .by_name(name)
                    .ok_or_else(|| self.bad_variant(name.clone()))?;
                self.write(ordinal, name)
            }
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        let found = match value {
            Value::Null => return Ok(Native::Null),
            Value::String(name) => self.def.value(name),
            Value::Int32(_) | Value::Int64(_) => value.as_i64().and_then(|ordinal| {
                self.def
                    .by_ordinal(ordinal)
                    .map(|name| Native::enum_value(ordinal, name))
            }),
            _ => None,
        };
        found.ok_or_else(|| undecodable(self, value))
    }
}
