//! Codecs: converters between native values and canonical values.
//!
//! A codec is identified by the [`SemanticType`] it governs. Codecs are
//! immutable once built and shared through [`CodecRef`] handles; the
//! [`Domain`](crate::domain::Domain) owns the registry that hands them out.

mod class;
mod collections;
mod enums;
mod inferred;
mod native;
mod primitives;
mod types;

use std::fmt;
use std::sync::Arc;

use crate::class_map::ClassMapRef;
use crate::error::CodecError;
use crate::value::Value;

pub use class::ClassMapCodec;
pub use collections::{ArrayCodec, ConvertIfPossibleCodec, NullableCodec};
pub use enums::{EnumCodec, EnumDef, EnumRepresentation};
pub use inferred::InferredCodec;
pub use native::Native;
pub use primitives::{
    BinaryCodec, BoolCodec, DateTimeCodec, DecimalCodec, DecimalRepresentation, DoubleCodec,
    Int32Codec, Int64Codec, ObjectIdCodec, StringCodec, UuidCodec,
};
pub use types::SemanticType;

pub type CodecResult<T> = Result<T, CodecError>;

/// Shared handle to a codec.
pub type CodecRef = Arc<dyn Codec>;

/// Converts values of one semantic type to and from canonical values.
pub trait Codec: fmt::Debug + Send + Sync {
    /// The semantic type this codec governs.
    fn value_type(&self) -> SemanticType;

    fn encode(&self, value: &Native) -> CodecResult<Value>;

    fn decode(&self, value: &Value) -> CodecResult<Native>;

    /// Codec for the elements, when this codec handles a collection.
    fn element_codec(&self) -> Option<CodecRef> {
        None
    }

    /// Member metadata, when this codec serializes a structured type.
    fn class_map(&self) -> Option<ClassMapRef> {
        None
    }
}

/// Error for a native value a codec cannot take.
pub(crate) fn unencodable(codec: &dyn Codec, value: &Native) -> CodecError {
    CodecError::unencodable(
        codec.value_type().to_string(),
        value.type_name(),
        "incompatible value",
    )
}

/// Error for a canonical value a codec cannot read.
pub(crate) fn undecodable(codec: &dyn Codec, value: &Value) -> CodecError {
    CodecError::undecodable(codec.value_type().to_string(), value.type_name())
}
