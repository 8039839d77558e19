//! Error types for every resolution and rendering phase.

use thiserror::Error;

use crate::codec::SemanticType;

/// Codec lookup and conversion errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("No codec found for type '{0}'")]
    NoCodecFound(SemanticType),

    #[error("Cannot encode {found} with the {codec} codec: {reason}")]
    Unencodable {
        codec: String,
        found: String,
        reason: String,
    },

    #[error("Cannot decode {found} with the {codec} codec")]
    Undecodable { codec: String, found: String },

    #[error(transparent)]
    ClassMap(#[from] ClassMapError),
}

impl CodecError {
    pub fn no_codec_found(ty: SemanticType) -> Self {
        Self::NoCodecFound(ty)
    }

    pub fn unencodable(
        codec: impl Into<String>,
        found: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Unencodable {
            codec: codec.into(),
            found: found.into(),
            reason: reason.into(),
        }
    }

    pub fn undecodable(codec: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Undecodable {
            codec: codec.into(),
            found: found.into(),
        }
    }
}

/// ClassMap construction errors.
#[derive(Debug, Error)]
pub enum ClassMapError {
    #[error("Class '{0}' is not registered")]
    UnknownClass(String),

    #[error("Class '{class}' declares unknown base class '{base}'")]
    UnknownBase { class: String, base: String },

    #[error("Class '{0}' inherits from itself")]
    CyclicBase(String),

    #[error("Class '{class}' maps more than one member to element name '{element}'")]
    DuplicateElementName { class: String, element: String },
}

/// Raw string field path errors.
#[derive(Debug, Error)]
pub enum PathParseError {
    #[error("Invalid field path '{path}': {message} at offset {offset}")]
    Invalid {
        path: String,
        message: String,
        offset: usize,
    },
}

impl PathParseError {
    pub fn invalid(path: impl Into<String>, message: impl Into<String>, offset: usize) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
            offset,
        }
    }
}

/// Expression compilation errors. Raised before any rendering starts.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Unsupported expression shape: {shape} in '{expression}'")]
    UnsupportedExpressionShape { shape: String, expression: String },
}

impl CompileError {
    pub fn unsupported(shape: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::UnsupportedExpressionShape {
            shape: shape.into(),
            expression: expression.into(),
        }
    }
}

/// Field resolution errors. Unknown members are not errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Scalar value supplied for array field '{field}' without opting in")]
    AmbiguousScalarForArrayField { field: String },
}

/// Type filter, stage and index key rendering errors.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Type filtering requires a discriminator for type '{0}'")]
    NoDiscriminator(String),

    #[error("Type '{actual}' is not a subtype of '{nominal}'")]
    NotASubtype { nominal: String, actual: String },

    #[error("Expected a document but rendered {0}")]
    NotADocument(String),

    #[error("The index keys contain more than one entry for field '{0}'")]
    DuplicateIndexKey(String),
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Class map error: {0}")]
    ClassMap(#[from] ClassMapError),

    #[error("Path error: {0}")]
    Path(#[from] PathParseError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Stage error: {0}")]
    Stage(#[from] StageError),
}

pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: RenderError = CodecError::no_codec_found(SemanticType::class("Person")).into();
        assert_eq!(
            err.to_string(),
            "Codec error: No codec found for type 'Person'"
        );

        let err: RenderError = CompileError::unsupported("method call", "x.Name.ToUpper()").into();
        assert!(err.to_string().contains("Unsupported expression shape"));
    }
}
