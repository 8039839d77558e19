//! Semantic types: the keys of the codec registry.

use std::fmt;

/// The declared type of a member or literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Bool,
    Int32,
    Int64,
    Double,
    Decimal,
    String,
    DateTime,
    Binary,
    ObjectId,
    Uuid,
    /// A named enum registered with the domain.
    Enum(String),
    /// A named structured type described by a ClassMap.
    Class(String),
    Array(Box<SemanticType>),
    Nullable(Box<SemanticType>),
    /// No declared type; the codec is inferred from the runtime value.
    Any,
}

impl SemanticType {
    pub fn enumeration(name: impl Into<String>) -> Self {
        SemanticType::Enum(name.into())
    }

    pub fn class(name: impl Into<String>) -> Self {
        SemanticType::Class(name.into())
    }

    pub fn array_of(element: SemanticType) -> Self {
        SemanticType::Array(Box::new(element))
    }

    pub fn nullable(inner: SemanticType) -> Self {
        SemanticType::Nullable(Box::new(inner))
    }

    /// Strip any number of `Nullable` wrappers.
    pub fn non_nullable(&self) -> &SemanticType {
        match self {
            SemanticType::Nullable(inner) => inner.non_nullable(),
            other => other,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.non_nullable(), SemanticType::Array(_))
    }

    /// Element type of a (possibly nullable) collection.
    pub fn element_type(&self) -> Option<&SemanticType> {
        match self.non_nullable() {
            SemanticType::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Class name of a (possibly nullable) structured type.
    pub fn class_name(&self) -> Option<&str> {
        match self.non_nullable() {
            SemanticType::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Bool => write!(f, "Bool"),
            SemanticType::Int32 => write!(f, "Int32"),
            SemanticType::Int64 => write!(f, "Int64"),
            SemanticType::Double => write!(f, "Double"),
            SemanticType::Decimal => write!(f, "Decimal"),
            SemanticType::String => write!(f, "String"),
            SemanticType::DateTime => write!(f, "DateTime"),
            SemanticType::Binary => write!(f, "Binary"),
            SemanticType::ObjectId => write!(f, "ObjectId"),
            SemanticType::Uuid => write!(f, "Uuid"),
            SemanticType::Enum(name) => write!(f, "{}", name),
            SemanticType::Class(name) => write!(f, "{}", name),
            SemanticType::Array(inner) => write!(f, "{}[]", inner),
            SemanticType::Nullable(inner) => write!(f, "{}?", inner),
            SemanticType::Any => write!(f, "Any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ty = SemanticType::nullable(SemanticType::array_of(SemanticType::class("Pet")));
        assert_eq!(ty.to_string(), "Pet[]?");
    }

    #[test]
    fn test_element_type_sees_through_nullable() {
        let ty = SemanticType::nullable(SemanticType::array_of(SemanticType::String));
        assert!(ty.is_collection());
        assert_eq!(ty.element_type(), Some(&SemanticType::String));
        assert_eq!(SemanticType::Int32.element_type(), None);
    }
}
