//! Operation trees.
//!
//! Every builder (filters, updates, projections, sorts, pipeline stages)
//! produces a [`Node`] tree. Nothing in a tree is resolved yet: field
//! references are kept as written and literals keep their native values
//! until a [`Renderer`](crate::render::Renderer) walks the tree against a
//! root type.

use std::fmt;

use crate::codec::{Native, SemanticType};
use crate::error::RenderResult;
use crate::expr::{Expr, PathCompiler};
use crate::path::FieldPath;

/// A reference to a field, in any of the forms callers write them.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRef {
    Path(FieldPath),
    /// A lambda body over the root type, compiled when rendered.
    Expr(Expr),
    /// A raw dotted string such as `"Pets[3].Type"` or `"pets.$.type"`.
    Raw(String),
}

impl FieldRef {
    /// Compile or parse into a path. Fails for unsupported expression shapes
    /// and malformed raw paths.
    pub fn to_path(&self) -> RenderResult<FieldPath> {
        match self {
            FieldRef::Path(path) => Ok(path.clone()),
            FieldRef::Expr(expr) => Ok(PathCompiler::compile(expr)?),
            FieldRef::Raw(raw) => Ok(FieldPath::parse(raw)?),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Path(path) => write!(f, "{}", path),
            FieldRef::Expr(expr) => write!(f, "{}", expr),
            FieldRef::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

impl From<&str> for FieldRef {
    fn from(raw: &str) -> Self {
        FieldRef::Raw(raw.to_string())
    }
}

impl From<String> for FieldRef {
    fn from(raw: String) -> Self {
        FieldRef::Raw(raw)
    }
}

impl From<FieldPath> for FieldRef {
    fn from(path: FieldPath) -> Self {
        FieldRef::Path(path)
    }
}

impl From<Expr> for FieldRef {
    fn from(expr: Expr) -> Self {
        FieldRef::Expr(expr)
    }
}

/// Key of a document entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// Written verbatim.
    Text(String),
    /// Replaced by the field's canonical name. The entry's value is encoded
    /// with the field's codec.
    Field(FieldRef),
    /// Like `Field`, but the value stands for one element of an array field.
    ElementField(FieldRef),
}

impl Key {
    pub fn text(name: impl Into<String>) -> Self {
        Key::Text(name.into())
    }

    pub fn field(field: impl Into<FieldRef>) -> Self {
        Key::Field(field.into())
    }

    pub fn element(field: impl Into<FieldRef>) -> Self {
        Key::ElementField(field.into())
    }
}

/// A value awaiting encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Native,
    /// When set, the literal is encoded with this type's codec regardless of
    /// the field it appears under.
    pub declared: Option<SemanticType>,
}

/// How an operator lays out its operands.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorShape {
    /// `{ $op: value }`
    Unary(Box<Node>),
    /// `{ $op: [a, b, ...] }`
    NAry(Vec<Node>),
    /// `{ $op: { key: value, ... } }`
    Map(Vec<(Key, Node)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Literal),
    /// Aggregation field reference, rendered as `"$name"`.
    Field(FieldRef),
    /// A field rendered as its plain canonical name.
    FieldName(FieldRef),
    Document(Vec<(Key, Node)>),
    Array(Vec<Node>),
    Operator { name: String, shape: OperatorShape },
    /// Discriminator test restricting the current type to `class` and its
    /// descendants. Renders as a document.
    OfType(String),
    /// Conjunction of filters, merged clause by clause on their rendered names.
    And(Vec<Node>),
    /// Negation of a rendered filter.
    Not(Box<Node>),
}

impl Node {
    /// A literal encoded by whatever field it ends up under.
    pub fn value(value: impl Into<Native>) -> Self {
        Node::Literal(Literal {
            value: value.into(),
            declared: None,
        })
    }

    /// A literal with a fixed type.
    pub fn typed(value: impl Into<Native>, ty: SemanticType) -> Self {
        Node::Literal(Literal {
            value: value.into(),
            declared: Some(ty),
        })
    }

    pub fn int32(value: i32) -> Self {
        Node::typed(value, SemanticType::Int32)
    }

    pub fn boolean(value: bool) -> Self {
        Node::typed(value, SemanticType::Bool)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::typed(value.into(), SemanticType::String)
    }

    pub fn field(field: impl Into<FieldRef>) -> Self {
        Node::Field(field.into())
    }

    pub fn field_name(field: impl Into<FieldRef>) -> Self {
        Node::FieldName(field.into())
    }

    pub fn unary(name: impl Into<String>, operand: Node) -> Self {
        Node::Operator {
            name: name.into(),
            shape: OperatorShape::Unary(Box::new(operand)),
        }
    }

    pub fn nary(name: impl Into<String>, operands: Vec<Node>) -> Self {
        Node::Operator {
            name: name.into(),
            shape: OperatorShape::NAry(operands),
        }
    }

    pub fn map(name: impl Into<String>, entries: Vec<(Key, Node)>) -> Self {
        Node::Operator {
            name: name.into(),
            shape: OperatorShape::Map(entries),
        }
    }

    /// `{ field: value }`
    pub fn entry(key: Key, value: Node) -> Self {
        Node::Document(vec![(key, value)])
    }

    pub fn and(nodes: Vec<Node>) -> Self {
        Node::And(nodes)
    }

    pub fn not(node: Node) -> Self {
        Node::Not(Box::new(node))
    }

    pub fn empty() -> Self {
        Node::Document(Vec::new())
    }

    pub fn is_empty_document(&self) -> bool {
        matches!(self, Node::Document(entries) if entries.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Segment;

    #[test]
    fn test_field_ref_forms_compile_to_same_path() {
        let raw = FieldRef::from("Pets[3].Type").to_path().unwrap();
        let expr = FieldRef::from(Expr::param().member("Pets").index(3).member("Type"))
            .to_path()
            .unwrap();
        assert_eq!(raw, expr);
        assert_eq!(raw.segments()[1], Segment::Index(3));
    }

    #[test]
    fn test_node_helpers() {
        assert!(Node::empty().is_empty_document());
        assert_eq!(
            Node::int32(1),
            Node::Literal(Literal {
                value: Native::Int(1),
                declared: Some(SemanticType::Int32)
            })
        );
    }
}
