//! Filter builder.

use crate::ast::{FieldRef, Key, Node};
use crate::codec::{Native, SemanticType};
use crate::error::{CompileError, RenderResult};
use crate::expr::{Expr, PredicateTranslator};
use crate::render::Renderer;
use crate::value::{Document, Value};

/// A query filter, e.g. `{age: {$gt: 10}, fn: "Jack"}` once rendered.
///
/// ```
/// use docrender::builders::Filter;
///
/// let filter = Filter::and(vec![Filter::eq("FirstName", "Jack"), Filter::gt("Age", 10)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter(Node);

impl Filter {
    pub fn from_node(node: Node) -> Self {
        Filter(node)
    }

    /// Matches every document.
    pub fn empty() -> Self {
        Filter(Node::empty())
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn into_node(self) -> Node {
        self.0
    }

    pub fn render(&self, renderer: &Renderer) -> RenderResult<Document> {
        renderer.render_document(&self.0)
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    pub fn eq(field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        Filter(Node::entry(Key::field(field), Node::value(value)))
    }

    pub fn ne(field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        Self::compare(field, "$ne", value)
    }

    pub fn gt(field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        Self::compare(field, "$gt", value)
    }

    pub fn gte(field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        Self::compare(field, "$gte", value)
    }

    pub fn lt(field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        Self::compare(field, "$lt", value)
    }

    pub fn lte(field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        Self::compare(field, "$lte", value)
    }

    fn compare(field: impl Into<FieldRef>, operator: &str, value: impl Into<Native>) -> Self {
        Filter(Node::entry(
            Key::field(field),
            Node::unary(operator, Node::value(value)),
        ))
    }

    pub fn in_<T: Into<Native>>(field: impl Into<FieldRef>, values: impl IntoIterator<Item = T>) -> Self {
        Self::element_set(field, "$in", values)
    }

    pub fn nin<T: Into<Native>>(field: impl Into<FieldRef>, values: impl IntoIterator<Item = T>) -> Self {
        Self::element_set(field, "$nin", values)
    }

    /// Array field containing every one of `values`.
    pub fn all<T: Into<Native>>(field: impl Into<FieldRef>, values: impl IntoIterator<Item = T>) -> Self {
        Self::element_set(field, "$all", values)
    }

    fn element_set<T: Into<Native>>(
        field: impl Into<FieldRef>,
        operator: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        let values = values.into_iter().map(Node::value).collect();
        Filter(Node::entry(Key::element(field), Node::nary(operator, values)))
    }

    /// Array field with any element equal to `value`.
    pub fn any_eq(field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        Filter(Node::entry(Key::element(field), Node::value(value)))
    }

    // =========================================================================
    // Element and evaluation
    // =========================================================================

    pub fn exists(field: impl Into<FieldRef>, exists: bool) -> Self {
        Filter(Node::entry(
            Key::field(field),
            Node::unary("$exists", Node::boolean(exists)),
        ))
    }

    pub fn size(field: impl Into<FieldRef>, size: i32) -> Self {
        Filter(Node::entry(
            Key::field(field),
            Node::unary("$size", Node::int32(size)),
        ))
    }

    /// `{field: {$mod: [divisor, remainder]}}`, both written as 64-bit integers.
    pub fn modulo(field: impl Into<FieldRef>, divisor: i64, remainder: i64) -> Self {
        Filter(Node::entry(
            Key::field(field),
            Node::unary(
                "$mod",
                Node::Array(vec![
                    Node::typed(divisor, SemanticType::Int64),
                    Node::typed(remainder, SemanticType::Int64),
                ]),
            ),
        ))
    }

    pub fn regex(field: impl Into<FieldRef>, pattern: impl Into<String>, options: impl Into<String>) -> Self {
        let regex = Value::Regex {
            pattern: pattern.into(),
            options: options.into(),
        };
        Filter(Node::entry(Key::element(field), Node::value(regex)))
    }

    /// Array field with an element matching `filter`. Fields in `filter` are
    /// relative to the element type.
    pub fn elem_match(field: impl Into<FieldRef>, filter: Filter) -> Self {
        Filter(Node::entry(
            Key::field(field),
            Node::unary("$elemMatch", filter.0),
        ))
    }

    /// Documents whose discriminator says they are `class` or a descendant.
    pub fn of_type(class: impl Into<String>) -> Self {
        Filter(Node::OfType(class.into()))
    }

    /// Translate a boolean lambda body.
    pub fn where_(predicate: &Expr) -> Result<Self, CompileError> {
        PredicateTranslator::translate(predicate).map(Filter)
    }

    // =========================================================================
    // Logical
    // =========================================================================

    /// All of `filters`. Clauses on different fields share one document;
    /// clashing operators on the same field fall back to `$and`.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter(Node::and(filters.into_iter().map(|f| f.0).collect()))
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::logical("$or", filters)
    }

    pub fn nor(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::logical("$nor", filters)
    }

    /// Negation of `filter`: `$ne`, `$nin`, `$not` or `$nor`, whichever the
    /// rendered filter allows.
    pub fn not(filter: Filter) -> Self {
        Filter(Node::not(filter.0))
    }

    fn logical(operator: &str, filters: impl IntoIterator<Item = Filter>) -> Self {
        let nodes = filters.into_iter().map(|f| f.0).collect();
        Filter(Node::entry(Key::text(operator), Node::Array(nodes)))
    }
}
