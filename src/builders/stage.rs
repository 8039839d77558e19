//! Pipeline stage constructors.

use crate::ast::{FieldRef, Key, Node};
use crate::codec::SemanticType;
use crate::pipeline::{Stage, StageOrigin, StageOutput};

use super::{Filter, Projection, Sort};

impl Stage {
    pub fn match_(filter: Filter) -> Self {
        Stage::new("$match", filter.into_node())
    }

    pub fn project(projection: Projection) -> Self {
        Stage::new("$project", projection.into_node()).with_output(StageOutput::Untyped)
    }

    pub fn sort(sort: Sort) -> Self {
        Stage::new("$sort", sort.into_node())
    }

    pub fn limit(limit: i64) -> Self {
        Stage::new("$limit", Node::typed(limit, SemanticType::Int64))
    }

    pub fn skip(skip: i64) -> Self {
        Stage::new("$skip", Node::typed(skip, SemanticType::Int64))
    }

    /// `{$unwind: "$field"}`
    pub fn unwind(field: impl Into<FieldRef>) -> Self {
        Stage::new("$unwind", Node::field(field))
    }

    /// `{$sortByCount: "$field"}`
    pub fn sort_by_count(field: impl Into<FieldRef>) -> Self {
        Stage::new("$sortByCount", Node::field(field)).with_output(StageOutput::Untyped)
    }

    pub fn count(output_field: impl Into<String>) -> Self {
        Stage::new("$count", Node::string(output_field)).with_output(StageOutput::Untyped)
    }

    /// Add or replace fields. Values are aggregation expressions.
    pub fn set(fields: Vec<(FieldRef, Node)>) -> Self {
        let entries = fields
            .into_iter()
            .map(|(field, value)| (Key::Field(field), value))
            .collect();
        Stage::new("$set", Node::Document(entries))
    }

    /// `{$replaceRoot: {newRoot: "$field"}}`; later stages see the field's type.
    pub fn replace_root(field: impl Into<FieldRef>) -> Self {
        let field = field.into();
        Stage::new(
            "$replaceRoot",
            Node::entry(Key::text("newRoot"), Node::Field(field.clone())),
        )
        .with_output(StageOutput::FieldType(field))
    }

    /// `{$group: {_id: id, name: accumulator, ...}}`
    pub fn group(id: Node, accumulators: Vec<(String, Node)>) -> Self {
        let mut entries = vec![(Key::text("_id"), id)];
        entries.extend(
            accumulators
                .into_iter()
                .map(|(name, accumulator)| (Key::Text(name), accumulator)),
        );
        Stage::new("$group", Node::Document(entries)).with_output(StageOutput::Untyped)
    }

    /// Restrict to documents of `class` (or its descendants). Adjacent type
    /// restrictions merge; later stages resolve fields against `class`.
    pub fn of_type(class: impl Into<String>) -> Self {
        let class = class.into();
        Stage::new("$match", Node::OfType(class.clone()))
            .with_origin(StageOrigin::TypeFilter)
            .with_output(StageOutput::Class(class))
    }
}

/// Group accumulators.
pub struct Accumulator;

impl Accumulator {
    pub fn sum(field: impl Into<FieldRef>) -> Node {
        Node::unary("$sum", Node::field(field))
    }

    /// `{$sum: 1}`
    pub fn count() -> Node {
        Node::unary("$sum", Node::int32(1))
    }

    pub fn avg(field: impl Into<FieldRef>) -> Node {
        Node::unary("$avg", Node::field(field))
    }

    pub fn min(field: impl Into<FieldRef>) -> Node {
        Node::unary("$min", Node::field(field))
    }

    pub fn max(field: impl Into<FieldRef>) -> Node {
        Node::unary("$max", Node::field(field))
    }

    pub fn first(field: impl Into<FieldRef>) -> Node {
        Node::unary("$first", Node::field(field))
    }

    pub fn last(field: impl Into<FieldRef>) -> Node {
        Node::unary("$last", Node::field(field))
    }

    pub fn push(field: impl Into<FieldRef>) -> Node {
        Node::unary("$push", Node::field(field))
    }

    pub fn add_to_set(field: impl Into<FieldRef>) -> Node {
        Node::unary("$addToSet", Node::field(field))
    }
}
