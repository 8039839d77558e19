//! Projection builder.

use crate::ast::{FieldRef, Key, Node};
use crate::error::RenderResult;
use crate::render::Renderer;
use crate::value::Document;

use super::Filter;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    entries: Vec<(Key, Node)>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, field: impl Into<FieldRef>) -> Self {
        self.entries.push((Key::field(field), Node::int32(1)));
        self
    }

    pub fn exclude(mut self, field: impl Into<FieldRef>) -> Self {
        self.entries.push((Key::field(field), Node::int32(0)));
        self
    }

    /// First `limit` elements (last ones when negative).
    pub fn slice(mut self, field: impl Into<FieldRef>, limit: i32) -> Self {
        self.entries.push((
            Key::field(field),
            Node::unary("$slice", Node::int32(limit)),
        ));
        self
    }

    pub fn slice_from(mut self, field: impl Into<FieldRef>, skip: i32, limit: i32) -> Self {
        self.entries.push((
            Key::field(field),
            Node::nary("$slice", vec![Node::int32(skip), Node::int32(limit)]),
        ));
        self
    }

    pub fn elem_match(mut self, field: impl Into<FieldRef>, filter: Filter) -> Self {
        self.entries.push((
            Key::field(field),
            Node::unary("$elemMatch", filter.into_node()),
        ));
        self
    }

    /// Later projections of the same field win.
    pub fn combine(projections: impl IntoIterator<Item = Projection>) -> Self {
        Self {
            entries: projections
                .into_iter()
                .flat_map(|p| p.entries)
                .collect(),
        }
    }

    pub fn into_node(self) -> Node {
        Node::Document(self.entries)
    }

    pub fn render(&self, renderer: &Renderer) -> RenderResult<Document> {
        renderer.render_document(&Node::Document(self.entries.clone()))
    }
}
