use crate::ast::{FieldRef, Key, Node};
use crate::error::RenderResult;
use crate::render::Renderer;
use crate::value::Document;

/// Sort specification, e.g. `{age: 1, fn: -1}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sort {
    entries: Vec<(Key, Node)>,
}

impl Sort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ascending(mut self, field: impl Into<FieldRef>) -> Self {
        self.entries.push((Key::field(field), Node::int32(1)));
        self
    }

    pub fn descending(mut self, field: impl Into<FieldRef>) -> Self {
        self.entries.push((Key::field(field), Node::int32(-1)));
        self
    }

    pub fn combine(sorts: impl IntoIterator<Item = Sort>) -> Self {
        Self {
            entries: sorts.into_iter().flat_map(|s| s.entries).collect(),
        }
    }

    pub fn into_node(self) -> Node {
        Node::Document(self.entries)
    }

    pub fn render(&self, renderer: &Renderer) -> RenderResult<Document> {
        renderer.render_document(&Node::Document(self.entries.clone()))
    }
}
