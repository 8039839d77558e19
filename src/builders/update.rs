//! Update builder.

use crate::ast::{FieldRef, Key, Node};
use crate::codec::Native;
use crate::combine::combine;
use crate::error::RenderResult;
use crate::render::Renderer;
use crate::value::Document;

use super::Filter;

/// An update document made of operator sections (`$set`, `$inc`, ...).
///
/// Sections appear in the order they were first used. Assigning the same
/// field twice within a section keeps the last value at the first position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    sections: Vec<(String, Vec<(Key, Node)>)>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn with(mut self, operator: &str, key: Key, value: Node) -> Self {
        match self.sections.iter().position(|(op, _)| op == operator) {
            Some(index) => self.sections[index].1.push((key, value)),
            None => self
                .sections
                .push((operator.to_string(), vec![(key, value)])),
        }
        self
    }

    pub fn set(self, field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        self.with("$set", Key::field(field), Node::value(value))
    }

    pub fn set_on_insert(self, field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        self.with("$setOnInsert", Key::field(field), Node::value(value))
    }

    pub fn unset(self, field: impl Into<FieldRef>) -> Self {
        self.with("$unset", Key::field(field), Node::string(""))
    }

    pub fn inc(self, field: impl Into<FieldRef>, amount: impl Into<Native>) -> Self {
        self.with("$inc", Key::field(field), Node::value(amount))
    }

    pub fn mul(self, field: impl Into<FieldRef>, factor: impl Into<Native>) -> Self {
        self.with("$mul", Key::field(field), Node::value(factor))
    }

    pub fn min(self, field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        self.with("$min", Key::field(field), Node::value(value))
    }

    pub fn max(self, field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        self.with("$max", Key::field(field), Node::value(value))
    }

    /// Rename `field` to the canonical name of `to`.
    pub fn rename(self, field: impl Into<FieldRef>, to: impl Into<FieldRef>) -> Self {
        self.with("$rename", Key::field(field), Node::field_name(to))
    }

    pub fn push(self, field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        self.with("$push", Key::element(field), Node::value(value))
    }

    pub fn push_each<T: Into<Native>>(
        self,
        field: impl Into<FieldRef>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.with("$push", Key::element(field), each(values))
    }

    pub fn add_to_set(self, field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        self.with("$addToSet", Key::element(field), Node::value(value))
    }

    pub fn add_to_set_each<T: Into<Native>>(
        self,
        field: impl Into<FieldRef>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.with("$addToSet", Key::element(field), each(values))
    }

    pub fn pull(self, field: impl Into<FieldRef>, value: impl Into<Native>) -> Self {
        self.with("$pull", Key::element(field), Node::value(value))
    }

    /// Remove the elements matching `filter`, whose fields are relative to the element type.
    pub fn pull_filter(self, field: impl Into<FieldRef>, filter: Filter) -> Self {
        self.with("$pull", Key::field(field), filter.into_node())
    }

    pub fn pop_first(self, field: impl Into<FieldRef>) -> Self {
        self.with("$pop", Key::field(field), Node::int32(-1))
    }

    pub fn pop_last(self, field: impl Into<FieldRef>) -> Self {
        self.with("$pop", Key::field(field), Node::int32(1))
    }

    pub fn current_date(self, field: impl Into<FieldRef>) -> Self {
        self.with("$currentDate", Key::field(field), Node::boolean(true))
    }

    /// Concatenate updates. Rendering merges them section by section.
    pub fn combine(updates: impl IntoIterator<Item = Update>) -> Self {
        let mut combined = Update::new();
        for update in updates {
            for (operator, entries) in update.sections {
                for (key, value) in entries {
                    combined = combined.with(&operator, key, value);
                }
            }
        }
        combined
    }

    /// One node per section, in section order.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.sections
            .iter()
            .map(|(operator, entries)| Node::map(operator.clone(), entries.clone()))
    }

    pub fn render(&self, renderer: &Renderer) -> RenderResult<Document> {
        let rendered = self
            .nodes()
            .map(|node| renderer.render_document(&node))
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(combine(rendered))
    }
}

fn each<T: Into<Native>>(values: impl IntoIterator<Item = T>) -> Node {
    Node::unary(
        "$each",
        Node::Array(values.into_iter().map(Node::value).collect()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_in_first_use_order() {
        let update = Update::new().inc("Age", 1).set("A", 1).inc("B", 2);
        let operators: Vec<String> = update
            .nodes()
            .map(|node| match node {
                Node::Operator { name, .. } => name,
                other => panic!("Expected operator, got {:?}", other),
            })
            .collect();
        assert_eq!(operators, vec!["$inc", "$set"]);
    }

    #[test]
    fn test_combine_concatenates_sections() {
        let update = Update::combine(vec![
            Update::new().set("A", 1),
            Update::new().unset("B").set("A", 2),
        ]);
        assert_eq!(update.sections.len(), 2);
        assert_eq!(update.sections[0].1.len(), 2);
    }
}
