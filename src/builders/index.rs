//! Index key builder.

use crate::ast::FieldRef;
use crate::error::{RenderResult, StageError};
use crate::render::Renderer;
use crate::value::{Document, Value};

#[derive(Debug, Clone, PartialEq)]
enum IndexField {
    Field(FieldRef),
    /// `$**`, or `field.$**` below a field.
    Wildcard(Option<FieldRef>),
}

/// Index key specification, e.g. `{ln: 1, age: -1}` or `{loc: "2dsphere"}`.
///
/// Keys render in the order they were added. A field may appear only once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexKeys {
    keys: Vec<(IndexField, Value)>,
}

impl IndexKeys {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, field: IndexField, kind: Value) -> Self {
        self.keys.push((field, kind));
        self
    }

    pub fn ascending(self, field: impl Into<FieldRef>) -> Self {
        self.with(IndexField::Field(field.into()), Value::Int32(1))
    }

    pub fn descending(self, field: impl Into<FieldRef>) -> Self {
        self.with(IndexField::Field(field.into()), Value::Int32(-1))
    }

    pub fn hashed(self, field: impl Into<FieldRef>) -> Self {
        self.with(IndexField::Field(field.into()), Value::from("hashed"))
    }

    pub fn text(self, field: impl Into<FieldRef>) -> Self {
        self.with(IndexField::Field(field.into()), Value::from("text"))
    }

    pub fn geo2d(self, field: impl Into<FieldRef>) -> Self {
        self.with(IndexField::Field(field.into()), Value::from("2d"))
    }

    pub fn geo2dsphere(self, field: impl Into<FieldRef>) -> Self {
        self.with(IndexField::Field(field.into()), Value::from("2dsphere"))
    }

    /// Every field of the document (`$**`).
    pub fn wildcard(self) -> Self {
        self.with(IndexField::Wildcard(None), Value::Int32(1))
    }

    /// Every field below `field` (`field.$**`).
    pub fn wildcard_below(self, field: impl Into<FieldRef>) -> Self {
        self.with(IndexField::Wildcard(Some(field.into())), Value::Int32(1))
    }

    pub fn combine(indexes: impl IntoIterator<Item = IndexKeys>) -> Self {
        Self {
            keys: indexes.into_iter().flat_map(|i| i.keys).collect(),
        }
    }

    pub fn render(&self, renderer: &Renderer) -> RenderResult<Document> {
        let mut doc = Document::new();
        for (field, kind) in &self.keys {
            let name = match field {
                IndexField::Field(field) => renderer.resolve(field)?.name,
                IndexField::Wildcard(None) => "$**".to_string(),
                IndexField::Wildcard(Some(field)) => {
                    format!("{}.$**", renderer.resolve(field)?.name)
                }
            };
            if doc.contains_key(&name) {
                return Err(StageError::DuplicateIndexKey(name).into());
            }
            doc.insert(name, kind.clone());
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::codec::SemanticType;
    use crate::error::RenderError;
    use crate::expr::Expr;
    use crate::fixtures::{person, person_domain};

    fn render(keys: IndexKeys) -> RenderResult<serde_json::Value> {
        let domain = person_domain();
        let renderer = Renderer::new(&domain, person());
        Ok(keys.render(&renderer)?.to_json())
    }

    #[test]
    fn test_directional_keys_use_element_names() {
        let keys = IndexKeys::new()
            .ascending("LastName")
            .descending(Expr::param().member("Age"));
        assert_eq!(render(keys).unwrap(), json!({"ln": 1, "age": -1}));
    }

    #[test]
    fn test_special_index_kinds() {
        let keys = IndexKeys::new()
            .hashed("Id")
            .text("Name.First")
            .geo2d("Tags")
            .geo2dsphere("Scores");
        assert_eq!(
            render(keys).unwrap(),
            json!({"_id": "hashed", "name.fn": "text", "tags": "2d", "scores": "2dsphere"})
        );
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(render(IndexKeys::new().wildcard()).unwrap(), json!({"$**": 1}));
        assert_eq!(
            render(IndexKeys::new().wildcard_below("Name")).unwrap(),
            json!({"name.$**": 1})
        );
    }

    #[test]
    fn test_combine_keeps_order() {
        let keys = IndexKeys::combine(vec![
            IndexKeys::new().ascending("FirstName"),
            IndexKeys::new().hashed("LastName").descending("Age"),
        ]);
        assert_eq!(
            render(keys).unwrap(),
            json!({"fn": 1, "ln": "hashed", "age": -1})
        );
    }

    #[test]
    fn test_same_field_twice_is_rejected() {
        let keys = IndexKeys::combine(vec![
            IndexKeys::new().ascending("FirstName"),
            IndexKeys::new().descending("fn"),
        ]);
        let err = render(keys).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Stage(StageError::DuplicateIndexKey(ref name)) if name == "fn"
        ));
    }

    #[test]
    fn test_unregistered_root_passes_names_through() {
        let domain = person_domain();
        let renderer = Renderer::new(&domain, SemanticType::Any);
        let keys = IndexKeys::new().ascending("anything.goes");
        assert_eq!(
            keys.render(&renderer).unwrap().to_json(),
            json!({"anything.goes": 1})
        );
    }
}
