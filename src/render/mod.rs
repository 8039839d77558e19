//! Rendering operation trees into canonical documents.
//!
//! The renderer is where names and codecs are finally decided. Keys that
//! reference fields are resolved against the type in scope, and every literal
//! below such a key is encoded with that field's codec unless the literal
//! declares its own type. Field references inside values (`"$name"`) always
//! resolve against the root type.
//!
//! Conjunctions and negations are applied to the rendered clauses, so two
//! spellings of one field (`Age`, `x.Age`, `age`) are recognised as the same.

mod logical;

use tracing::trace;

use crate::ast::{FieldRef, Key, Literal, Node, OperatorShape};
use crate::codec::{Codec, SemanticType};
use crate::domain::{Domain, DomainSettings};
use crate::error::{RenderResult, StageError};
use crate::resolve::{ResolveOptions, ResolvedField, Resolver, ScalarForArrayPolicy};
use crate::value::{Document, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub search_subtypes: bool,
    pub scalar_for_array: ScalarForArrayPolicy,
}

impl RenderOptions {
    pub fn from_settings(settings: &DomainSettings) -> Self {
        Self {
            search_subtypes: settings.search_subtypes,
            scalar_for_array: settings.scalar_for_array,
        }
    }
}

/// Renders nodes for one root type within one domain.
#[derive(Debug, Clone)]
pub struct Renderer<'d> {
    domain: &'d Domain,
    root: SemanticType,
    options: RenderOptions,
}

impl<'d> Renderer<'d> {
    pub fn new(domain: &'d Domain, root: SemanticType) -> Self {
        let options = RenderOptions::from_settings(domain.settings());
        Self::with_options(domain, root, options)
    }

    pub fn with_options(domain: &'d Domain, root: SemanticType, options: RenderOptions) -> Self {
        Self {
            domain,
            root,
            options,
        }
    }

    /// A renderer for the same domain and options over another root type.
    pub fn with_root(&self, root: SemanticType) -> Self {
        Self {
            domain: self.domain,
            root,
            options: self.options,
        }
    }

    pub fn domain(&self) -> &'d Domain {
        self.domain
    }

    pub fn root(&self) -> &SemanticType {
        &self.root
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn render(&self, node: &Node) -> RenderResult<Value> {
        self.node(node, &self.root, None)
    }

    pub fn render_document(&self, node: &Node) -> RenderResult<Document> {
        match self.render(node)? {
            Value::Document(doc) => Ok(doc),
            other => Err(StageError::NotADocument(other.type_name().to_string()).into()),
        }
    }

    /// Resolve a field against the root type.
    pub fn resolve(&self, field: &FieldRef) -> RenderResult<ResolvedField> {
        self.resolve_in(&self.root, field, false)
    }

    fn resolve_in(
        &self,
        scope: &SemanticType,
        field: &FieldRef,
        element: bool,
    ) -> RenderResult<ResolvedField> {
        let path = field.to_path()?;
        let options = ResolveOptions {
            search_subtypes: self.options.search_subtypes,
            allow_scalar_for_array: element,
        };
        Resolver::new(self.domain, options).resolve(scope, &path)
    }

    fn node(
        &self,
        node: &Node,
        scope: &SemanticType,
        field: Option<&ResolvedField>,
    ) -> RenderResult<Value> {
        match node {
            Node::Literal(literal) => self.literal(literal, field),
            Node::Field(reference) => {
                let resolved = self.resolve(reference)?;
                Ok(Value::String(format!("${}", resolved.name)))
            }
            Node::FieldName(reference) => Ok(Value::String(self.resolve(reference)?.name)),
            Node::Document(entries) => Ok(Value::Document(self.entries(entries, scope, field)?)),
            Node::Array(items) => items
                .iter()
                .map(|item| self.node(item, scope, field))
                .collect::<RenderResult<Vec<_>>>()
                .map(Value::Array),
            Node::Operator { name, shape } => {
                let operand = match shape {
                    OperatorShape::Unary(operand) => self.node(operand, scope, field)?,
                    OperatorShape::NAry(operands) => Value::Array(
                        operands
                            .iter()
                            .map(|operand| self.node(operand, scope, field))
                            .collect::<RenderResult<Vec<_>>>()?,
                    ),
                    OperatorShape::Map(entries) => {
                        Value::Document(self.entries(entries, scope, field)?)
                    }
                };
                Ok(Value::Document(Document::single(name.clone(), operand)))
            }
            Node::OfType(class) => Ok(Value::Document(self.type_filter(scope, class)?)),
            Node::And(filters) => {
                let rendered = filters
                    .iter()
                    .map(|filter| self.filter(filter, scope, field))
                    .collect::<RenderResult<Vec<_>>>()?;
                Ok(Value::Document(logical::conjoin(rendered)))
            }
            Node::Not(filter) => Ok(Value::Document(logical::negate(
                self.filter(filter, scope, field)?,
            ))),
        }
    }

    /// Render a node that must produce a filter document.
    fn filter(
        &self,
        node: &Node,
        scope: &SemanticType,
        field: Option<&ResolvedField>,
    ) -> RenderResult<Document> {
        match self.node(node, scope, field)? {
            Value::Document(doc) => Ok(doc),
            other => Err(StageError::NotADocument(other.type_name().to_string()).into()),
        }
    }

    fn entries(
        &self,
        entries: &[(Key, Node)],
        scope: &SemanticType,
        field: Option<&ResolvedField>,
    ) -> RenderResult<Document> {
        let mut doc = Document::new();
        for (key, value) in entries {
            match key {
                Key::Text(name) => {
                    doc.insert(name.clone(), self.node(value, scope, field)?);
                }
                Key::Field(reference) | Key::ElementField(reference) => {
                    let element = matches!(key, Key::ElementField(_));
                    let resolved = self.resolve_in(scope, reference, element)?;
                    let inner_scope = value_scope(&resolved);
                    let rendered = self.node(value, &inner_scope, Some(&resolved))?;
                    doc.insert(resolved.name.clone(), rendered);
                }
            }
        }
        Ok(doc)
    }

    fn literal(&self, literal: &Literal, field: Option<&ResolvedField>) -> RenderResult<Value> {
        if let Some(ty) = &literal.declared {
            let codec = self.domain.get_codec(ty)?;
            return Ok(codec.encode(&literal.value)?);
        }
        let codec = match field {
            Some(field) => field.codec_for(&literal.value, self.options.scalar_for_array)?,
            None => None,
        };
        match codec {
            Some(codec) => Ok(codec.encode(&literal.value)?),
            None => {
                trace!(value = literal.value.type_name(), "no codec context, inferring");
                Ok(literal.value.infer())
            }
        }
    }

    /// `{_t: "D"}`, `{_t: {$in: [...]}}` for types with descendants, or an
    /// empty document when `class` is the type in scope.
    pub(crate) fn type_filter(&self, scope: &SemanticType, class: &str) -> RenderResult<Document> {
        let Some(nominal) = scope.class_name() else {
            return Err(StageError::NoDiscriminator(scope.to_string()).into());
        };
        if class == nominal {
            return Ok(Document::new());
        }
        if !self.domain.is_subtype(class, nominal) {
            return Err(StageError::NotASubtype {
                nominal: nominal.to_string(),
                actual: class.to_string(),
            }
            .into());
        }

        let actual = self.domain.class_map(class)?;
        let discriminator = actual
            .discriminator()
            .ok_or_else(|| StageError::NoDiscriminator(class.to_string()))?;
        let mut values = vec![Value::from(discriminator)];
        for descendant in self.domain.descendants(class)? {
            if let Some(value) = descendant.discriminator() {
                values.push(Value::from(value));
            }
        }

        let test = if values.len() == 1 {
            Value::from(discriminator)
        } else {
            Value::Document(Document::single("$in", values))
        };
        Ok(Document::single(actual.discriminator_field(), test))
    }
}

/// Type the keys below a resolved field are resolved against.
fn value_scope(field: &ResolvedField) -> SemanticType {
    match &field.value_type {
        Some(ty) => ty.element_type().unwrap_or(ty).clone(),
        None => SemanticType::Any,
    }
}

#[cfg(test)]
mod tests;
