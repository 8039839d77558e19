//! Aggregation pipelines.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s. Stages render in the
//! order they were added and are never reordered. The only merging happens
//! between adjacent type-filter stages (successive `of_type` calls), whose
//! bodies are combined field by field with later fields winning.

use tracing::debug;

use crate::ast::{FieldRef, Node};
use crate::builders::{Filter, Projection, Sort};
use crate::codec::SemanticType;
use crate::error::RenderResult;
use crate::render::Renderer;
use crate::value::{Document, Value};

/// Which kind of operation produced a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOrigin {
    Caller,
    /// Produced by a type restriction (`of_type`).
    TypeFilter,
}

/// The document type flowing out of a stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    Unchanged,
    /// Shape unknown; later fields pass through unresolved.
    Untyped,
    Class(String),
    /// The type of a field of the input.
    FieldType(FieldRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub operator: String,
    pub body: Node,
    pub origin: StageOrigin,
    pub output: StageOutput,
}

impl Stage {
    pub fn new(operator: impl Into<String>, body: Node) -> Self {
        Self {
            operator: operator.into(),
            body,
            origin: StageOrigin::Caller,
            output: StageOutput::Unchanged,
        }
    }

    pub fn with_output(mut self, output: StageOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_origin(mut self, origin: StageOrigin) -> Self {
        self.origin = origin;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn append(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn match_(self, filter: Filter) -> Self {
        self.append(Stage::match_(filter))
    }

    pub fn project(self, projection: Projection) -> Self {
        self.append(Stage::project(projection))
    }

    pub fn sort(self, sort: Sort) -> Self {
        self.append(Stage::sort(sort))
    }

    pub fn limit(self, limit: i64) -> Self {
        self.append(Stage::limit(limit))
    }

    pub fn skip(self, skip: i64) -> Self {
        self.append(Stage::skip(skip))
    }

    pub fn unwind(self, field: impl Into<FieldRef>) -> Self {
        self.append(Stage::unwind(field))
    }

    pub fn sort_by_count(self, field: impl Into<FieldRef>) -> Self {
        self.append(Stage::sort_by_count(field))
    }

    pub fn count(self, output_field: impl Into<String>) -> Self {
        self.append(Stage::count(output_field))
    }

    pub fn replace_root(self, field: impl Into<FieldRef>) -> Self {
        self.append(Stage::replace_root(field))
    }

    pub fn group(self, id: Node, accumulators: Vec<(String, Node)>) -> Self {
        self.append(Stage::group(id, accumulators))
    }

    pub fn of_type(self, class: impl Into<String>) -> Self {
        self.append(Stage::of_type(class))
    }

    /// Render every stage, starting from the renderer's root type.
    pub fn render(&self, renderer: &Renderer) -> RenderResult<Vec<Document>> {
        let mut current = renderer.clone();
        let mut rendered: Vec<(StageOrigin, Document)> = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let body = current.render(&stage.body)?;
            let merged = match (rendered.last_mut(), &body) {
                (Some((StageOrigin::TypeFilter, previous)), Value::Document(_))
                    if stage.origin == StageOrigin::TypeFilter =>
                {
                    merge_into(previous, &stage.operator, &body)
                }
                _ => false,
            };
            if merged {
                debug!(operator = %stage.operator, "merged adjacent type filter stages");
            } else {
                rendered.push((stage.origin, Document::single(stage.operator.clone(), body)));
            }
            current = next_renderer(&current, &stage.output)?;
        }
        Ok(rendered.into_iter().map(|(_, doc)| doc).collect())
    }
}

/// Merge `body` into the previous stage when it uses the same operator.
fn merge_into(previous: &mut Document, operator: &str, body: &Value) -> bool {
    let (Some(Value::Document(existing)), Value::Document(fields)) =
        (previous.get_mut(operator), body)
    else {
        return false;
    };
    existing.merge(fields.clone(), true);
    true
}

fn next_renderer<'d>(current: &Renderer<'d>, output: &StageOutput) -> RenderResult<Renderer<'d>> {
    let root = match output {
        StageOutput::Unchanged => return Ok(current.clone()),
        StageOutput::Untyped => SemanticType::Any,
        StageOutput::Class(class) => SemanticType::class(class.clone()),
        StageOutput::FieldType(field) => current
            .resolve(field)?
            .value_type
            .unwrap_or(SemanticType::Any),
    };
    Ok(current.with_root(root))
}
