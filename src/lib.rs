//! Docrender: typed field and pipeline-stage rendering into canonical documents.
//!
//! Queries, updates and aggregation stages are built as operation trees that
//! name fields the way application code does (`FirstName`, `x.Pets[0].Type`).
//! Rendering against a [`Domain`] turns them into documents that use stored
//! element names (`fn`, `pets.0.type`) with every literal encoded by the
//! codec of the field it is compared with.
//!
//! # Example
//!
//! ```
//! use docrender::class_map::ClassMapBuilder;
//! use docrender::codec::SemanticType;
//! use docrender::{Domain, Filter, Renderer};
//!
//! let domain = Domain::new("people");
//! let mut person = ClassMapBuilder::new("Person");
//! person.map("FirstName", SemanticType::String).element_name("fn");
//! person.map("Age", SemanticType::Int32).element_name("age");
//! domain.register_class(person);
//!
//! let renderer = Renderer::new(&domain, SemanticType::class("Person"));
//! let filter = Filter::and(vec![Filter::eq("FirstName", "Jack"), Filter::gt("Age", 10)]);
//! let rendered = filter.render(&renderer).unwrap();
//! assert_eq!(rendered.to_string(), r#"{"fn":"Jack","age":{"$gt":10}}"#);
//! ```

#![allow(clippy::module_inception)]
#![allow(clippy::result_large_err)]
#![allow(clippy::new_without_default)]
#![allow(clippy::too_many_arguments)]

pub mod ast;
pub mod builders;
pub mod class_map;
pub mod codec;
pub mod combine;
pub mod domain;
pub mod error;
pub mod expr;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod value;

#[cfg(test)]
pub(crate) mod fixtures;

pub use builders::{Filter, IndexKeys, Projection, Sort, Update};
pub use domain::{Domain, DomainSettings};
pub use error::{RenderError, RenderResult};
pub use pipeline::Pipeline;
pub use render::Renderer;
pub use value::{Document, Value};
