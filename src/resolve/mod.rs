//! Field path resolution.
//!
//! Walks a [`FieldPath`] against the ClassMap of a root type and produces the
//! canonical dotted name plus the codec governing the value found there.
//! A member that cannot be found is not an error: it and every segment after
//! it are emitted verbatim and the field carries no codec, so literals
//! compared against it are encoded by their runtime shape.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::class_map::ClassMapRef;
use crate::codec::{Codec, CodecRef, ConvertIfPossibleCodec, Native, SemanticType};
use crate::domain::Domain;
use crate::error::{RenderResult, ResolveError};
use crate::path::{FieldPath, Segment};

/// What to do when a single value is supplied for an array field the caller
/// did not mark as accepting element values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarForArrayPolicy {
    /// Encode the value with the element codec through a convert-if-possible adapter.
    #[default]
    Adapt,
    /// Fail with `AmbiguousScalarForArrayField`.
    Reject,
}

impl ScalarForArrayPolicy {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "adapt" => Some(ScalarForArrayPolicy::Adapt),
            "reject" => Some(ScalarForArrayPolicy::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Look for members declared only on known subtypes.
    pub search_subtypes: bool,
    /// The value is an element of the (array) field, not the whole field.
    pub allow_scalar_for_array: bool,
}

impl ResolveOptions {
    pub fn scalar_for_array(mut self) -> Self {
        self.allow_scalar_for_array = true;
        self
    }
}

/// A field after resolution.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    /// `None` when some segment could not be resolved.
    pub codec: Option<CodecRef>,
    pub value_type: Option<SemanticType>,
}

impl ResolvedField {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codec: None,
            value_type: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.codec.is_some()
    }

    /// The codec to encode `value` with when it is compared with or assigned
    /// to this field. `None` means "infer from the value".
    pub fn codec_for(
        &self,
        value: &Native,
        policy: ScalarForArrayPolicy,
    ) -> RenderResult<Option<CodecRef>> {
        let Some(codec) = &self.codec else {
            return Ok(None);
        };
        let is_collection = self
            .value_type
            .as_ref()
            .is_some_and(SemanticType::is_collection);
        if !is_collection || value.is_list() || value.is_null() {
            return Ok(Some(codec.clone()));
        }
        match (policy, codec.element_codec()) {
            (ScalarForArrayPolicy::Adapt, Some(element)) => {
                Ok(Some(Arc::new(ConvertIfPossibleCodec::new(element))))
            }
            (ScalarForArrayPolicy::Adapt, None) => Ok(Some(codec.clone())),
            (ScalarForArrayPolicy::Reject, _) => {
                Err(ResolveError::AmbiguousScalarForArrayField {
                    field: self.name.clone(),
                }
                .into())
            }
        }
    }
}

/// Where the walk currently is.
struct Context {
    ty: SemanticType,
    /// Member-level codec override for `ty`, if any.
    codec: Option<CodecRef>,
}

impl Context {
    fn element(&self) -> Option<Context> {
        let ty = self.ty.element_type()?.clone();
        let codec = self.codec.as_ref().and_then(|c| c.element_codec());
        Some(Context { ty, codec })
    }
}

pub struct Resolver<'d> {
    domain: &'d Domain,
    options: ResolveOptions,
}

impl<'d> Resolver<'d> {
    pub fn new(domain: &'d Domain, options: ResolveOptions) -> Self {
        Self { domain, options }
    }

    pub fn resolve(&self, root: &SemanticType, path: &FieldPath) -> RenderResult<ResolvedField> {
        let mut names: Vec<String> = Vec::with_capacity(path.len());
        let mut context = Some(Context {
            ty: root.clone(),
            codec: None,
        });

        for segment in path.segments() {
            context = match segment {
                Segment::TypeAs(class) => {
                    context.map(|ctx| self.narrow(ctx, class))
                }
                Segment::Index(i) => {
                    names.push(i.to_string());
                    context.and_then(|ctx| ctx.element())
                }
                Segment::Positional => {
                    names.push("$".to_string());
                    context.and_then(|ctx| ctx.element())
                }
                Segment::Member(name) => match context {
                    None => {
                        names.push(name.clone());
                        None
                    }
                    Some(ctx) => {
                        let (element_name, next) = self.member(ctx, name)?;
                        if next.is_none() {
                            debug!(
                                root = %root,
                                path = %path,
                                member = %name,
                                "member not found, passing the remaining path through"
                            );
                        }
                        names.push(element_name);
                        next
                    }
                },
            };
        }

        let name = names.join(".");
        let Some(mut ctx) = context else {
            return Ok(ResolvedField::unresolved(name));
        };
        if self.options.allow_scalar_for_array {
            if let Some(element) = ctx.element() {
                ctx = element;
            }
        }
        let codec = match ctx.codec {
            Some(codec) => codec,
            None => self.domain.get_codec(&ctx.ty)?,
        };
        Ok(ResolvedField {
            name,
            codec: Some(codec),
            value_type: Some(ctx.ty),
        })
    }

    fn narrow(&self, ctx: Context, class: &str) -> Context {
        if let Some(current) = ctx.ty.class_name() {
            if !self.domain.is_subtype(class, current) {
                debug!(from = current, to = class, "cast to a type outside the hierarchy");
            }
        }
        Context {
            ty: SemanticType::class(class),
            codec: None,
        }
    }

    /// The ClassMap governing `ctx`, if it is a registered structured type.
    fn class_map_of(&self, ctx: &Context) -> RenderResult<Option<ClassMapRef>> {
        if let Some(map) = ctx.codec.as_ref().and_then(|c| c.class_map()) {
            return Ok(Some(map));
        }
        match ctx.ty.class_name() {
            Some(name) if self.domain.is_class_registered(name) => {
                Ok(Some(self.domain.class_map(name)?))
            }
            _ => Ok(None),
        }
    }

    /// Resolve one member segment. Returns the emitted name and the context
    /// to continue with, `None` when the member is unknown.
    fn member(&self, ctx: Context, name: &str) -> RenderResult<(String, Option<Context>)> {
        if ctx.ty.is_collection() {
            let Some(element) = ctx.element() else {
                return Ok((name.to_string(), None));
            };
            if is_array_index(name) {
                return Ok((name.to_string(), Some(element)));
            }
            // `pets.type` addresses a member of every element.
            return self.member(element, name);
        }

        let Some(map) = self.class_map_of(&ctx)? else {
            return Ok((name.to_string(), None));
        };
        if let Some(member) = map.member(name) {
            return Ok((
                member.element_name.clone(),
                Some(Context {
                    ty: member.member_type.clone(),
                    codec: member.codec.clone(),
                }),
            ));
        }
        if self.options.search_subtypes {
            for subtype in self.domain.descendants(map.name())? {
                if let Some(member) = subtype.member(name) {
                    return Ok((
                        member.element_name.clone(),
                        Some(Context {
                            ty: member.member_type.clone(),
                            codec: member.codec.clone(),
                        }),
                    ));
                }
            }
        }
        Ok((name.to_string(), None))
    }
}

fn is_array_index(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
}
