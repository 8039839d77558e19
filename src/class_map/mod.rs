//! Structural metadata for mapped types.
//!
//! A [`ClassMap`] tells the resolver and the class codec how the members of one
//! structured type are serialized: their element names, declared types, codec
//! overrides and where the type sits in a discriminated hierarchy. Maps are
//! built once per domain from a [`ClassMapBuilder`] and never change afterwards.

mod builder;
mod naming;

use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{CodecRef, Native, SemanticType};

pub use builder::{ClassMapBuilder, MemberBuilder};
pub use naming::NamingConvention;

/// Shared handle for a frozen map.
pub type ClassMapRef = Arc<ClassMap>;

/// One mapped member.
#[derive(Debug, Clone)]
pub struct MemberMap {
    pub member_name: String,
    pub element_name: String,
    pub member_type: SemanticType,
    pub codec: Option<CodecRef>,
    pub ignore_if_null: bool,
    pub default_value: Option<Native>,
    pub declaring_class: String,
}

impl MemberMap {
    pub fn ignore_if_default(&self) -> bool {
        self.default_value.is_some()
    }
}

/// Outcome of a member lookup. A miss is an ordinary result, not an error.
#[derive(Debug, Clone, Copy)]
pub enum MemberLookup<'a> {
    Found(&'a MemberMap),
    NotFound,
}

impl<'a> MemberLookup<'a> {
    pub fn found(self) -> Option<&'a MemberMap> {
        match self {
            MemberLookup::Found(member) => Some(member),
            MemberLookup::NotFound => None,
        }
    }
}

/// Frozen metadata for one structured type.
#[derive(Debug)]
pub struct ClassMap {
    name: String,
    base: Option<String>,
    root: String,
    discriminator_field: String,
    discriminator: Option<String>,
    discriminator_required: bool,
    known_subtypes: Vec<String>,
    members: Vec<MemberMap>,
    by_member_name: HashMap<String, usize>,
    by_element_name: HashMap<String, usize>,
}

impl ClassMap {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        base: Option<String>,
        root: String,
        discriminator_field: String,
        discriminator: Option<String>,
        discriminator_required: bool,
        known_subtypes: Vec<String>,
        members: Vec<MemberMap>,
    ) -> Self {
        let by_member_name = members
            .iter()
            .enumerate()
            .map(|(i, m)| (m.member_name.clone(), i))
            .collect();
        let by_element_name = members
            .iter()
            .enumerate()
            .map(|(i, m)| (m.element_name.clone(), i))
            .collect();
        Self {
            name,
            base,
            root,
            discriminator_field,
            discriminator,
            discriminator_required,
            known_subtypes,
            members,
            by_member_name,
            by_element_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Name of the topmost class of the hierarchy (itself when there is no base).
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn discriminator_field(&self) -> &str {
        &self.discriminator_field
    }

    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    pub fn discriminator_required(&self) -> bool {
        self.discriminator_required
    }

    /// Direct subtypes, in registration order.
    pub fn known_subtypes(&self) -> &[String] {
        &self.known_subtypes
    }

    pub fn members(&self) -> &[MemberMap] {
        &self.members
    }

    /// Look a member up by its member name, then by its element name.
    pub fn lookup(&self, name: &str) -> MemberLookup<'_> {
        let index = self
            .by_member_name
            .get(name)
            .or_else(|| self.by_element_name.get(name));
        match index {
            Some(&i) => MemberLookup::Found(&self.members[i]),
            None => MemberLookup::NotFound,
        }
    }

    pub fn member(&self, name: &str) -> Option<&MemberMap> {
        self.lookup(name).found()
    }

    pub fn member_by_element_name(&self, element_name: &str) -> Option<&MemberMap> {
        self.by_element_name
            .get(element_name)
            .map(|&i| &self.members[i])
    }
}
