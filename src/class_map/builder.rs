//! Explicit ClassMap construction.

use std::collections::HashSet;

use crate::codec::{CodecRef, Native, SemanticType};
use crate::error::ClassMapError;

use super::naming::NamingConvention;
use super::{ClassMap, MemberMap};

/// Describes one member before the ClassMap is frozen.
#[derive(Debug, Clone)]
pub struct MemberBuilder {
    pub(crate) member_name: String,
    pub(crate) member_type: SemanticType,
    pub(crate) element_name: Option<String>,
    pub(crate) codec: Option<CodecRef>,
    pub(crate) ignore_if_null: bool,
    pub(crate) default_value: Option<Native>,
}

impl MemberBuilder {
    /// Serialize this member under an explicit element name.
    pub fn element_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.element_name = Some(name.into());
        self
    }

    /// Use a specific codec instead of the one registered for the member type.
    pub fn codec(&mut self, codec: CodecRef) -> &mut Self {
        self.codec = Some(codec);
        self
    }

    pub fn ignore_if_null(&mut self) -> &mut Self {
        self.ignore_if_null = true;
        self
    }

    /// Omit the member when it equals `default`.
    pub fn ignore_if_default(&mut self, default: impl Into<Native>) -> &mut Self {
        self.default_value = Some(default.into());
        self
    }
}

/// Builds the metadata for one structured type.
///
/// ```
/// use docrender::class_map::ClassMapBuilder;
/// use docrender::codec::SemanticType;
///
/// let mut person = ClassMapBuilder::new("Person");
/// person.map("FirstName", SemanticType::String).element_name("fn");
/// person.map("Age", SemanticType::Int32).element_name("age");
/// ```
#[derive(Debug, Clone)]
pub struct ClassMapBuilder {
    pub(crate) name: String,
    pub(crate) base: Option<String>,
    pub(crate) naming: Option<NamingConvention>,
    pub(crate) discriminator: Option<String>,
    pub(crate) discriminator_field: Option<String>,
    pub(crate) discriminator_required: bool,
    pub(crate) known_subtypes: Vec<String>,
    pub(crate) members: Vec<MemberBuilder>,
}

impl ClassMapBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            naming: None,
            discriminator: None,
            discriminator_field: None,
            discriminator_required: false,
            known_subtypes: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_name(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Declare a member. Declaring the same member twice replaces it.
    pub fn map(&mut self, member_name: impl Into<String>, ty: SemanticType) -> &mut MemberBuilder {
        let member_name = member_name.into();
        let member = MemberBuilder {
            member_name: member_name.clone(),
            member_type: ty,
            element_name: None,
            codec: None,
            ignore_if_null: false,
            default_value: None,
        };
        let index = match self
            .members
            .iter()
            .position(|m| m.member_name == member_name)
        {
            Some(index) => {
                self.members[index] = member;
                index
            }
            None => {
                self.members.push(member);
                self.members.len() - 1
            }
        };
        &mut self.members[index]
    }

    pub fn base(&mut self, base: impl Into<String>) -> &mut Self {
        self.base = Some(base.into());
        self
    }

    pub fn naming(&mut self, naming: NamingConvention) -> &mut Self {
        self.naming = Some(naming);
        self
    }

    /// Discriminator value written for instances of this class. Defaults to the class name.
    pub fn discriminator(&mut self, value: impl Into<String>) -> &mut Self {
        self.discriminator = Some(value.into());
        self
    }

    /// Element holding the discriminator. Only honored on the root of a hierarchy.
    pub fn discriminator_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.discriminator_field = Some(field.into());
        self
    }

    /// Always write the discriminator, even when the actual type is the nominal type.
    pub fn discriminator_required(&mut self) -> &mut Self {
        self.discriminator_required = true;
        self
    }

    pub fn known_subtype(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.known_subtypes.contains(&name) {
            self.known_subtypes.push(name);
        }
        self
    }

    /// Produce the immutable ClassMap.
    ///
    /// `base` must be the already frozen map of the declared base class.
    /// Inherited members come first; a member redeclared here replaces the
    /// inherited one in place.
    pub(crate) fn freeze(
        &self,
        base: Option<&ClassMap>,
        default_naming: NamingConvention,
        default_discriminator_field: &str,
        known_subtypes: Vec<String>,
    ) -> Result<ClassMap, ClassMapError> {
        let naming = self.naming.unwrap_or(default_naming);
        let mut members: Vec<MemberMap> = base.map(|b| b.members.clone()).unwrap_or_default();

        for builder in &self.members {
            let element_name = builder
                .element_name
                .clone()
                .unwrap_or_else(|| naming.apply(&builder.member_name));
            let member = MemberMap {
                member_name: builder.member_name.clone(),
                element_name,
                member_type: builder.member_type.clone(),
                codec: builder.codec.clone(),
                ignore_if_null: builder.ignore_if_null,
                default_value: builder.default_value.clone(),
                declaring_class: self.name.clone(),
            };
            match members
                .iter()
                .position(|m| m.member_name == member.member_name)
            {
                Some(index) => members[index] = member,
                None => members.push(member),
            }
        }

        let mut seen = HashSet::new();
        for member in &members {
            if !seen.insert(member.element_name.as_str()) {
                return Err(ClassMapError::DuplicateElementName {
                    class: self.name.clone(),
                    element: member.element_name.clone(),
                });
            }
        }

        let discriminator_field = match base {
            Some(base) => base.discriminator_field.clone(),
            None => self
                .discriminator_field
                .clone()
                .unwrap_or_else(|| default_discriminator_field.to_string()),
        };
        let in_hierarchy = base.is_some() || !known_subtypes.is_empty();
        let discriminator = match (&self.discriminator, in_hierarchy) {
            (Some(value), _) => Some(value.clone()),
            (None, true) => Some(self.name.clone()),
            (None, false) => None,
        };
        let root = match base {
            Some(base) => base.root.clone(),
            None => self.name.clone(),
        };

        Ok(ClassMap::new(
            self.name.clone(),
            self.base.clone(),
            root,
            discriminator_field,
            discriminator,
            self.discriminator_required || base.is_some_and(|b| b.discriminator_required),
            known_subtypes,
            members,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freeze(builder: &ClassMapBuilder, base: Option<&ClassMap>) -> ClassMap {
        builder
            .freeze(base, NamingConvention::Verbatim, "_t", Vec::new())
            .unwrap()
    }

    #[test]
    fn test_element_names_default_to_convention() {
        let mut b = ClassMapBuilder::new("Person");
        b.map("FirstName", SemanticType::String).element_name("fn");
        b.map("LastName", SemanticType::String);
        b.naming(NamingConvention::CamelCase);
        let map = freeze(&b, None);
        assert_eq!(map.member("FirstName").unwrap().element_name, "fn");
        assert_eq!(map.member("LastName").unwrap().element_name, "lastName");
        assert_eq!(map.discriminator(), None);
    }

    #[test]
    fn test_duplicate_element_names_rejected() {
        let mut b = ClassMapBuilder::new("Person");
        b.map("A", SemanticType::String).element_name("x");
        b.map("B", SemanticType::String).element_name("x");
        let err = b
            .freeze(None, NamingConvention::Verbatim, "_t", Vec::new())
            .unwrap_err();
        assert!(matches!(err, ClassMapError::DuplicateElementName { .. }));
    }

    #[test]
    fn test_most_derived_member_wins() {
        let mut animal = ClassMapBuilder::new("Animal");
        animal.map("Name", SemanticType::String).element_name("name");
        animal.map("Age", SemanticType::Int32).element_name("age");
        let animal = freeze(&animal, None);

        let mut cat = ClassMapBuilder::new("Cat");
        cat.base("Animal");
        cat.map("Name", SemanticType::String).element_name("catName");
        let cat = freeze(&cat, Some(&animal));

        let names: Vec<&str> = cat.members().iter().map(|m| m.element_name.as_str()).collect();
        assert_eq!(names, vec!["catName", "age"]);
        assert_eq!(cat.member("Name").unwrap().declaring_class, "Cat");
        assert_eq!(cat.discriminator(), Some("Cat"));
        assert_eq!(cat.root(), "Animal");
    }

    #[test]
    fn test_discriminator_field_inherited_from_root() {
        let mut animal = ClassMapBuilder::new("Animal");
        animal.discriminator_field("kind");
        let animal = animal
            .freeze(None, NamingConvention::Verbatim, "_t", vec!["Dog".to_string()])
            .unwrap();
        assert_eq!(animal.discriminator(), Some("Animal"));

        let mut dog = ClassMapBuilder::new("Dog");
        dog.base("Animal").discriminator_field("ignored");
        let dog = freeze(&dog, Some(&animal));
        assert_eq!(dog.discriminator_field(), "kind");
    }
}
