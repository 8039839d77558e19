//! Document codec driven by a ClassMap.

use crate::class_map::{ClassMapRef, MemberMap};
use crate::domain::{Domain, WeakDomain};
use crate::error::CodecError;
use crate::value::{Document, Value};

use super::{undecodable, unencodable, Codec, CodecRef, CodecResult, Native, SemanticType};

/// Serializes instances of one class (and its subtypes) as documents.
///
/// Member codecs are looked up through the owning domain on demand, so a
/// class may refer to itself or to classes registered after it.
#[derive(Debug)]
pub struct ClassMapCodec {
    class_map: ClassMapRef,
    domain: WeakDomain,
}

impl ClassMapCodec {
    pub fn new(class_map: ClassMapRef, domain: WeakDomain) -> Self {
        Self { class_map, domain }
    }

    fn domain(&self) -> CodecResult<Domain> {
        self.domain.upgrade().ok_or_else(|| {
            CodecError::unencodable(self.class_map.name(), "struct", "domain has been dropped")
        })
    }

    fn member_codec(&self, domain: &Domain, member: &MemberMap) -> CodecResult<CodecRef> {
        match &member.codec {
            Some(codec) => Ok(codec.clone()),
            None => domain.get_codec(&member.member_type),
        }
    }

    /// The map to serialize with for an instance whose runtime type is `type_name`.
    fn actual_map(&self, domain: &Domain, type_name: &str) -> CodecResult<ClassMapRef> {
        if type_name == self.class_map.name() {
            return Ok(self.class_map.clone());
        }
        let actual = domain.class_map(type_name)?;
        if !domain.is_subtype(type_name, self.class_map.name()) {
            return Err(CodecError::unencodable(
                self.class_map.name(),
                type_name,
                "not a subtype of the nominal type",
            ));
        }
        Ok(actual)
    }

    fn encode_struct(&self, type_name: &str, fields: &[(String, Native)]) -> CodecResult<Value> {
        let domain = self.domain()?;
        let actual = self.actual_map(&domain, type_name)?;

        if let Some((unknown, _)) = fields.iter().find(|(name, _)| actual.member(name).is_none()) {
            return Err(CodecError::unencodable(
                actual.name(),
                unknown.clone(),
                "no such member",
            ));
        }

        let mut doc = Document::new();
        let polymorphic = actual.name() != self.class_map.name();
        if polymorphic || actual.discriminator_required() {
            if let Some(discriminator) = actual.discriminator() {
                doc.insert(actual.discriminator_field(), discriminator);
            }
        }

        for member in actual.members() {
            let Some((_, value)) = fields.iter().find(|(name, _)| *name == member.member_name)
            else {
                continue;
            };
            if member.ignore_if_null && value.is_null() {
                continue;
            }
            if member.default_value.as_ref() == Some(value) {
                continue;
            }
            let codec = self.member_codec(&domain, member)?;
            doc.insert(member.element_name.clone(), codec.encode(value)?);
        }
        Ok(Value::Document(doc))
    }

    fn decode_document(&self, doc: &Document) -> CodecResult<Native> {
        let domain = self.domain()?;
        let field = self.class_map.discriminator_field();
        let actual = match doc.get(field).and_then(Value::as_str) {
            Some(discriminator) => domain
                .class_for_discriminator(self.class_map.name(), discriminator)?
                .ok_or_else(|| CodecError::undecodable(self.class_map.name(), discriminator))?,
            None => self.class_map.clone(),
        };

        let mut fields = Vec::with_capacity(doc.len());
        for (element, value) in doc.iter() {
            if element == field {
                continue;
            }
            let member = actual
                .member_by_element_name(element)
                .ok_or_else(|| CodecError::undecodable(actual.name(), element))?;
            let codec = self.member_codec(&domain, member)?;
            fields.push((member.member_name.clone(), codec.decode(value)?));
        }
        Ok(Native::Struct {
            type_name: actual.name().to_string(),
            fields,
        })
    }
}

impl Codec for ClassMapCodec {
    fn value_type(&self) -> SemanticType {
        SemanticType::class(self.class_map.name())
    }

    fn encode(&self, value: &Native) -> CodecResult<Value> {
        match value {
            Native::Null => Ok(Value::Null),
            Native::Raw(raw) => Ok(raw.clone()),
            Native::Struct { type_name, fields } => self.encode_struct(type_name, fields),
            other => Err(unencodable(self, other)),
        }
    }

    fn decode(&self, value: &Value) -> CodecResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::Document(doc) => self.decode_document(doc),
            other => Err(undecodable(self, other)),
        }
    }

    fn class_map(&self) -> Option<ClassMapRef> {
        Some(self.class_map.clone())
    }
}
