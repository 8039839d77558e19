//! Serialization domains.
//!
//! A [`Domain`] is an isolated registry: codecs, enum definitions, class
//! definitions and every structure derived from them live inside one domain
//! and are never shared with another. Handles are cheap to clone and safe to
//! use from several threads once the registrations are done.

mod settings;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::class_map::{ClassMapBuilder, ClassMapRef};
use crate::codec::{
    ArrayCodec, BinaryCodec, BoolCodec, ClassMapCodec, CodecRef, CodecResult, DateTimeCodec,
    DecimalCodec, DoubleCodec, EnumCodec, EnumDef, InferredCodec, Int32Codec, Int64Codec,
    NullableCodec, ObjectIdCodec, SemanticType, StringCodec, UuidCodec,
};
use crate::error::{ClassMapError, CodecError};

pub use settings::{DomainSettings, DEFAULT_DISCRIMINATOR_FIELD};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub(crate) struct DomainInner {
    name: String,
    settings: DomainSettings,
    /// Codecs registered explicitly by the caller.
    codecs: RwLock<HashMap<SemanticType, CodecRef>>,
    enums: RwLock<HashMap<String, EnumDef>>,
    /// Class definitions in registration order.
    classes: RwLock<IndexMap<String, ClassMapBuilder>>,
    /// Codecs built on demand from the registrations above.
    derived: RwLock<HashMap<SemanticType, CodecRef>>,
    class_maps: RwLock<HashMap<String, ClassMapRef>>,
    /// Set once anything has been resolved.
    used: AtomicBool,
}

/// An isolated codec and class-map registry.
#[derive(Debug, Clone)]
pub struct Domain {
    inner: Arc<DomainInner>,
}

/// Non-owning handle held by codecs that need to call back into their domain.
#[derive(Debug, Clone)]
pub struct WeakDomain(Weak<DomainInner>);

impl WeakDomain {
    pub fn upgrade(&self) -> Option<Domain> {
        self.0.upgrade().map(|inner| Domain { inner })
    }
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, DomainSettings::default())
    }

    pub fn with_settings(name: impl Into<String>, settings: DomainSettings) -> Self {
        Self {
            inner: Arc::new(DomainInner {
                name: name.into(),
                settings,
                codecs: RwLock::new(HashMap::new()),
                enums: RwLock::new(HashMap::new()),
                classes: RwLock::new(IndexMap::new()),
                derived: RwLock::new(HashMap::new()),
                class_maps: RwLock::new(HashMap::new()),
                used: AtomicBool::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn settings(&self) -> &DomainSettings {
        &self.inner.settings
    }

    pub fn downgrade(&self) -> WeakDomain {
        WeakDomain(Arc::downgrade(&self.inner))
    }

    /// True when both handles refer to the same registry.
    pub fn same_domain(&self, other: &Domain) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a codec for `ty`, replacing any earlier one.
    pub fn register_codec(&self, ty: SemanticType, codec: CodecRef) {
        self.invalidate_if_used(&ty.to_string());
        write(&self.inner.codecs).insert(ty, codec);
    }

    pub fn register_enum(&self, def: EnumDef) {
        self.invalidate_if_used(&def.name);
        write(&self.inner.enums).insert(def.name.clone(), def);
    }

    /// Register a class definition. It is frozen into a ClassMap on first use.
    pub fn register_class(&self, builder: ClassMapBuilder) {
        self.invalidate_if_used(builder.name());
        write(&self.inner.classes).insert(builder.name().to_string(), builder);
    }

    /// Registering after first use throws away every derived structure.
    /// Readers holding codecs from before keep the old ones.
    fn invalidate_if_used(&self, what: &str) {
        if self.inner.used.swap(false, Ordering::AcqRel) {
            warn!(
                domain = %self.inner.name,
                registration = what,
                "registration after first use, clearing derived codecs and class maps"
            );
            write(&self.inner.derived).clear();
            write(&self.inner.class_maps).clear();
        }
    }

    // =========================================================================
    // Codecs
    // =========================================================================

    /// Get the codec governing `ty`.
    ///
    /// Explicit registrations win; otherwise built-in scalar codecs, enum and
    /// class codecs, and array/nullable codecs composed from the element codec.
    pub fn get_codec(&self, ty: &SemanticType) -> CodecResult<CodecRef> {
        self.inner.used.store(true, Ordering::Release);
        if let Some(codec) = read(&self.inner.codecs).get(ty) {
            return Ok(codec.clone());
        }
        if let Some(codec) = read(&self.inner.derived).get(ty) {
            return Ok(codec.clone());
        }

        trace!(domain = %self.inner.name, ty = %ty, "building codec");
        let built = self.build_codec(ty)?;
        let mut derived = write(&self.inner.derived);
        Ok(derived.entry(ty.clone()).or_insert(built).clone())
    }

    fn build_codec(&self, ty: &SemanticType) -> CodecResult<CodecRef> {
        let settings = &self.inner.settings;
        let codec: CodecRef = match ty {
            SemanticType::Bool => Arc::new(BoolCodec),
            SemanticType::Int32 => Arc::new(Int32Codec),
            SemanticType::Int64 => Arc::new(Int64Codec),
            SemanticType::Double => Arc::new(DoubleCodec),
            SemanticType::Decimal => Arc::new(DecimalCodec::new(settings.decimal_representation)),
            SemanticType::String => Arc::new(StringCodec),
            SemanticType::DateTime => Arc::new(DateTimeCodec),
            SemanticType::Binary => Arc::new(BinaryCodec),
            SemanticType::ObjectId => Arc::new(ObjectIdCodec),
            SemanticType::Uuid => Arc::new(UuidCodec),
            SemanticType::Any => Arc::new(InferredCodec),
            SemanticType::Enum(name) => {
                let def = read(&self.inner.enums)
                    .get(name)
                    .cloned()
                    .ok_or_else(|| CodecError::no_codec_found(ty.clone()))?;
                Arc::new(EnumCodec::new(def, settings.enum_representation))
            }
            SemanticType::Class(name) => {
                if !read(&self.inner.classes).contains_key(name) {
                    return Err(CodecError::no_codec_found(ty.clone()));
                }
                Arc::new(ClassMapCodec::new(self.class_map(name)?, self.downgrade()))
            }
            SemanticType::Array(element) => Arc::new(ArrayCodec::new(self.get_codec(element)?)),
            SemanticType::Nullable(inner) => {
                Arc::new(NullableCodec::new(self.get_codec(inner)?))
            }
        };
        Ok(codec)
    }

    pub fn enum_def(&self, name: &str) -> Option<EnumDef> {
        read(&self.inner.enums).get(name).cloned()
    }

    // =========================================================================
    // Class maps
    // =========================================================================

    pub fn is_class_registered(&self, name: &str) -> bool {
        read(&self.inner.classes).contains_key(name)
    }

    /// Get the frozen ClassMap for `name`, building it (and its bases) on first use.
    pub fn class_map(&self, name: &str) -> Result<ClassMapRef, ClassMapError> {
        self.inner.used.store(true, Ordering::Release);
        if let Some(map) = read(&self.inner.class_maps).get(name) {
            return Ok(map.clone());
        }

        let builder = read(&self.inner.classes)
            .get(name)
            .cloned()
            .ok_or_else(|| ClassMapError::UnknownClass(name.to_string()))?;
        self.check_base_chain(&builder)?;

        let base = match builder.base_name() {
            Some(base) => Some(self.class_map(base)?),
            None => None,
        };
        let settings = &self.inner.settings;
        let map = Arc::new(builder.freeze(
            base.as_deref(),
            settings.default_naming,
            &settings.discriminator_field,
            self.direct_subtypes(&builder),
        )?);
        debug!(
            domain = %self.inner.name,
            class = name,
            members = map.members().len(),
            "built class map"
        );

        let mut maps = write(&self.inner.class_maps);
        Ok(maps.entry(name.to_string()).or_insert(map).clone())
    }

    fn check_base_chain(&self, builder: &ClassMapBuilder) -> Result<(), ClassMapError> {
        let classes = read(&self.inner.classes);
        let mut seen = HashSet::from([builder.name().to_string()]);
        let mut current = builder;
        while let Some(base) = current.base_name() {
            if !seen.insert(base.to_string()) {
                return Err(ClassMapError::CyclicBase(builder.name().to_string()));
            }
            let Some(next) = classes.get(base) else {
                return Err(ClassMapError::UnknownBase {
                    class: current.name().to_string(),
                    base: base.to_string(),
                });
            };
            current = next;
        }
        Ok(())
    }

    /// Explicit known subtypes followed by registered classes naming this one as base.
    fn direct_subtypes(&self, builder: &ClassMapBuilder) -> Vec<String> {
        let mut subtypes = builder.known_subtypes.clone();
        for (name, class) in read(&self.inner.classes).iter() {
            if class.base_name() == Some(builder.name()) && !subtypes.contains(name) {
                subtypes.push(name.clone());
            }
        }
        subtypes
    }

    /// All registered descendants of `name`, breadth-first.
    pub fn descendants(&self, name: &str) -> Result<Vec<ClassMapRef>, ClassMapError> {
        let mut result = Vec::new();
        let mut seen = HashSet::from([name.to_string()]);
        let mut queue: VecDeque<String> = self.class_map(name)?.known_subtypes().to_vec().into();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) || !self.is_class_registered(&next) {
                continue;
            }
            let map = self.class_map(&next)?;
            queue.extend(map.known_subtypes().iter().cloned());
            result.push(map);
        }
        Ok(result)
    }

    /// True when `actual` is `nominal` or inherits from it.
    pub fn is_subtype(&self, actual: &str, nominal: &str) -> bool {
        let classes = read(&self.inner.classes);
        let mut current = Some(actual);
        let mut steps = 0;
        while let Some(name) = current {
            if name == nominal {
                return true;
            }
            steps += 1;
            if steps > classes.len() {
                return false;
            }
            current = classes.get(name).and_then(|c| c.base_name());
        }
        false
    }

    /// Find the class in `nominal`'s hierarchy (itself included) whose
    /// discriminator value is `value`.
    pub fn class_for_discriminator(
        &self,
        nominal: &str,
        value: &str,
    ) -> Result<Option<ClassMapRef>, ClassMapError> {
        let root = self.class_map(nominal)?;
        if root.discriminator() == Some(value) {
            return Ok(Some(root));
        }
        Ok(self
            .descendants(nominal)?
            .into_iter()
            .find(|map| map.discriminator() == Some(value)))
    }
}
