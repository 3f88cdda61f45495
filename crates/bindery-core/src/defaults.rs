#![forbid(unsafe_code)]

//! Type-indexed default values.
//!
//! When a binding has nothing usable to show (the source is unset, or the
//! converter failed) and no fallback is configured, the target receives the
//! default for its declared type. Value-like types get their zero value;
//! nullable and reference-like types get [`Value::Null`]. Handing null to a
//! non-nullable member is a programming error the UI layer must never see.
//!
//! # Invariants
//!
//! 1. [`DefaultValues::resolve`] never returns [`Value::Unset`].
//! 2. `Nullable(_)` always resolves to `Null`, even when a producer is
//!    registered for the wrapped type.
//! 3. Unregistered types are reference-like and resolve to `Null`.
//! 4. Resolution is a pure lookup; callers query it on every propagation
//!    because a target's declared type may change between events.

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::types::TypeDesc;
use crate::value::Value;

/// Producer of a type's default value.
pub type DefaultProducer = Rc<dyn Fn() -> Value>;

/// Registry mapping declared types to default-value producers.
#[derive(Clone)]
pub struct DefaultValues {
    producers: AHashMap<TypeDesc, DefaultProducer>,
}

impl DefaultValues {
    /// An empty registry: every type resolves to `Null`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            producers: AHashMap::new(),
        }
    }

    /// Registry with every built-in value-like type registered.
    #[must_use]
    pub fn standard() -> Self {
        let mut defaults = Self::empty();
        defaults.register(TypeDesc::Bool, || Value::Bool(false));
        defaults.register(TypeDesc::I32, || Value::Int(0));
        defaults.register(TypeDesc::I64, || Value::Int(0));
        defaults.register(TypeDesc::U32, || Value::UInt(0));
        defaults.register(TypeDesc::U64, || Value::UInt(0));
        defaults.register(TypeDesc::F32, || Value::Float(0.0));
        defaults.register(TypeDesc::F64, || Value::Float(0.0));
        defaults.register(TypeDesc::Char, || Value::Char('\0'));
        defaults
    }

    /// Register `ty` as value-like with the given default producer.
    ///
    /// Replaces any previous producer. A producer returning `Unset` is
    /// treated as returning `Null`.
    pub fn register(&mut self, ty: TypeDesc, producer: impl Fn() -> Value + 'static) {
        self.producers.insert(ty, Rc::new(producer));
    }

    /// Remove a registration; the type becomes reference-like.
    pub fn unregister(&mut self, ty: &TypeDesc) -> bool {
        self.producers.remove(ty).is_some()
    }

    /// Whether `ty` resolves to a non-null zero value.
    #[must_use]
    pub fn is_value_like(&self, ty: &TypeDesc) -> bool {
        !ty.is_nullable() && self.producers.contains_key(ty)
    }

    /// The default value for `ty`.
    #[must_use]
    pub fn resolve(&self, ty: &TypeDesc) -> Value {
        if ty.is_nullable() {
            return Value::Null;
        }
        match self.producers.get(ty) {
            Some(producer) => match producer() {
                Value::Unset => Value::Null,
                value => value,
            },
            None => Value::Null,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}

impl Default for DefaultValues {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for DefaultValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultValues")
            .field("registered", &self.producers.len())
            .finish()
    }
}
