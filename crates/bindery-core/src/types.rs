#![forbid(unsafe_code)]

//! Declared-type descriptors for binding endpoints.
//!
//! Source and target bindings report the type of the member they are bound
//! to as a [`TypeDesc`]. Converters receive it as the requested destination
//! type, and the [`DefaultValues`](crate::DefaultValues) resolver maps it to
//! the value shown when nothing usable is available.

use std::borrow::Cow;
use std::fmt;

/// Descriptor for the declared type of a bound member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeDesc {
    /// Any value; reference-like.
    #[default]
    Object,
    Bool,
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
    Char,
    /// Text; reference-like.
    String,
    /// An optional wrapper around another type. Always defaults to null.
    Nullable(Box<TypeDesc>),
    /// A user-defined type, identified by name.
    ///
    /// Named types are reference-like unless a default producer is
    /// registered for them.
    Named(Cow<'static, str>),
}

impl TypeDesc {
    /// Descriptor for a user-defined type.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }

    /// Wrap this type as nullable. Wrapping twice is a no-op.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            Self::Nullable(_) => self,
            other => Self::Nullable(Box::new(other)),
        }
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// The wrapped type for `Nullable`, otherwise `self`.
    #[must_use]
    pub fn underlying(&self) -> &TypeDesc {
        match self {
            Self::Nullable(inner) => inner.underlying(),
            other => other,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::Bool => write!(f, "bool"),
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
            Self::U32 => write!(f, "u32"),
            Self::U64 => write!(f, "u64"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
            Self::Char => write!(f, "char"),
            Self::String => write!(f, "string"),
            Self::Nullable(inner) => write!(f, "{inner}?"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}
