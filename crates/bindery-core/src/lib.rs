#![forbid(unsafe_code)]

//! Core data model for Bindery.
//!
//! This crate holds everything a binding needs that is not live state:
//!
//! - [`Value`] and [`TypeDesc`]: dynamically typed values and the declared
//!   types of bound members.
//! - [`DefaultValues`]: the type-indexed default-value policy.
//! - [`ValueConverter`] and [`ConverterRegistry`]: conversion between source
//!   and target representations.
//! - [`BindingMode`] and [`BindingDescription`]: what to bind and how.
//!
//! Live bindings, change events and locale handling live in
//! `bindery-runtime`.

pub mod converter;
pub mod defaults;
pub mod description;
pub mod mode;
pub mod types;
pub mod value;

#[cfg(feature = "description-config")]
pub mod config;

#[cfg(feature = "description-config")]
pub use config::{BindingSpec, BindingSpecDocument};
pub use converter::{
    ConversionError, ConverterRef, ConverterRegistry, FnConverter, Locale, ValueConverter,
};
pub use defaults::{DefaultProducer, DefaultValues};
pub use description::{BindingDescription, DescriptionError};
pub use mode::{BindingMode, ParseModeError};
pub use types::TypeDesc;
pub use value::Value;
