#![forbid(unsafe_code)]

//! Declarative description of a single binding.
//!
//! A [`BindingDescription`] says *how* to build a binding: which source
//! path to read, which target member to write, how to convert between them,
//! what to show when nothing usable is available, and in which direction(s)
//! values flow. It holds no live state and is never mutated by a binding.
//!
//! # Invariants
//!
//! 1. A validated description has a non-empty source path and target name.
//! 2. `fallback_value` is [`Value::Unset`] when no fallback is configured.
//!    A configured fallback (including `Null`) is delivered verbatim.

use std::fmt;

use crate::converter::ConverterRef;
use crate::mode::BindingMode;
use crate::value::Value;

/// Errors from building or validating a binding description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionError {
    /// The source property path is empty or whitespace.
    EmptySourcePath,
    /// The target name is empty or whitespace.
    EmptyTargetName,
    /// A converter name did not resolve in the converter registry.
    UnknownConverter(String),
    /// A mode name was not recognised.
    InvalidMode(String),
    /// A configuration document could not be parsed.
    ParseError(String),
}

impl fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySourcePath => write!(f, "binding source path is empty"),
            Self::EmptyTargetName => write!(f, "binding target name is empty"),
            Self::UnknownConverter(name) => write!(f, "unknown converter: {name}"),
            Self::InvalidMode(mode) => write!(f, "invalid binding mode: {mode}"),
            Self::ParseError(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for DescriptionError {}

/// How to construct one binding between a source path and a target member.
#[derive(Clone, Default)]
pub struct BindingDescription {
    source_path: String,
    target_name: String,
    converter: Option<ConverterRef>,
    converter_parameter: Value,
    fallback_value: Value,
    mode: BindingMode,
}

impl BindingDescription {
    /// Describe a binding of `target_name` to `source_path` in `Default` mode.
    #[must_use]
    pub fn new(target_name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            target_name: target_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_converter(mut self, converter: ConverterRef) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Opaque parameter passed unchanged to every converter call.
    #[must_use]
    pub fn with_parameter(mut self, parameter: impl Into<Value>) -> Self {
        self.converter_parameter = parameter.into();
        self
    }

    /// Value shown when the source is unset or conversion fails.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<Value>) -> Self {
        self.fallback_value = fallback.into();
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: BindingMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    #[must_use]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    #[must_use]
    pub fn converter(&self) -> Option<&ConverterRef> {
        self.converter.as_ref()
    }

    #[must_use]
    pub fn converter_parameter(&self) -> &Value {
        &self.converter_parameter
    }

    #[must_use]
    pub fn fallback_value(&self) -> &Value {
        &self.fallback_value
    }

    /// Whether a fallback value is configured.
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        !self.fallback_value.is_unset()
    }

    #[must_use]
    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    /// Check the structural invariants.
    ///
    /// # Errors
    ///
    /// [`DescriptionError::EmptySourcePath`] or
    /// [`DescriptionError::EmptyTargetName`].
    pub fn validate(&self) -> Result<(), DescriptionError> {
        if self.source_path.trim().is_empty() {
            return Err(DescriptionError::EmptySourcePath);
        }
        if self.target_name.trim().is_empty() {
            return Err(DescriptionError::EmptyTargetName);
        }
        Ok(())
    }
}

impl fmt::Debug for BindingDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingDescription")
            .field("source_path", &self.source_path)
            .field("target_name", &self.target_name)
            .field("has_converter", &self.converter.is_some())
            .field("converter_parameter", &self.converter_parameter)
            .field("fallback_value", &self.fallback_value)
            .field("mode", &self.mode)
            .finish()
    }
}

impl fmt::Display for BindingDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <- {} ({})",
            self.target_name, self.source_path, self.mode
        )
    }
}
