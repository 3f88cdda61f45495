#![forbid(unsafe_code)]

//! Declarative binding configuration (feature `description-config`).
//!
//! Bindings can be declared in JSON or TOML and resolved against a
//! [`ConverterRegistry`] into live [`BindingDescription`]s:
//!
//! ```toml
//! [[bindings]]
//! target = "Text"
//! source = "Person.Age"
//! converter = "Ordinal"
//! converter_parameter = { style = "long" }
//! fallback_value = "unknown"
//! mode = "OneWay"
//! ```
//!
//! A `null` (JSON) or missing `fallback_value` means no fallback is
//! configured; the target then receives its type default.

use serde::{Deserialize, Serialize};

use crate::converter::ConverterRegistry;
use crate::description::{BindingDescription, DescriptionError};
use crate::mode::BindingMode;
use crate::value::Value;

/// One declared binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingSpec {
    /// Target member name.
    pub target: String,
    /// Source property path.
    pub source: String,
    /// Registered converter name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter_parameter: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_value: Option<serde_json::Value>,
    /// Mode name; `Default` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl BindingSpec {
    /// Parse a single binding from JSON.
    ///
    /// # Errors
    ///
    /// [`DescriptionError::ParseError`] on malformed input.
    pub fn from_json_str(input: &str) -> Result<Self, DescriptionError> {
        serde_json::from_str(input).map_err(|e| DescriptionError::ParseError(e.to_string()))
    }

    /// Parse a single binding from a TOML table.
    ///
    /// # Errors
    ///
    /// [`DescriptionError::ParseError`] on malformed input.
    pub fn from_toml_str(input: &str) -> Result<Self, DescriptionError> {
        toml::from_str(input).map_err(|e| DescriptionError::ParseError(e.to_string()))
    }

    /// Resolve converter and mode names into a validated description.
    ///
    /// # Errors
    ///
    /// - [`DescriptionError::UnknownConverter`] if `converter` is not registered.
    /// - [`DescriptionError::InvalidMode`] if `mode` is not a mode name.
    /// - Validation errors for empty endpoints.
    pub fn into_description(
        self,
        converters: &ConverterRegistry,
    ) -> Result<BindingDescription, DescriptionError> {
        let mode = match self.mode.as_deref() {
            Some(name) => name
                .parse::<BindingMode>()
                .map_err(|e| DescriptionError::InvalidMode(e.0))?,
            None => BindingMode::Default,
        };

        let mut description = BindingDescription::new(self.target, self.source).with_mode(mode);
        if let Some(name) = self.converter {
            let converter = converters
                .get(&name)
                .ok_or(DescriptionError::UnknownConverter(name))?;
            description = description.with_converter(converter);
        }
        if let Some(parameter) = self.converter_parameter {
            description = description.with_parameter(Value::from(parameter));
        }
        if let Some(fallback) = self.fallback_value.filter(|v| !v.is_null()) {
            description = description.with_fallback(Value::from(fallback));
        }

        description.validate()?;
        Ok(description)
    }
}

/// A document holding a list of declared bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingSpecDocument {
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
}

impl BindingSpecDocument {
    /// # Errors
    ///
    /// [`DescriptionError::ParseError`] on malformed input.
    pub fn from_json_str(input: &str) -> Result<Self, DescriptionError> {
        serde_json::from_str(input).map_err(|e| DescriptionError::ParseError(e.to_string()))
    }

    /// # Errors
    ///
    /// [`DescriptionError::ParseError`] on malformed input.
    pub fn from_toml_str(input: &str) -> Result<Self, DescriptionError> {
        toml::from_str(input).map_err(|e| DescriptionError::ParseError(e.to_string()))
    }

    /// Resolve every binding, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error from [`BindingSpec::into_description`].
    pub fn into_descriptions(
        self,
        converters: &ConverterRegistry,
    ) -> Result<Vec<BindingDescription>, DescriptionError> {
        self.bindings
            .into_iter()
            .map(|spec| spec.into_description(converters))
            .collect()
    }
}
