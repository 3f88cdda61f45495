#![forbid(unsafe_code)]

//! Value converters and converter lookup.
//!
//! A [`ValueConverter`] translates between a source member's representation
//! and a target member's representation. Conversion correctness is the
//! converter's responsibility: whatever `convert` returns is handed to the
//! target as-is.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior in a binding |
//! |---------|-------|-----------------------|
//! | `convert` returns `Err` | Bad input, converter bug | Fallback or type default is shown |
//! | `convert_back` returns `Err` | Bad input, converter bug | Source is left untouched |
//! | Converter panics | Converter bug | Propagates to the notifier |

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::types::TypeDesc;
use crate::value::Value;

/// Locale identifier (e.g., `"en"`, `"en-US"`, `"fr-FR"`).
pub type Locale = String;

/// Error returned by a failing conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conversion failed: {}", self.message)
    }
}

impl std::error::Error for ConversionError {}

/// Two-way value conversion between a source and a target representation.
pub trait ValueConverter {
    /// Convert a source value for display on a target of type `target_type`.
    ///
    /// # Errors
    ///
    /// Any error makes the binding fall back to its fallback or default value.
    fn convert(
        &self,
        value: &Value,
        target_type: &TypeDesc,
        parameter: &Value,
        locale: &Locale,
    ) -> Result<Value, ConversionError>;

    /// Convert a target value back into the source's representation.
    ///
    /// The default implementation refuses, which leaves the source untouched.
    ///
    /// # Errors
    ///
    /// Any error makes the binding skip the source write.
    fn convert_back(
        &self,
        value: &Value,
        source_type: &TypeDesc,
        parameter: &Value,
        locale: &Locale,
    ) -> Result<Value, ConversionError> {
        let _ = (value, source_type, parameter, locale);
        Err(ConversionError::new("convert_back is not supported"))
    }
}

/// Shared handle to a converter.
pub type ConverterRef = Rc<dyn ValueConverter>;

/// Converter built from a pair of closures.
pub struct FnConverter<F, B> {
    forward: F,
    backward: B,
}

impl<F, B> FnConverter<F, B>
where
    F: Fn(&Value, &Value) -> Result<Value, ConversionError>,
    B: Fn(&Value, &Value) -> Result<Value, ConversionError>,
{
    /// Closures receive `(value, parameter)`.
    pub fn new(forward: F, backward: B) -> Self {
        Self { forward, backward }
    }
}

impl<F, B> ValueConverter for FnConverter<F, B>
where
    F: Fn(&Value, &Value) -> Result<Value, ConversionError>,
    B: Fn(&Value, &Value) -> Result<Value, ConversionError>,
{
    fn convert(
        &self,
        value: &Value,
        _target_type: &TypeDesc,
        parameter: &Value,
        _locale: &Locale,
    ) -> Result<Value, ConversionError> {
        (self.forward)(value, parameter)
    }

    fn convert_back(
        &self,
        value: &Value,
        _source_type: &TypeDesc,
        parameter: &Value,
        _locale: &Locale,
    ) -> Result<Value, ConversionError> {
        (self.backward)(value, parameter)
    }
}

/// Named converter lookup.
///
/// Declarative binding configuration refers to converters by name; the
/// registry turns those names into live converters.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: AHashMap<String, ConverterRef>,
}

impl ConverterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, converter: ConverterRef) {
        self.converters.insert(name.into(), converter);
    }

    /// Register every `(name, converter)` pair, replacing existing entries.
    pub fn fill_from(&mut self, entries: impl IntoIterator<Item = (String, ConverterRef)>) {
        self.converters.extend(entries);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ConverterRef> {
        self.converters.get(name).map(Rc::clone)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl ValueConverter for Upper {
        fn convert(
            &self,
            value: &Value,
            _target_type: &TypeDesc,
            _parameter: &Value,
            _locale: &Locale,
        ) -> Result<Value, ConversionError> {
            value
                .as_str()
                .map(|s| Value::from(s.to_uppercase()))
                .ok_or_else(|| ConversionError::new(format!("expected str, got {}", value.kind())))
        }
    }

    #[test]
    fn convert_back_defaults_to_error() {
        let err = Upper
            .convert_back(&Value::from("x"), &TypeDesc::String, &Value::Unset, &"en".into())
            .unwrap_err();
        assert_eq!(err.message(), "convert_back is not supported");
    }

    #[test]
    fn fn_converter_passes_parameter() {
        let add = FnConverter::new(
            |v: &Value, p: &Value| Ok(Value::Int(v.as_i64().unwrap_or(0) + p.as_i64().unwrap_or(0))),
            |v: &Value, p: &Value| Ok(Value::Int(v.as_i64().unwrap_or(0) - p.as_i64().unwrap_or(0))),
        );
        let en = Locale::from("en");
        assert_eq!(
            add.convert(&Value::Int(2), &TypeDesc::I32, &Value::Int(3), &en),
            Ok(Value::Int(5))
        );
        assert_eq!(
            add.convert_back(&Value::Int(5), &TypeDesc::I32, &Value::Int(3), &en),
            Ok(Value::Int(2))
        );
    }

    #[test]
    fn registry_lookup() {
        let mut registry = ConverterRegistry::new();
        registry.register("Upper", Rc::new(Upper));
        registry.fill_from([("Shout".to_string(), Rc::new(Upper) as ConverterRef)]);

        assert!(registry.contains("Upper"));
        assert!(registry.get("Missing").is_none());
        assert_eq!(registry.names(), vec!["Shout", "Upper"]);

        let upper = registry.get("Upper").unwrap();
        assert_eq!(
            upper.convert(&Value::from("hi"), &TypeDesc::String, &Value::Unset, &"en".into()),
            Ok(Value::from("HI"))
        );
    }
}
