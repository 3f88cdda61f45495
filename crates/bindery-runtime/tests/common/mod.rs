#![allow(dead_code)]

//! Recording mocks for full-binding tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bindery_core::{
    BindingDescription, BindingMode, ConversionError, DefaultValues, Locale, TypeDesc, Value,
    ValueConverter,
};
use bindery_runtime::{
    BindError, BindingRequest, BindingRoot, Event, FullBinding, LocaleContext, SourceBinding,
    Subscription, TargetBinding,
};
use bindery_runtime::binding::{SourceChangedCallback, TargetChangedCallback};

pub const SOURCE_TEXT: &str = "sourceText";
pub const TARGET_NAME: &str = "targetName";

pub struct MockSource {
    pub source_type: RefCell<TypeDesc>,
    pub values_set: RefCell<Vec<Value>>,
    pub dispose_called: Cell<usize>,
    pub try_get_value_result: Cell<bool>,
    pub try_get_value_value: RefCell<Value>,
    /// Make `set_value` update the current value and notify when it changed.
    pub notify_on_set: Cell<bool>,
    changed: Event<()>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            source_type: RefCell::new(TypeDesc::Object),
            values_set: RefCell::new(Vec::new()),
            dispose_called: Cell::new(0),
            try_get_value_result: Cell::new(true),
            try_get_value_value: RefCell::new(Value::from("TryGetValueValue")),
            notify_on_set: Cell::new(false),
            changed: Event::new(),
        }
    }

    pub fn set_current(&self, value: impl Into<Value>) {
        self.try_get_value_result.set(true);
        *self.try_get_value_value.borrow_mut() = value.into();
    }

    pub fn set_unavailable(&self) {
        self.try_get_value_result.set(false);
    }

    pub fn fire_source_changed(&self) {
        self.changed.emit(&());
    }

    pub fn subscriber_count(&self) -> usize {
        self.changed.subscriber_count()
    }
}

impl SourceBinding for MockSource {
    fn value(&self) -> Value {
        if !self.try_get_value_result.get() {
            return Value::Unset;
        }
        self.try_get_value_value.borrow().clone()
    }

    fn set_value(&self, value: Value) {
        self.values_set.borrow_mut().push(value.clone());
        if !self.notify_on_set.get() || self.value() == value {
            return;
        }
        self.set_current(value);
        self.fire_source_changed();
    }

    fn source_type(&self) -> TypeDesc {
        self.source_type.borrow().clone()
    }

    fn subscribe_changed(&self, callback: SourceChangedCallback) -> Subscription {
        self.changed.subscribe(move |_| callback())
    }

    fn dispose(&self) {
        self.dispose_called.set(self.dispose_called.get() + 1);
    }
}

pub struct MockTarget {
    pub target_type: RefCell<TypeDesc>,
    pub default_mode: Cell<BindingMode>,
    pub values: RefCell<Vec<Value>>,
    pub dispose_called: Cell<usize>,
    /// Re-raise the change notification for every value set on the target.
    pub echo_writes: Cell<bool>,
    value_changed: Event<Value>,
}

impl MockTarget {
    pub fn new(target_type: TypeDesc) -> Self {
        Self {
            target_type: RefCell::new(target_type),
            default_mode: Cell::new(BindingMode::TwoWay),
            values: RefCell::new(Vec::new()),
            dispose_called: Cell::new(0),
            echo_writes: Cell::new(false),
            value_changed: Event::new(),
        }
    }

    pub fn fire_value_changed(&self, value: impl Into<Value>) {
        self.value_changed.emit(&value.into());
    }

    pub fn subscriber_count(&self) -> usize {
        self.value_changed.subscriber_count()
    }
}

impl TargetBinding for MockTarget {
    fn target_type(&self) -> TypeDesc {
        self.target_type.borrow().clone()
    }

    fn default_mode(&self) -> BindingMode {
        self.default_mode.get()
    }

    fn set_value(&self, value: Value) {
        self.values.borrow_mut().push(value.clone());
        if self.echo_writes.get() {
            self.value_changed.emit(&value);
        }
    }

    fn subscribe_value_changed(&self, callback: TargetChangedCallback) -> Subscription {
        self.value_changed.subscribe(callback)
    }

    fn dispose(&self) {
        self.dispose_called.set(self.dispose_called.get() + 1);
    }
}

#[derive(Default)]
pub struct MockConverter {
    pub conversion_result: RefCell<Value>,
    pub throw_on_conversion: Cell<bool>,
    pub conversions_requested: RefCell<Vec<Value>>,
    pub conversion_parameters: RefCell<Vec<Value>>,
    pub conversion_types: RefCell<Vec<TypeDesc>>,
    pub conversion_locales: RefCell<Vec<Locale>>,

    pub conversion_back_result: RefCell<Value>,
    pub throw_on_conversion_back: Cell<bool>,
    pub conversions_back_requested: RefCell<Vec<Value>>,
    pub conversion_back_parameters: RefCell<Vec<Value>>,
    pub conversion_back_types: RefCell<Vec<TypeDesc>>,
}

impl MockConverter {
    pub fn returning(result: impl Into<Value>) -> Self {
        let converter = Self::default();
        *converter.conversion_result.borrow_mut() = result.into();
        converter
    }

    pub fn returning_back(result: impl Into<Value>) -> Self {
        let converter = Self::default();
        *converter.conversion_back_result.borrow_mut() = result.into();
        converter
    }

    pub fn throwing() -> Self {
        let converter = Self::default();
        converter.throw_on_conversion.set(true);
        converter
    }
}

impl ValueConverter for MockConverter {
    fn convert(
        &self,
        value: &Value,
        target_type: &TypeDesc,
        parameter: &Value,
        locale: &Locale,
    ) -> Result<Value, ConversionError> {
        self.conversions_requested.borrow_mut().push(value.clone());
        self.conversion_parameters.borrow_mut().push(parameter.clone());
        self.conversion_types.borrow_mut().push(target_type.clone());
        self.conversion_locales.borrow_mut().push(locale.clone());
        if self.throw_on_conversion.get() {
            return Err(ConversionError::new("Conversion throw requested"));
        }
        Ok(self.conversion_result.borrow().clone())
    }

    fn convert_back(
        &self,
        value: &Value,
        source_type: &TypeDesc,
        parameter: &Value,
        _locale: &Locale,
    ) -> Result<Value, ConversionError> {
        self.conversions_back_requested.borrow_mut().push(value.clone());
        self.conversion_back_parameters
            .borrow_mut()
            .push(parameter.clone());
        self.conversion_back_types
            .borrow_mut()
            .push(source_type.clone());
        if self.throw_on_conversion_back.get() {
            return Err(ConversionError::new("Conversion throw requested"));
        }
        Ok(self.conversion_back_result.borrow().clone())
    }
}

pub fn ignored_parameter() -> Value {
    Value::record([("Ignored", 12)])
}

pub fn default_fallback() -> Value {
    Value::record([("Value", 4)])
}

/// Builder for a binding wired to recording mocks.
pub struct Fixture {
    pub converter: Option<Rc<MockConverter>>,
    pub parameter: Value,
    pub fallback: Value,
    pub target_type: TypeDesc,
    pub mode: BindingMode,
    pub target_default_mode: BindingMode,
    pub feedback_guard: bool,
    pub echo_writes: bool,
    pub locale: Option<LocaleContext>,
    pub defaults: Option<Rc<DefaultValues>>,
}

pub struct Bound {
    pub binding: FullBinding,
    pub source: Rc<MockSource>,
    pub target: Rc<MockTarget>,
}

impl Fixture {
    /// Two-way binding with the `{Value: 4}` fallback.
    pub fn new(converter: &Rc<MockConverter>, target_type: TypeDesc) -> Self {
        Self {
            converter: Some(Rc::clone(converter)),
            parameter: ignored_parameter(),
            fallback: default_fallback(),
            target_type,
            mode: BindingMode::TwoWay,
            target_default_mode: BindingMode::TwoWay,
            feedback_guard: false,
            echo_writes: false,
            locale: None,
            defaults: None,
        }
    }

    pub fn without_converter(target_type: TypeDesc) -> Self {
        Self {
            converter: None,
            parameter: Value::Unset,
            fallback: Value::Unset,
            target_type,
            mode: BindingMode::TwoWay,
            target_default_mode: BindingMode::TwoWay,
            feedback_guard: false,
            echo_writes: false,
            locale: None,
            defaults: None,
        }
    }

    pub fn fallback(mut self, fallback: Value) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn mode(mut self, mode: BindingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn target_default_mode(mut self, mode: BindingMode) -> Self {
        self.target_default_mode = mode;
        self
    }

    pub fn feedback_guard(mut self) -> Self {
        self.feedback_guard = true;
        self
    }

    pub fn echo_writes(mut self) -> Self {
        self.echo_writes = true;
        self
    }

    pub fn defaults(mut self, defaults: DefaultValues) -> Self {
        self.defaults = Some(Rc::new(defaults));
        self
    }

    pub fn locale(mut self, locale: LocaleContext) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn description(&self) -> BindingDescription {
        let mut description = BindingDescription::new(TARGET_NAME, SOURCE_TEXT)
            .with_parameter(self.parameter.clone())
            .with_fallback(self.fallback.clone())
            .with_mode(self.mode);
        if let Some(converter) = &self.converter {
            description = description.with_converter(Rc::clone(converter) as _);
        }
        description
    }

    pub fn build(self) -> Bound {
        let source = Rc::new(MockSource::new());
        let target = Rc::new(MockTarget::new(self.target_type.clone()));
        target.default_mode.set(self.target_default_mode);
        target.echo_writes.set(self.echo_writes);

        let mut request = BindingRequest::new(
            Rc::new(Value::record([("Value", 1)])) as BindingRoot,
            Rc::new(Value::record([("Value", 2)])) as BindingRoot,
            self.description(),
        );
        if self.feedback_guard {
            request = request.with_feedback_guard();
        }
        request = request.with_locale(self.locale.unwrap_or_else(|| LocaleContext::new("en-US")));
        if let Some(defaults) = self.defaults {
            request = request.with_defaults(defaults);
        }

        let sources = source_factory(&source);
        let targets = target_factory(&target);
        let binding = match FullBinding::new(request, &sources, &targets) {
            Ok(binding) => binding,
            Err(err) => panic!("binding construction failed: {err}"),
        };
        Bound {
            binding,
            source,
            target,
        }
    }
}

pub fn source_factory(
    source: &Rc<MockSource>,
) -> impl Fn(&BindingRoot, &str) -> Result<Box<dyn SourceBinding>, BindError> + use<> {
    let source = Rc::clone(source);
    move |_root: &BindingRoot, path: &str| -> Result<Box<dyn SourceBinding>, BindError> {
        if path == SOURCE_TEXT {
            Ok(Box::new(Rc::clone(&source)))
        } else {
            Err(BindError::source_failed(path, "unknown path"))
        }
    }
}

pub fn target_factory(
    target: &Rc<MockTarget>,
) -> impl Fn(&BindingRoot, &str) -> Result<Box<dyn TargetBinding>, BindError> + use<> {
    let target = Rc::clone(target);
    move |_root: &BindingRoot, name: &str| -> Result<Box<dyn TargetBinding>, BindError> {
        if name == TARGET_NAME {
            Ok(Box::new(Rc::clone(&target)))
        } else {
            Err(BindError::target_failed(name, "unknown target"))
        }
    }
}
