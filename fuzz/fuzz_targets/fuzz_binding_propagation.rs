#![no_main]

//! Drives a live binding with arbitrary source/target changes and checks
//! that the target never receives `Unset` and nothing moves after dispose.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use arbitrary::Arbitrary;
use bindery_core::{BindingDescription, BindingMode, ConversionError, FnConverter, TypeDesc, Value};
use bindery_runtime::binding::{SourceChangedCallback, TargetChangedCallback};
use bindery_runtime::{
    BindError, BindingRequest, BindingRoot, FullBinding, Observable, SourceBinding, Subscription,
    TargetBinding,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    SourceSet(i64),
    SourceUnset,
    TargetSet(i64),
    UpdateNow,
    Dispose,
}

#[derive(Debug, Arbitrary)]
struct Input {
    mode: u8,
    target_default: u8,
    negate: bool,
    guard: bool,
    fallback: Option<i64>,
    int_target: bool,
    ops: Vec<Op>,
}

fn mode_from(byte: u8) -> BindingMode {
    match byte % 5 {
        0 => BindingMode::Default,
        1 => BindingMode::OneWay,
        2 => BindingMode::TwoWay,
        3 => BindingMode::OneWayToSource,
        _ => BindingMode::OneTime,
    }
}

struct Source {
    value: Observable<Value>,
    writes: Cell<usize>,
}

impl SourceBinding for Source {
    fn value(&self) -> Value {
        self.value.get()
    }

    fn set_value(&self, value: Value) {
        self.writes.set(self.writes.get() + 1);
        self.value.set(value);
    }

    fn source_type(&self) -> TypeDesc {
        TypeDesc::I64
    }

    fn subscribe_changed(&self, callback: SourceChangedCallback) -> Subscription {
        self.value.subscribe(move |_| callback())
    }

    fn dispose(&self) {}
}

struct Target {
    value: Observable<Value>,
    received: RefCell<Vec<Value>>,
    target_type: TypeDesc,
    default_mode: BindingMode,
}

impl TargetBinding for Target {
    fn target_type(&self) -> TypeDesc {
        self.target_type.clone()
    }

    fn default_mode(&self) -> BindingMode {
        self.default_mode
    }

    fn set_value(&self, value: Value) {
        self.received.borrow_mut().push(value.clone());
        self.value.set(value);
    }

    fn subscribe_value_changed(&self, callback: TargetChangedCallback) -> Subscription {
        self.value.subscribe(move |v| callback(v))
    }

    fn dispose(&self) {}
}

fn negate(value: &Value, _: &Value) -> Result<Value, ConversionError> {
    value
        .as_i64()
        .map(|n| Value::Int(n.wrapping_neg()))
        .ok_or_else(|| ConversionError::new("not an integer"))
}

fuzz_target!(|input: Input| {
    let source = Rc::new(Source {
        value: Observable::new(Value::Int(0)),
        writes: Cell::new(0),
    });
    let target = Rc::new(Target {
        value: Observable::new(Value::Unset),
        received: RefCell::new(Vec::new()),
        target_type: if input.int_target {
            TypeDesc::I64
        } else {
            TypeDesc::Object
        },
        default_mode: mode_from(input.target_default),
    });

    let mut description =
        BindingDescription::new("Value", "Value").with_mode(mode_from(input.mode));
    if input.negate {
        description = description.with_converter(Rc::new(FnConverter::new(negate, negate)));
    }
    if let Some(fallback) = input.fallback {
        description = description.with_fallback(Value::Int(fallback));
    }
    let mut request = BindingRequest::new(Rc::new(()) as BindingRoot, Rc::new(()), description);
    if input.guard {
        request = request.with_feedback_guard();
    }

    let sources = {
        let source = Rc::clone(&source);
        move |_: &BindingRoot, _: &str| -> Result<Box<dyn SourceBinding>, BindError> {
            Ok(Box::new(Rc::clone(&source)))
        }
    };
    let targets = {
        let target = Rc::clone(&target);
        move |_: &BindingRoot, _: &str| -> Result<Box<dyn TargetBinding>, BindError> {
            Ok(Box::new(Rc::clone(&target)))
        }
    };
    let Ok(binding) = FullBinding::new(request, &sources, &targets) else {
        return;
    };
    let mode = binding.mode();
    assert_ne!(mode, BindingMode::Default);

    for op in input.ops.into_iter().take(64) {
        let before = (target.received.borrow().len(), source.writes.get());
        match op {
            Op::SourceSet(n) => source.value.set(Value::Int(n)),
            Op::SourceUnset => source.value.set(Value::Unset),
            Op::TargetSet(n) => target.value.set(Value::Int(n)),
            Op::UpdateNow => binding.update_target_now(),
            Op::Dispose => binding.dispose(),
        }
        if binding.is_disposed() {
            assert_eq!(target.received.borrow().len(), before.0);
            assert_eq!(source.writes.get(), before.1);
        }
        if !mode.updates_target() {
            assert!(target.received.borrow().is_empty());
        }
        if !mode.updates_source() {
            assert_eq!(source.writes.get(), 0);
        }
    }

    assert!(target.received.borrow().iter().all(|v| !v.is_unset()));
});
