#![forbid(unsafe_code)]

//! Live bindings between a source object graph and a target member.
//!
//! A [`FullBinding`] pairs one [`SourceBinding`] (a readable, writable,
//! change-notifying handle on a source property path) with one
//! [`TargetBinding`] (a settable, change-notifying handle on a target member)
//! and keeps them in sync through an optional converter, under a
//! [`BindingMode`](bindery_core::BindingMode).
//!
//! How a property path or a target name is resolved into a live handle is
//! not decided here: callers supply a [`SourceBindingFactory`] and a
//! [`TargetBindingFactory`]. Closures with the matching signature implement
//! both factory traits.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Factory error | Unknown path or member | `FullBinding::new` returns the error; nothing stays subscribed |
//! | Source unset | Broken path segment | Target shows fallback, else type default |
//! | `convert` error | Converter rejects value | Target shows fallback, else type default |
//! | `convert_back` error | Converter rejects value | Source write skipped |

pub mod context;
pub mod full;

pub use context::BindingContext;
pub use full::{BindingRequest, FullBinding};

use std::any::Any;
use std::rc::Rc;

use bindery_core::{BindingMode, TypeDesc, Value};

use crate::error::BindError;
use crate::reactive::Subscription;

/// Root object a binding resolves its path or member name against.
pub type BindingRoot = Rc<dyn Any>;

/// Callback for a source change notification. The observer re-reads the value.
pub type SourceChangedCallback = Box<dyn Fn()>;

/// Callback for a target change notification, carrying the new raw value.
pub type TargetChangedCallback = Box<dyn Fn(&Value)>;

/// Live handle on one property path of a source object.
pub trait SourceBinding {
    /// Current value, or [`Value::Unset`] when the path cannot be resolved.
    fn value(&self) -> Value;

    fn set_value(&self, value: Value);

    /// Declared type of the member the path currently resolves to.
    ///
    /// May change over the binding's lifetime.
    fn source_type(&self) -> TypeDesc;

    /// Subscribe to change notifications.
    fn subscribe_changed(&self, callback: SourceChangedCallback) -> Subscription;

    fn dispose(&self);
}

/// Live handle on one settable member of a target object.
pub trait TargetBinding {
    /// Declared type of the target member. May change between events.
    fn target_type(&self) -> TypeDesc;

    /// Mode used when a description asks for [`BindingMode::Default`].
    fn default_mode(&self) -> BindingMode;

    fn set_value(&self, value: Value);

    /// Subscribe to change notifications carrying the new raw value.
    fn subscribe_value_changed(&self, callback: TargetChangedCallback) -> Subscription;

    fn dispose(&self);
}

/// Creates source bindings for `(root, property path)` pairs.
pub trait SourceBindingFactory {
    /// # Errors
    ///
    /// [`BindError::SourceConstruction`] if the path cannot be bound.
    fn create(&self, root: &BindingRoot, path: &str) -> Result<Box<dyn SourceBinding>, BindError>;
}

/// Creates target bindings for `(root, member name)` pairs.
pub trait TargetBindingFactory {
    /// # Errors
    ///
    /// [`BindError::TargetConstruction`] if the member cannot be bound.
    fn create(&self, root: &BindingRoot, name: &str) -> Result<Box<dyn TargetBinding>, BindError>;
}

impl<F> SourceBindingFactory for F
where
    F: Fn(&BindingRoot, &str) -> Result<Box<dyn SourceBinding>, BindError>,
{
    fn create(&self, root: &BindingRoot, path: &str) -> Result<Box<dyn SourceBinding>, BindError> {
        self(root, path)
    }
}

impl<F> TargetBindingFactory for F
where
    F: Fn(&BindingRoot, &str) -> Result<Box<dyn TargetBinding>, BindError>,
{
    fn create(&self, root: &BindingRoot, name: &str) -> Result<Box<dyn TargetBinding>, BindError> {
        self(root, name)
    }
}

impl<T: SourceBinding + ?Sized> SourceBinding for Rc<T> {
    fn value(&self) -> Value {
        (**self).value()
    }

    fn set_value(&self, value: Value) {
        (**self).set_value(value);
    }

    fn source_type(&self) -> TypeDesc {
        (**self).source_type()
    }

    fn subscribe_changed(&self, callback: SourceChangedCallback) -> Subscription {
        (**self).subscribe_changed(callback)
    }

    fn dispose(&self) {
        (**self).dispose();
    }
}

impl<T: TargetBinding + ?Sized> TargetBinding for Rc<T> {
    fn target_type(&self) -> TypeDesc {
        (**self).target_type()
    }

    fn default_mode(&self) -> BindingMode {
        (**self).default_mode()
    }

    fn set_value(&self, value: Value) {
        (**self).set_value(value);
    }

    fn subscribe_value_changed(&self, callback: TargetChangedCallback) -> Subscription {
        (**self).subscribe_value_changed(callback)
    }

    fn dispose(&self) {
        (**self).dispose();
    }
}
