#![forbid(unsafe_code)]

//! The full binding: source, target, converter and mode in one entity.
//!
//! # Propagation
//!
//! Source to target (on every source change, and once at construction when
//! the mode writes the target):
//!
//! 1. Read the source. An unset source skips conversion.
//! 2. Run the converter, if any. A failed conversion yields no value.
//! 3. No value: use the fallback. No fallback: use the default for the
//!    target's declared type, resolved afresh for this pass.
//! 4. Write the target exactly once.
//!
//! Target to source (only in `TwoWay` and `OneWayToSource`):
//!
//! 1. Take the raw value from the target's notification.
//! 2. Run `convert_back` against the source's current declared type. A
//!    failure drops the update; fallbacks never apply in this direction.
//! 3. Write the source.
//!
//! # Invariants
//!
//! 1. The binding owns its source and target bindings and disposes each
//!    exactly once, however many times [`FullBinding::dispose`] runs.
//! 2. Event callbacks hold the binding state weakly; a subscription never
//!    keeps a dropped binding alive.
//! 3. After dispose, no read, conversion or write happens in either
//!    direction, including for a notification already on the stack.
//! 4. Notifications are expected one at a time on a single thread. Nothing
//!    here locks or blocks.
//!
//! # Feedback
//!
//! Writing the target may make it raise its own change notification, which
//! a two-way binding turns into a `convert_back` and a source write. With
//! inverse converters that settles after one round trip. Bindings built with
//! [`BindingRequest::with_feedback_guard`] ignore target notifications raised
//! while they are writing the target.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use bindery_core::{BindingDescription, BindingMode, DefaultValues, TypeDesc, Value};

use super::{
    BindingRoot, SourceBinding, SourceBindingFactory, TargetBinding, TargetBindingFactory,
};
use crate::error::BindError;
use crate::locale::LocaleContext;
use crate::reactive::Subscription;

thread_local! {
    static STANDARD_DEFAULTS: Rc<DefaultValues> = Rc::new(DefaultValues::standard());
}

/// Everything needed to build one [`FullBinding`].
pub struct BindingRequest {
    source_root: BindingRoot,
    target_root: BindingRoot,
    description: BindingDescription,
    feedback_guard: bool,
    locale: Option<LocaleContext>,
    defaults: Option<Rc<DefaultValues>>,
}

impl BindingRequest {
    #[must_use]
    pub fn new(
        source_root: BindingRoot,
        target_root: BindingRoot,
        description: BindingDescription,
    ) -> Self {
        Self {
            source_root,
            target_root,
            description,
            feedback_guard: false,
            locale: None,
            defaults: None,
        }
    }

    /// Ignore target notifications raised by this binding's own target writes.
    #[must_use]
    pub fn with_feedback_guard(mut self) -> Self {
        self.feedback_guard = true;
        self
    }

    /// Locale context for converter calls. Defaults to the global context.
    #[must_use]
    pub fn with_locale(mut self, locale: LocaleContext) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Default-value policy. Defaults to [`DefaultValues::standard`].
    #[must_use]
    pub fn with_defaults(mut self, defaults: Rc<DefaultValues>) -> Self {
        self.defaults = Some(defaults);
        self
    }

    #[must_use]
    pub fn description(&self) -> &BindingDescription {
        &self.description
    }

    pub(crate) fn locale_or(mut self, locale: &LocaleContext) -> Self {
        if self.locale.is_none() {
            self.locale = Some(locale.clone());
        }
        self
    }
}

impl fmt::Debug for BindingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRequest")
            .field("description", &self.description)
            .field("feedback_guard", &self.feedback_guard)
            .finish()
    }
}

/// State shared with the event callbacks.
struct Shared {
    description: BindingDescription,
    mode: BindingMode,
    source: Box<dyn SourceBinding>,
    target: Box<dyn TargetBinding>,
    defaults: Rc<DefaultValues>,
    locale: LocaleContext,
    feedback_guard: bool,
    writing_target: Cell<bool>,
    disposed: Cell<bool>,
}

impl Shared {
    fn update_target_from_source(&self) {
        if self.disposed.get() {
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "update_target",
            target_name = self.description.target_name(),
            source_path = self.description.source_path()
        )
        .entered();

        let value = self.source.value();
        let target_type = self.target.target_type();

        let mut candidate = if value.is_unset() {
            tracing::trace!(
                source_path = self.description.source_path(),
                "source value unset"
            );
            Value::Unset
        } else {
            self.convert_to_target(value, &target_type)
        };
        if self.disposed.get() {
            return;
        }

        if candidate.is_unset() {
            candidate = self.description.fallback_value().clone();
        }
        if candidate.is_unset() {
            candidate = self.defaults.resolve(&target_type);
        }

        self.writing_target.set(true);
        self.target.set_value(candidate);
        self.writing_target.set(false);
    }

    // A failed conversion yields `Unset` so the caller applies fallback/default.
    fn convert_to_target(&self, value: Value, target_type: &TypeDesc) -> Value {
        let Some(converter) = self.description.converter() else {
            return value;
        };
        let locale = self.locale.current_locale();
        match converter.convert(
            &value,
            target_type,
            self.description.converter_parameter(),
            &locale,
        ) {
            Ok(converted) => converted,
            Err(err) => {
                tracing::warn!(
                    target_name = self.description.target_name(),
                    source_path = self.description.source_path(),
                    value = %value,
                    error = %err,
                    "conversion to target failed, using fallback"
                );
                Value::Unset
            }
        }
    }

    fn update_source_from_target(&self, value: &Value) {
        if self.disposed.get() {
            return;
        }
        if self.feedback_guard && self.writing_target.get() {
            tracing::trace!(
                target_name = self.description.target_name(),
                "ignoring target change raised by own write"
            );
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "update_source",
            target_name = self.description.target_name(),
            source_path = self.description.source_path()
        )
        .entered();

        let value = match self.description.converter() {
            Some(converter) => {
                let source_type = self.source.source_type();
                let locale = self.locale.current_locale();
                match converter.convert_back(
                    value,
                    &source_type,
                    self.description.converter_parameter(),
                    &locale,
                ) {
                    Ok(converted) => converted,
                    Err(err) => {
                        tracing::warn!(
                            target_name = self.description.target_name(),
                            source_path = self.description.source_path(),
                            value = %value,
                            error = %err,
                            "conversion back to source failed, source left unchanged"
                        );
                        return;
                    }
                }
            }
            None => value.clone(),
        };
        if self.disposed.get() {
            return;
        }
        self.source.set_value(value);
    }
}

/// Re-runs one binding's forward pass for as long as the binding is alive.
#[derive(Clone)]
pub(crate) struct TargetRefresh(Weak<Shared>);

impl TargetRefresh {
    pub(crate) fn run(&self) {
        let Some(shared) = self.0.upgrade() else {
            return;
        };
        if shared.mode.updates_target() {
            shared.update_target_from_source();
        }
    }
}

/// A live binding between one source path and one target member.
///
/// Dropping the binding disposes it.
pub struct FullBinding {
    shared: Rc<Shared>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl FullBinding {
    /// Build the source and target bindings, subscribe according to the
    /// effective mode, and push the source's current value to the target
    /// when the mode writes the target.
    ///
    /// # Errors
    ///
    /// - [`BindError::InvalidDescription`] if the description is invalid.
    /// - Any error from either factory. If the target factory fails, the
    ///   already-created source binding is disposed first.
    pub fn new(
        request: BindingRequest,
        sources: &dyn SourceBindingFactory,
        targets: &dyn TargetBindingFactory,
    ) -> Result<Self, BindError> {
        let BindingRequest {
            source_root,
            target_root,
            description,
            feedback_guard,
            locale,
            defaults,
        } = request;
        description.validate()?;

        let source = sources.create(&source_root, description.source_path())?;
        let target = match targets.create(&target_root, description.target_name()) {
            Ok(target) => target,
            Err(err) => {
                source.dispose();
                return Err(err);
            }
        };

        let mode = description.mode().resolve(target.default_mode());
        let shared = Rc::new(Shared {
            description,
            mode,
            source,
            target,
            defaults: defaults.unwrap_or_else(|| STANDARD_DEFAULTS.with(Rc::clone)),
            locale: locale.unwrap_or_else(LocaleContext::global),
            feedback_guard,
            writing_target: Cell::new(false),
            disposed: Cell::new(false),
        });

        let mut subscriptions = Vec::with_capacity(2);
        if mode.updates_source() {
            let weak = Rc::downgrade(&shared);
            subscriptions.push(shared.target.subscribe_value_changed(Box::new(
                move |value: &Value| {
                    if let Some(shared) = weak.upgrade() {
                        shared.update_source_from_target(value);
                    }
                },
            )));
        }
        if mode.tracks_source() {
            let weak = Rc::downgrade(&shared);
            subscriptions.push(shared.source.subscribe_changed(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.update_target_from_source();
                }
            })));
        }

        tracing::debug!(
            target_name = shared.description.target_name(),
            source_path = shared.description.source_path(),
            mode = %mode,
            "binding created"
        );

        let binding = Self {
            shared,
            subscriptions: RefCell::new(subscriptions),
        };
        if mode.updates_target() {
            binding.shared.update_target_from_source();
        }
        Ok(binding)
    }

    /// The effective mode, with `Default` already resolved.
    #[must_use]
    pub fn mode(&self) -> BindingMode {
        self.shared.mode
    }

    #[must_use]
    pub fn description(&self) -> &BindingDescription {
        &self.shared.description
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }

    /// Run one source-to-target pass now.
    ///
    /// No-op when the mode never writes the target, or after dispose.
    pub fn update_target_now(&self) {
        if self.shared.mode.updates_target() {
            self.shared.update_target_from_source();
        }
    }

    pub(crate) fn refresh_handle(&self) -> TargetRefresh {
        TargetRefresh(Rc::downgrade(&self.shared))
    }

    /// Unsubscribe from both bindings and dispose them. Idempotent.
    pub fn dispose(&self) {
        if self.shared.disposed.replace(true) {
            return;
        }
        let subscriptions = std::mem::take(&mut *self.subscriptions.borrow_mut());
        drop(subscriptions);
        self.shared.source.dispose();
        self.shared.target.dispose();
        tracing::debug!(
            target_name = self.shared.description.target_name(),
            source_path = self.shared.description.source_path(),
            "binding disposed"
        );
    }
}

impl Drop for FullBinding {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for FullBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullBinding")
            .field("description", &self.shared.description)
            .field("mode", &self.shared.mode)
            .field("disposed", &self.shared.disposed.get())
            .finish()
    }
}
