#![forbid(unsafe_code)]

//! Lifecycle management for the bindings of one logical view.
//!
//! A [`BindingContext`] owns every [`FullBinding`] created for a view and
//! disposes them together when the view goes away. It also carries the
//! view's [`LocaleContext`]: bindings built through the context convert with
//! that culture unless their request names another, and a culture switch
//! re-runs the forward pass of every live binding.
//!
//! # Invariants
//!
//! 1. Bindings are disposed in reverse registration order on `clear()` and
//!    on drop.
//! 2. After `clear()`, no binding from this context propagates anything,
//!    including on a later culture switch.
//! 3. `bind_all` is all-or-nothing: if any binding fails to build, the
//!    bindings it already built are disposed and the context is unchanged.
//! 4. The culture subscription holds bindings weakly; it never keeps a
//!    binding alive.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bindery_core::BindingDescription;

use super::full::{BindingRequest, FullBinding, TargetRefresh};
use super::{BindingRoot, SourceBindingFactory, TargetBindingFactory};
use crate::error::BindError;
use crate::locale::LocaleContext;
use crate::reactive::Subscription;

type RefreshList = Rc<RefCell<Vec<TargetRefresh>>>;

/// Owns the bindings of one view, built through a fixed pair of factories.
pub struct BindingContext {
    sources: Rc<dyn SourceBindingFactory>,
    targets: Rc<dyn TargetBindingFactory>,
    locale: LocaleContext,
    bindings: Vec<FullBinding>,
    refreshers: RefreshList,
    _culture_watch: Subscription,
}

impl BindingContext {
    /// Context converting with the thread's global culture.
    #[must_use]
    pub fn new(
        sources: Rc<dyn SourceBindingFactory>,
        targets: Rc<dyn TargetBindingFactory>,
    ) -> Self {
        Self::with_locale(sources, targets, LocaleContext::global())
    }

    #[must_use]
    pub fn with_locale(
        sources: Rc<dyn SourceBindingFactory>,
        targets: Rc<dyn TargetBindingFactory>,
        locale: LocaleContext,
    ) -> Self {
        let refreshers: RefreshList = Rc::default();
        let culture_watch = watch_culture(&locale, &refreshers);
        Self {
            sources,
            targets,
            locale,
            bindings: Vec::new(),
            refreshers,
            _culture_watch: culture_watch,
        }
    }

    #[must_use]
    pub fn locale(&self) -> &LocaleContext {
        &self.locale
    }

    /// Build a binding and keep it in this context.
    ///
    /// # Errors
    ///
    /// Any error from [`FullBinding::new`].
    pub fn bind(&mut self, request: BindingRequest) -> Result<&FullBinding, BindError> {
        let request = request.locale_or(&self.locale);
        let binding = FullBinding::new(request, self.sources.as_ref(), self.targets.as_ref())?;
        Ok(self.keep(binding))
    }

    /// Bind every description between the same source and target roots.
    ///
    /// Returns the number of bindings added.
    ///
    /// # Errors
    ///
    /// The first construction error. Bindings built earlier in the same call
    /// are disposed.
    pub fn bind_all(
        &mut self,
        source_root: &BindingRoot,
        target_root: &BindingRoot,
        descriptions: impl IntoIterator<Item = BindingDescription>,
    ) -> Result<usize, BindError> {
        let mut built = Vec::new();
        for description in descriptions {
            let request =
                BindingRequest::new(Rc::clone(source_root), Rc::clone(target_root), description)
                    .with_locale(self.locale.clone());
            match FullBinding::new(request, self.sources.as_ref(), self.targets.as_ref()) {
                Ok(binding) => built.push(binding),
                Err(err) => {
                    tracing::debug!(error = %err, built = built.len(), "rolling back bind_all");
                    while let Some(binding) = built.pop() {
                        binding.dispose();
                    }
                    return Err(err);
                }
            }
        }
        let added = built.len();
        for binding in built {
            self.keep(binding);
        }
        Ok(added)
    }

    /// Take ownership of an already-built binding.
    ///
    /// It keeps converting with whatever culture it was built with, but is
    /// still refreshed when this context's culture switches.
    pub fn add(&mut self, binding: FullBinding) {
        self.keep(binding);
    }

    /// Re-run a source-to-target pass on every binding.
    pub fn refresh(&self) {
        for binding in &self.bindings {
            binding.update_target_now();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FullBinding> {
        self.bindings.iter()
    }

    /// Dispose every binding, newest first. The context stays usable.
    pub fn clear(&mut self) {
        self.refreshers.borrow_mut().clear();
        while let Some(binding) = self.bindings.pop() {
            binding.dispose();
        }
    }

    fn keep(&mut self, binding: FullBinding) -> &FullBinding {
        self.refreshers.borrow_mut().push(binding.refresh_handle());
        self.bindings.push(binding);
        &self.bindings[self.bindings.len() - 1]
    }
}

fn watch_culture(locale: &LocaleContext, refreshers: &RefreshList) -> Subscription {
    let refreshers = Rc::clone(refreshers);
    locale.subscribe(move |culture| {
        let pending = refreshers.borrow().clone();
        tracing::debug!(culture = %culture, bindings = pending.len(), "culture switched");
        for refresh in &pending {
            refresh.run();
        }
    })
}

impl Drop for BindingContext {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("binding_count", &self.bindings.len())
            .field("locale", &self.locale.current_locale())
            .finish()
    }
}
