#![forbid(unsafe_code)]

//! Shared, version-tracked values with change notification.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::event::{Event, Subscription};

struct ObservableInner<T: 'static> {
    value: RefCell<T>,
    version: Cell<u64>,
    changed: Event<T>,
}

/// A shared value that notifies subscribers when it changes.
///
/// Clones share the same underlying value. Setting a value equal to the
/// current one is a no-op: no version bump, no notification.
pub struct Observable<T: Clone + PartialEq + 'static> {
    inner: Rc<ObservableInner<T>>,
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                changed: Event::new(),
            }),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        if *self.inner.value.borrow() == value {
            return;
        }
        self.inner.value.replace(value.clone());
        self.inner.version.set(self.inner.version.get() + 1);
        self.inner.changed.emit(&value);
    }

    /// Number of changes applied so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Subscribe to changes; the callback receives the new value.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.changed.subscribe(callback)
    }
}

impl<T: Clone + PartialEq + 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}
