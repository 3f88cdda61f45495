#![forbid(unsafe_code)]

//! Multicast change events with RAII subscriptions.
//!
//! An [`Event<T>`] is the notification channel behind every source and
//! target binding. Subscribers are held weakly; the strong reference lives
//! in the [`Subscription`] returned to the subscriber, so whoever owns the
//! subscription owns the callback's lifetime.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. A subscription released before its turn in an ongoing emission is not
//!    called for that emission, including releases made by earlier callbacks.
//! 3. No internal borrow is held while a callback runs, so callbacks may
//!    subscribe, unsubscribe or emit on the same event.
//! 4. Dead entries are pruned lazily on the next subscribe or emit.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

/// A single-threaded multicast event carrying a `T` payload.
///
/// Cloning an `Event` yields another handle to the same subscriber list.
pub struct Event<T: 'static> {
    subscribers: Rc<RefCell<Vec<Weak<Callback<T>>>>>,
}

impl<T: 'static> Event<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Register `callback`. It stays registered while the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(callback);
        {
            let mut subs = self.subscribers.borrow_mut();
            subs.retain(|w| w.strong_count() > 0);
            subs.push(Rc::downgrade(&callback));
        }
        Subscription::new(callback)
    }

    /// Notify every live subscriber.
    pub fn emit(&self, payload: &T) {
        let snapshot: Vec<Weak<Callback<T>>> = {
            let mut subs = self.subscribers.borrow_mut();
            subs.retain(|w| w.strong_count() > 0);
            subs.clone()
        };
        for weak in snapshot {
            if let Some(callback) = weak.upgrade() {
                callback(payload);
            }
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

impl<T: 'static> Clone for Event<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T: 'static> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// RAII handle for an event subscription.
///
/// Dropping the handle, or calling [`unsubscribe`](Self::unsubscribe),
/// releases the callback. Releasing twice is a no-op.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    callback: Option<Box<dyn Any>>,
}

impl Subscription {
    fn new<T: 'static>(callback: Rc<Callback<T>>) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// A subscription that holds nothing.
    pub fn empty() -> Self {
        Self { callback: None }
    }

    /// Release the callback now.
    pub fn unsubscribe(&mut self) {
        self.callback = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
