#![forbid(unsafe_code)]

//! Change-notification primitives used by bindings.
//!
//! - [`Event`]: a multicast notification channel. Source and target bindings
//!   expose their change notifications through it.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Observable`]: a shared, version-tracked value built on [`Event`].
//!
//! # Architecture
//!
//! Everything here uses `Rc`/`RefCell` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers and cleaned up lazily;
//! the `Subscription` holds the only strong reference, so the subscriber
//! decides how long its callback lives.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Releasing a [`Subscription`] takes effect immediately, even mid-emission.
//! 3. `Observable` version increments exactly once per mutation that changes
//!    the value; setting an equal value is a no-op.

pub mod event;
pub mod observable;

pub use event::{Event, Subscription};
pub use observable::Observable;
