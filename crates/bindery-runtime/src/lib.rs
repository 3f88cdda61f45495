#![forbid(unsafe_code)]

//! Runtime for Bindery: live two-way bindings.
//!
//! - [`reactive`]: change events, subscriptions and observables.
//! - [`binding`]: the source/target binding contracts, [`FullBinding`] and
//!   [`BindingContext`].
//! - [`locale`]: the locale context whose current locale is handed to
//!   converters.
//!
//! # Example
//!
//! ```ignore
//! use bindery_runtime::{BindingContext, BindingRequest};
//! use bindery_core::{BindingDescription, BindingMode};
//!
//! let mut view = BindingContext::new(sources, targets);
//! view.bind(BindingRequest::new(
//!     view_model,
//!     label,
//!     BindingDescription::new("Text", "Person.Name").with_mode(BindingMode::OneWay),
//! ))?;
//! ```

pub mod binding;
pub mod error;
pub mod locale;
pub mod reactive;

pub use binding::{
    BindingContext, BindingRequest, BindingRoot, FullBinding, SourceBinding,
    SourceBindingFactory, TargetBinding, TargetBindingFactory,
};
pub use error::BindError;
pub use locale::LocaleContext;
pub use reactive::{Event, Observable, Subscription};
