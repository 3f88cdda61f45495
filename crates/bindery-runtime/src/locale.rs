#![forbid(unsafe_code)]

//! Culture handed to value converters.
//!
//! A [`LocaleContext`] is a shared, observable culture tag. Every
//! [`FullBinding`](crate::FullBinding) reads it afresh for each conversion,
//! and a [`BindingContext`](crate::BindingContext) re-runs the forward pass
//! of its bindings when the culture changes, so converted text follows a
//! culture switch without rebinding.
//!
//! Tags are normalized on the way in: `fr_FR.UTF-8@euro` becomes `fr-FR`,
//! and `C`, `POSIX` or blank tags become `en`.

use std::env;

pub use bindery_core::Locale;

use crate::reactive::{Observable, Subscription};

const FALLBACK_CULTURE: &str = "en";

thread_local! {
    static THREAD_CULTURE: LocaleContext = LocaleContext::from_env();
}

/// Shared culture tag. Clones observe and update the same tag.
#[derive(Clone, Debug)]
pub struct LocaleContext {
    culture: Observable<Locale>,
}

impl LocaleContext {
    #[must_use]
    pub fn new(tag: impl AsRef<str>) -> Self {
        let culture = culture_tag(tag.as_ref()).unwrap_or_else(|| FALLBACK_CULTURE.to_string());
        Self {
            culture: Observable::new(culture),
        }
    }

    /// Culture from `LC_ALL`, else `LANG`, else `en`.
    #[must_use]
    pub fn from_env() -> Self {
        let lc_all = env::var("LC_ALL").ok();
        let lang = env::var("LANG").ok();
        Self::new(first_culture([lc_all.as_deref(), lang.as_deref()]))
    }

    /// The context shared by every binding on this thread that was not given
    /// its own.
    #[must_use]
    pub fn global() -> Self {
        THREAD_CULTURE.with(Clone::clone)
    }

    #[must_use]
    pub fn current_locale(&self) -> Locale {
        self.culture.get()
    }

    /// Switch culture. Returns `false` when `tag` normalizes to the current
    /// culture, in which case nobody is notified.
    pub fn set_locale(&self, tag: impl AsRef<str>) -> bool {
        let before = self.culture.version();
        let culture = culture_tag(tag.as_ref()).unwrap_or_else(|| FALLBACK_CULTURE.to_string());
        self.culture.set(culture);
        self.culture.version() != before
    }

    /// Number of culture switches so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.culture.version()
    }

    /// Observe culture switches.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&Locale) + 'static) -> Subscription {
        self.culture.subscribe(callback)
    }
}

impl Default for LocaleContext {
    fn default() -> Self {
        Self::global()
    }
}

fn first_culture<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Locale {
    candidates
        .into_iter()
        .flatten()
        .find_map(culture_tag)
        .unwrap_or_else(|| FALLBACK_CULTURE.to_string())
}

// Drop the codeset and modifier, then swap POSIX underscores for hyphens.
fn culture_tag(raw: &str) -> Option<Locale> {
    let tag = raw.split(['.', '@']).next().unwrap_or_default().trim();
    match tag {
        "" => None,
        t if t.eq_ignore_ascii_case("c") || t.eq_ignore_ascii_case("posix") => {
            Some(FALLBACK_CULTURE.to_string())
        }
        t => Some(t.replace('_', "-")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn posix_tags_are_normalized() {
        assert_eq!(culture_tag("fr_FR.UTF-8@euro").as_deref(), Some("fr-FR"));
        assert_eq!(culture_tag("ca_ES@valencia").as_deref(), Some("ca-ES"));
        assert_eq!(culture_tag("POSIX").as_deref(), Some("en"));
        assert_eq!(culture_tag(" .UTF-8"), None);
    }

    #[test]
    fn first_usable_candidate_wins() {
        assert_eq!(first_culture([Some("de_DE.UTF-8"), Some("en_US")]), "de-DE");
        assert_eq!(first_culture([Some(""), Some("pt_BR")]), "pt-BR");
        assert_eq!(first_culture([None, None]), "en");
    }

    #[test]
    fn blank_tag_becomes_fallback() {
        assert_eq!(LocaleContext::new("").current_locale(), "en");
    }

    #[test]
    fn switch_notifies_only_on_change() {
        let ctx = LocaleContext::new("en_US");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = ctx.subscribe(move |culture| sink.borrow_mut().push(culture.clone()));

        assert!(!ctx.set_locale("en-US.UTF-8"));
        assert_eq!(ctx.version(), 0);
        assert!(ctx.set_locale("fr_CA"));
        assert_eq!(ctx.version(), 1);
        assert_eq!(*seen.borrow(), vec!["fr-CA".to_string()]);
    }

    #[test]
    fn clones_share_the_culture() {
        let ctx = LocaleContext::new("en");
        let other = ctx.clone();
        other.set_locale("ja_JP");
        assert_eq!(ctx.current_locale(), "ja-JP");
    }
}
