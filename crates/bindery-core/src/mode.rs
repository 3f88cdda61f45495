#![forbid(unsafe_code)]

//! Binding modes: which directions of a binding are live.

use std::fmt;
use std::str::FromStr;

/// Direction(s) in which a binding propagates values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindingMode {
    /// Defer to the target binding's own default mode.
    #[default]
    Default,
    /// Source changes update the target.
    OneWay,
    /// Source changes update the target and target changes update the source.
    TwoWay,
    /// Target changes update the source; the target is never written.
    OneWayToSource,
    /// The target is written once when the binding is created.
    OneTime,
}

impl BindingMode {
    /// Resolve `Default` against the target's default mode.
    ///
    /// A target that itself reports `Default` resolves to `OneWay`.
    #[must_use]
    pub fn resolve(self, target_default: BindingMode) -> BindingMode {
        match self {
            Self::Default => match target_default {
                Self::Default => Self::OneWay,
                other => other,
            },
            other => other,
        }
    }

    /// Whether the target is written at least once from the source.
    #[must_use]
    pub fn updates_target(self) -> bool {
        matches!(self, Self::OneWay | Self::TwoWay | Self::OneTime)
    }

    /// Whether later source changes keep updating the target.
    #[must_use]
    pub fn tracks_source(self) -> bool {
        matches!(self, Self::OneWay | Self::TwoWay)
    }

    /// Whether target changes are written back to the source.
    #[must_use]
    pub fn updates_source(self) -> bool {
        matches!(self, Self::TwoWay | Self::OneWayToSource)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::OneWay => "OneWay",
            Self::TwoWay => "TwoWay",
            Self::OneWayToSource => "OneWayToSource",
            Self::OneTime => "OneTime",
        }
    }
}

impl fmt::Display for BindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised binding mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown binding mode: {}", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for BindingMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [
            Self::Default,
            Self::OneWay,
            Self::TwoWay,
            Self::OneWayToSource,
            Self::OneTime,
        ]
        .into_iter()
        .find(|mode| mode.as_str().eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| ParseModeError(trimmed.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_defers_to_target() {
        assert_eq!(
            BindingMode::Default.resolve(BindingMode::TwoWay),
            BindingMode::TwoWay
        );
        assert_eq!(
            BindingMode::Default.resolve(BindingMode::Default),
            BindingMode::OneWay
        );
        assert_eq!(
            BindingMode::OneWayToSource.resolve(BindingMode::TwoWay),
            BindingMode::OneWayToSource
        );
    }

    #[test]
    fn direction_table() {
        use BindingMode::*;
        assert!(OneWay.updates_target() && OneWay.tracks_source() && !OneWay.updates_source());
        assert!(TwoWay.updates_target() && TwoWay.tracks_source() && TwoWay.updates_source());
        assert!(!OneWayToSource.updates_target() && OneWayToSource.updates_source());
        assert!(OneTime.updates_target() && !OneTime.tracks_source() && !OneTime.updates_source());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("twoway".parse(), Ok(BindingMode::TwoWay));
        assert_eq!(" OneWayToSource ".parse(), Ok(BindingMode::OneWayToSource));
        assert_eq!(
            "sideways".parse::<BindingMode>(),
            Err(ParseModeError("sideways".into()))
        );
    }

    fn any_mode() -> impl Strategy<Value = BindingMode> {
        prop_oneof![
            Just(BindingMode::Default),
            Just(BindingMode::OneWay),
            Just(BindingMode::TwoWay),
            Just(BindingMode::OneWayToSource),
            Just(BindingMode::OneTime),
        ]
    }

    proptest! {
        #[test]
        fn resolved_mode_is_never_default(mode in any_mode(), target in any_mode()) {
            prop_assert_ne!(mode.resolve(target), BindingMode::Default);
        }

        #[test]
        fn display_parses_back(mode in any_mode()) {
            prop_assert_eq!(mode.to_string().parse::<BindingMode>(), Ok(mode));
        }
    }
}
