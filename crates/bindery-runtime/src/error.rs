#![forbid(unsafe_code)]

//! Errors raised while constructing bindings.
//!
//! Conversion failures never surface here: they are contained inside the
//! binding and degrade to fallback or default values. Only a binding that
//! cannot resolve its endpoints fails, since it has no valid degraded mode.

use std::fmt;

use bindery_core::DescriptionError;

/// Error constructing a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The binding description failed validation.
    InvalidDescription(DescriptionError),
    /// The source binding could not be created for `path`.
    SourceConstruction { path: String, reason: String },
    /// The target binding could not be created for `name`.
    TargetConstruction { name: String, reason: String },
}

impl BindError {
    pub fn source_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceConstruction {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn target_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TargetConstruction {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDescription(err) => write!(f, "invalid binding description: {err}"),
            Self::SourceConstruction { path, reason } => {
                write!(f, "cannot bind source path '{path}': {reason}")
            }
            Self::TargetConstruction { name, reason } => {
                write!(f, "cannot bind target '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDescription(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DescriptionError> for BindError {
    fn from(err: DescriptionError) -> Self {
        Self::InvalidDescription(err)
    }
}
