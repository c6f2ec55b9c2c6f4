//! Event catalog errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`EventError::UnknownCategory`] | `EVENT_UNKNOWN_CATEGORY` | No |
//! | [`EventError::DuplicateCategory`] | `EVENT_DUPLICATE_CATEGORY` | No |
//! | [`EventError::InvalidCategory`] | `EVENT_INVALID_CATEGORY` | No |
//! | [`EventError::ArityMismatch`] | `EVENT_ARITY_MISMATCH` | No |
//! | [`EventError::KindMismatch`] | `EVENT_KIND_MISMATCH` | No |
//!
//! None of these are recoverable: they all describe a producer or
//! registration bug that a retry cannot fix.

use crate::ParamKind;
use parley_types::ErrorCode;
use thiserror::Error;

/// Errors from the category catalog and argument validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// No category is registered under this name.
    #[error("unknown event category: {0}")]
    UnknownCategory(String),

    /// A category with this name (ignoring case) already exists.
    #[error("event category already registered: {0}")]
    DuplicateCategory(String),

    /// A category descriptor failed validation.
    #[error("invalid event category '{name}': {reason}")]
    InvalidCategory {
        /// Category name as given.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A notification supplied the wrong number of arguments.
    #[error("{category}: expected {expected} arguments, got {actual}")]
    ArityMismatch {
        /// Category name.
        category: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// A notification supplied an argument of the wrong kind.
    #[error("{category}: parameter '{param}' expects {expected}, got {actual}")]
    KindMismatch {
        /// Category name.
        category: String,
        /// Parameter name.
        param: String,
        /// Declared kind.
        expected: ParamKind,
        /// Variant name of the supplied argument.
        actual: &'static str,
    },
}

impl EventError {
    /// Creates an [`EventError::InvalidCategory`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCategory {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownCategory(_) => "EVENT_UNKNOWN_CATEGORY",
            Self::DuplicateCategory(_) => "EVENT_DUPLICATE_CATEGORY",
            Self::InvalidCategory { .. } => "EVENT_INVALID_CATEGORY",
            Self::ArityMismatch { .. } => "EVENT_ARITY_MISMATCH",
            Self::KindMismatch { .. } => "EVENT_KIND_MISMATCH",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
