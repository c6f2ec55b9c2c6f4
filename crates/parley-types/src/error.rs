//! Unified error interface for parley.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so that
//! whatever subscribes to the error sink can branch on a stable,
//! machine-readable code instead of parsing display strings.
//!
//! # Code Convention
//!
//! | Crate | Prefix |
//! |-------|--------|
//! | `parley-types` | `TYPES_` |
//! | `parley-event` | `EVENT_` |
//! | `parley-dispatch` | `DISPATCH_`, `CONFIG_` |
//!
//! # Example
//!
//! ```
//! use parley_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LinkError {
//!     Closed,
//!     Throttled,
//! }
//!
//! impl ErrorCode for LinkError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Closed => "LINK_CLOSED",
//!             Self::Throttled => "LINK_THROTTLED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Throttled)
//!     }
//! }
//!
//! assert_eq!(LinkError::Throttled.code(), "LINK_THROTTLED");
//! assert!(!LinkError::Closed.is_recoverable());
//! ```

use thiserror::Error;

/// Errors raised while building foundation values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// The `CASEMAPPING` token is not one parley understands.
    #[error("unknown casemapping: {0}")]
    UnknownCasemapping(String),

    /// A channel name was empty or lacked a channel prefix.
    #[error("invalid channel name: '{0}'")]
    InvalidChannelName(String),
}

impl ErrorCode for TypesError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownCasemapping(_) => "TYPES_UNKNOWN_CASEMAPPING",
            Self::InvalidChannelName(_) => "TYPES_INVALID_CHANNEL_NAME",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Machine-readable error code interface.
///
/// Codes are UPPER_SNAKE_CASE, prefixed with the owning crate's
/// namespace, and stable once published.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying (or correcting input and retrying) may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code follows the workspace conventions.
///
/// # Panics
///
/// Panics if the code is empty, lacks `expected_prefix`, or is not
/// UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use parley_types::{assert_error_code, ErrorCode};
///
/// struct Oops;
///
/// impl ErrorCode for Oops {
///     fn code(&self) -> &'static str { "DEMO_OOPS" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Oops, "DEMO_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every error in `errors` with [`assert_error_code`].
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
