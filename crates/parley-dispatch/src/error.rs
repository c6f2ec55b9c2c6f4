//! Dispatch errors.
//!
//! Only subscription management and category management return errors.
//! Nothing that happens during `notify` reaches the producer; failures
//! there are turned into [`ErrorInfo`](parley_types::ErrorInfo) records
//! and sent to the error sink.

use parley_event::EventError;
use parley_types::ErrorCode;
use std::any::Any;
use thiserror::Error;

/// Errors from [`DispatchHub`](crate::DispatchHub) and
/// [`Dispatcher`](crate::Dispatcher) management calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No dispatcher exists for this category.
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    /// A target was given for a category without a designated target.
    #[error("category does not support targeted subscriptions: {0}")]
    NotSpecific(String),

    /// The category is reserved and cannot be removed.
    #[error("category is reserved: {0}")]
    ReservedCategory(String),

    /// Catalog or validation error.
    #[error(transparent)]
    Event(#[from] EventError),
}

impl ErrorCode for DispatchError {
    fn code(&self) -> &'static str {
        match self {
            Self::CategoryNotFound(_) => "DISPATCH_CATEGORY_NOT_FOUND",
            Self::NotSpecific(_) => "DISPATCH_NOT_SPECIFIC",
            Self::ReservedCategory(_) => "DISPATCH_RESERVED_CATEGORY",
            Self::Event(e) => e.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        // Extension categories may be registered later.
        matches!(self, Self::CategoryNotFound(_))
    }
}

/// A subscriber failure caught during delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriberError {
    /// The subscriber returned an error.
    #[error("{0}")]
    Failed(String),

    /// The subscriber panicked.
    #[error("panicked: {0}")]
    Panicked(String),
}

impl SubscriberError {
    /// Creates a [`SubscriberError::Failed`] from anything displayable.
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self::Failed(reason.to_string())
    }
}

impl ErrorCode for SubscriberError {
    fn code(&self) -> &'static str {
        match self {
            Self::Failed(_) => "DISPATCH_SUBSCRIBER_FAILED",
            Self::Panicked(_) => "DISPATCH_SUBSCRIBER_PANICKED",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// A recipe failure caught while filling placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// A recipe builder panicked; the recipe counts as declined.
    #[error("recipe '{recipe}' panicked: {message}")]
    RecipePanicked {
        /// Recipe name.
        recipe: String,
        /// Panic payload, if it was a string.
        message: String,
    },
}

impl ErrorCode for SynthesisError {
    fn code(&self) -> &'static str {
        match self {
            Self::RecipePanicked { .. } => "DISPATCH_RECIPE_PANICKED",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// Extracts the message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
