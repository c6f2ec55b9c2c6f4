//! Subscriber trait and closure adapter.

use crate::SubscriberError;
use parley_event::Event;
use parley_types::Parser;
use std::fmt;
use std::sync::Arc;

/// A consumer of one or more event categories.
///
/// Implementations are shared as `Arc<dyn Subscriber>`. Identity is the
/// `Arc` allocation: subscribing the same `Arc` twice is a no-op, while
/// two separately allocated subscribers are distinct even if equal.
///
/// # Failure
///
/// Returning `Err` (or panicking, when panic catching is enabled) never
/// reaches the producer and never stops delivery to later subscribers.
/// The failure is wrapped with context and sent to the error sink.
///
/// # Thread Safety
///
/// Delivery happens on the producer's thread while subscriptions may be
/// changed from others, so subscribers must be `Send + Sync`.
pub trait Subscriber: Send + Sync {
    /// Name used in logs and error reports.
    fn name(&self) -> &str;

    /// Handles one notification.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriberError`] if the notification could not be handled.
    fn on_event(&self, parser: &dyn Parser, event: &Event<'_>) -> Result<(), SubscriberError>;
}

/// Shared subscriber handle.
pub type SubscriberRef = Arc<dyn Subscriber>;

/// Returns `true` if both handles point to the same subscriber.
#[must_use]
pub fn same_subscriber(a: &SubscriberRef, b: &SubscriberRef) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

type Handler = dyn Fn(&dyn Parser, &Event<'_>) -> Result<(), SubscriberError> + Send + Sync;

/// A [`Subscriber`] backed by a closure.
pub struct FnSubscriber {
    name: String,
    handler: Box<Handler>,
}

impl FnSubscriber {
    /// Wraps a closure.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&dyn Parser, &Event<'_>) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Box::new(handler),
        }
    }
}

impl Subscriber for FnSubscriber {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, parser: &dyn Parser, event: &Event<'_>) -> Result<(), SubscriberError> {
        (self.handler)(parser, event)
    }
}

impl fmt::Debug for FnSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSubscriber")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Wraps a closure as a shared subscriber.
///
/// ```
/// use parley_dispatch::{subscriber_fn, Subscriber};
///
/// let sub = subscriber_fn("topic-pane", |_parser, event| {
///     let _ = event.channel("channel");
///     Ok(())
/// });
/// assert_eq!(sub.name(), "topic-pane");
/// ```
pub fn subscriber_fn<F>(name: impl Into<String>, handler: F) -> SubscriberRef
where
    F: Fn(&dyn Parser, &Event<'_>) -> Result<(), SubscriberError> + Send + Sync + 'static,
{
    Arc::new(FnSubscriber::new(name, handler))
}
