//! Test utilities for the dispatch engine.

use crate::subscriber::{Subscriber, SubscriberRef};
use crate::SubscriberError;
use parking_lot::Mutex;
use parley_event::{Event, EventArg};
use parley_types::{ErrorInfo, Parser};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A notification as a [`MockSubscriber`] saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    /// Category name.
    pub category: String,
    /// Arguments after synthesis.
    pub args: Vec<EventArg>,
}

#[derive(Debug, Clone)]
enum Behavior {
    Succeed,
    Fail(String),
    Panic,
}

struct MockState {
    name: String,
    behavior: Behavior,
    calls: AtomicUsize,
    seen: Mutex<Vec<Recorded>>,
}

impl Subscriber for MockState {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, _parser: &dyn Parser, event: &Event<'_>) -> Result<(), SubscriberError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(Recorded {
            category: event.name().to_string(),
            args: event.args().to_vec(),
        });

        match &self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(reason) => Err(SubscriberError::Failed(reason.clone())),
            Behavior::Panic => panic!("mock subscriber '{}' panicked", self.name),
        }
    }
}

/// A recording subscriber.
///
/// Clones share state, and [`MockSubscriber::shared`] always returns a
/// handle to the same subscriber, so a test can subscribe, unsubscribe
/// and inspect through any clone.
#[derive(Clone)]
pub struct MockSubscriber {
    state: Arc<MockState>,
}

impl MockSubscriber {
    fn with_behavior(name: &str, behavior: Behavior) -> Self {
        Self {
            state: Arc::new(MockState {
                name: name.to_string(),
                behavior,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A subscriber that records and succeeds.
    pub fn new(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Succeed)
    }

    /// A subscriber that records and returns [`SubscriberError::Failed`].
    pub fn failing(name: &str, reason: &str) -> Self {
        Self::with_behavior(name, Behavior::Fail(reason.to_string()))
    }

    /// A subscriber that records and panics.
    pub fn panicking(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Panic)
    }

    /// The handle to subscribe with.
    pub fn shared(&self) -> SubscriberRef {
        Arc::clone(&self.state) as SubscriberRef
    }

    /// Number of deliveries.
    pub fn call_count(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    /// Every delivery, oldest first.
    pub fn events(&self) -> Vec<Recorded> {
        self.state.seen.lock().clone()
    }

    /// Arguments of the latest delivery.
    pub fn last_args(&self) -> Option<Vec<EventArg>> {
        self.state.seen.lock().last().map(|r| r.args.clone())
    }

    /// Every [`ErrorInfo`] argument received, oldest first.
    pub fn errors(&self) -> Vec<ErrorInfo> {
        self.state
            .seen
            .lock()
            .iter()
            .flat_map(|r| r.args.iter())
            .filter_map(EventArg::as_error)
            .map(|e| ErrorInfo::clone(e))
            .collect()
    }

    /// Forgets recorded deliveries.
    pub fn reset(&self) {
        self.state.calls.store(0, Ordering::SeqCst);
        self.state.seen.lock().clear();
    }
}

impl std::fmt::Debug for MockSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSubscriber")
            .field("name", &self.state.name)
            .field("behavior", &self.state.behavior)
            .field("calls", &self.call_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriber::same_subscriber;
    use parley_event::EventKind;
    use parley_types::{ErrorLevel, FixedParser};

    #[test]
    fn shared_handles_are_identical() {
        let mock = MockSubscriber::new("m");
        assert!(same_subscriber(&mock.shared(), &mock.clone().shared()));
    }

    #[test]
    fn records_and_resets() {
        let mock = MockSubscriber::new("m");
        let desc = EventKind::ErrorInfo.descriptor();
        let args = vec![EventArg::from(ErrorInfo::new(ErrorLevel::Warning, "w"))];

        mock.shared()
            .on_event(&FixedParser::new(), &Event::new(&desc, &args))
            .unwrap();

        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.events()[0].category, "ErrorInfo");
        assert_eq!(mock.errors()[0].message, "w");

        mock.reset();
        assert_eq!(mock.call_count(), 0);
        assert!(mock.last_args().is_none());
    }

    #[test]
    fn failing_mock_returns_error() {
        let mock = MockSubscriber::failing("f", "nope");
        let desc = EventKind::PingSent.descriptor();
        let err = mock
            .shared()
            .on_event(&FixedParser::new(), &Event::new(&desc, &[]))
            .unwrap_err();
        assert_eq!(err, SubscriberError::Failed("nope".into()));
        assert_eq!(mock.call_count(), 1);
    }
}
