//! Per-category fan-out.
//!
//! A [`Dispatcher`] owns the subscriber list of one category. The list
//! is copy-on-write: `notify` clones the current `Arc` under a short
//! read lock and iterates that snapshot, so subscribers added or removed
//! during delivery (including by the subscribers themselves) only affect
//! later notifications.
//!
//! # Specific categories
//!
//! When the category designates a target parameter, each subscription
//! may carry a target string. A targeted subscriber is only invoked when
//! the event's target equals its string under the connection's
//! casemapping. Subscribing again without a target clears it.

use crate::error::panic_message;
use crate::subscriber::{same_subscriber, SubscriberRef};
use crate::synth::FakeSynthesizer;
use crate::{DispatchError, SubscriberError};
use parking_lot::RwLock;
use parley_event::{check_args, CategoryDescriptor, Event, EventArg};
use parley_types::{ErrorCode, ErrorInfo, ErrorLevel, Parser};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
struct Subscription {
    subscriber: SubscriberRef,
    target: Option<String>,
}

/// Subscriber list and delivery for one event category.
pub struct Dispatcher {
    category: Arc<CategoryDescriptor>,
    entries: RwLock<Arc<Vec<Subscription>>>,
    error_sink: Option<Arc<Dispatcher>>,
    synthesizer: Option<Arc<FakeSynthesizer>>,
    catch_panics: bool,
}

impl Dispatcher {
    /// Creates a dispatcher with no error sink and no synthesizer.
    ///
    /// Failures are logged and dropped until a sink is attached with
    /// [`Dispatcher::with_error_sink`].
    #[must_use]
    pub fn new(category: Arc<CategoryDescriptor>) -> Self {
        Self {
            category,
            entries: RwLock::new(Arc::new(Vec::new())),
            error_sink: None,
            synthesizer: None,
            catch_panics: true,
        }
    }

    /// Routes subscriber failures to `sink`.
    #[must_use]
    pub fn with_error_sink(mut self, sink: Arc<Dispatcher>) -> Self {
        self.error_sink = Some(sink);
        self
    }

    /// Fills fakeable slots with `synthesizer` before delivery.
    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: Arc<FakeSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Whether a panicking subscriber is caught and reported.
    ///
    /// When disabled, a panic unwinds into the producer.
    #[must_use]
    pub fn catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }

    /// The category this dispatcher serves.
    #[must_use]
    pub fn category(&self) -> &Arc<CategoryDescriptor> {
        &self.category
    }

    /// Shorthand for `category().name()`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.category.name()
    }

    /// Returns `true` if subscriptions may carry a target.
    #[must_use]
    pub fn is_specific(&self) -> bool {
        self.category.is_specific()
    }

    /// Adds a global subscription.
    ///
    /// Idempotent by identity. An existing subscription keeps its
    /// position but loses any target. Returns `true` if the subscriber
    /// was not already present.
    pub fn subscribe(&self, subscriber: SubscriberRef) -> bool {
        self.upsert(subscriber, None)
    }

    /// Adds a subscription filtered to `target`.
    ///
    /// A blank target is the same as [`Dispatcher::subscribe`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotSpecific`] if the category has no
    /// designated target.
    pub fn subscribe_targeted(
        &self,
        subscriber: SubscriberRef,
        target: &str,
    ) -> Result<bool, DispatchError> {
        if !self.is_specific() {
            return Err(DispatchError::NotSpecific(self.name().to_string()));
        }
        let target = target.trim();
        let target = (!target.is_empty()).then(|| target.to_string());
        Ok(self.upsert(subscriber, target))
    }

    fn upsert(&self, subscriber: SubscriberRef, target: Option<String>) -> bool {
        let name = subscriber.name().to_string();
        let added = {
            let mut guard = self.entries.write();
            let entries = Arc::make_mut(&mut *guard);
            match entries
                .iter_mut()
                .find(|e| same_subscriber(&e.subscriber, &subscriber))
            {
                Some(existing) => {
                    existing.target = target.clone();
                    false
                }
                None => {
                    entries.push(Subscription {
                        subscriber,
                        target: target.clone(),
                    });
                    true
                }
            }
        };

        debug!(
            category = %self.name(),
            subscriber = %name,
            filter = ?target,
            added,
            "subscribed"
        );
        added
    }

    /// Removes a subscriber and its target. Returns `true` if it was present.
    pub fn unsubscribe(&self, subscriber: &SubscriberRef) -> bool {
        let removed = {
            let mut guard = self.entries.write();
            let before = guard.len();
            if !guard.iter().any(|e| same_subscriber(&e.subscriber, subscriber)) {
                return false;
            }
            let entries = Arc::make_mut(&mut *guard);
            entries.retain(|e| !same_subscriber(&e.subscriber, subscriber));
            before != entries.len()
        };

        debug!(
            category = %self.name(),
            subscriber = %subscriber.name(),
            "unsubscribed"
        );
        removed
    }

    /// Removes every subscription. Returns how many there were.
    pub fn clear(&self) -> usize {
        let old = std::mem::take(&mut *self.entries.write());
        old.len()
    }

    /// Returns `true` if `subscriber` is subscribed.
    #[must_use]
    pub fn contains(&self, subscriber: &SubscriberRef) -> bool {
        self.entries
            .read()
            .iter()
            .any(|e| same_subscriber(&e.subscriber, subscriber))
    }

    /// The target `subscriber` is filtered to, if any.
    #[must_use]
    pub fn target_of(&self, subscriber: &SubscriberRef) -> Option<String> {
        self.entries
            .read()
            .iter()
            .find(|e| same_subscriber(&e.subscriber, subscriber))
            .and_then(|e| e.target.clone())
    }

    /// Number of subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Delivers one notification.
    ///
    /// Arguments must match the category's shape; a mismatch is reported
    /// to the error sink and nothing is delivered. Absent fakeable slots
    /// are synthesized where possible. Subscribers are invoked in
    /// subscription order; a failing subscriber is reported and skipped.
    ///
    /// Returns `true` if at least one subscriber was invoked, whether or
    /// not it succeeded.
    pub fn notify(&self, parser: &dyn Parser, mut args: Vec<EventArg>) -> bool {
        let snapshot = Arc::clone(&*self.entries.read());

        if let Err(e) = check_args(&self.category, &args) {
            self.report(
                parser,
                ErrorInfo::new(ErrorLevel::Error, "invalid notification")
                    .with_cause(&e)
                    .with_code(e.code()),
            );
            return false;
        }

        if snapshot.is_empty() {
            return false;
        }

        if let Some(synth) = &self.synthesizer {
            if self.category.has_fakeable() {
                let mut failures = Vec::new();
                synth.fill_reporting(&self.category, parser, &mut args, &mut |e| {
                    failures.push(e);
                });
                for e in failures {
                    self.report(
                        parser,
                        ErrorInfo::new(ErrorLevel::Warning, "placeholder recipe failed")
                            .with_cause(&e)
                            .with_code(e.code()),
                    );
                }
            }
        }

        let event = Event::new(&self.category, &args);
        let target = event.target();
        let casemapping = parser.casemapping();

        let mut invoked = 0usize;
        for entry in snapshot.iter() {
            if let Some(filter) = &entry.target {
                match &target {
                    Some(t) if casemapping.equals_ignore_case(filter, t) => {}
                    _ => continue,
                }
            }

            invoked += 1;
            if let Err(e) = self.invoke(&entry.subscriber, parser, &event) {
                self.report(
                    parser,
                    ErrorInfo::new(
                        ErrorLevel::Error,
                        format!("subscriber '{}' failed", entry.subscriber.name()),
                    )
                    .with_cause(&e)
                    .with_code(e.code()),
                );
            }
        }

        debug!(
            category = %self.name(),
            subscribers = snapshot.len(),
            invoked,
            "notified"
        );
        invoked > 0
    }

    fn invoke(
        &self,
        subscriber: &SubscriberRef,
        parser: &dyn Parser,
        event: &Event<'_>,
    ) -> Result<(), SubscriberError> {
        if !self.catch_panics {
            return subscriber.on_event(parser, event);
        }

        match catch_unwind(AssertUnwindSafe(|| subscriber.on_event(parser, event))) {
            Ok(result) => result,
            Err(payload) => Err(SubscriberError::Panicked(panic_message(&*payload))),
        }
    }

    /// Sends a failure record to the error sink.
    ///
    /// The record is stamped with this category and the parser's last
    /// line. Without a sink (a standalone dispatcher, or the sink
    /// itself) the failure is logged and dropped.
    pub(crate) fn report(&self, parser: &dyn Parser, info: ErrorInfo) {
        let info = info
            .with_category(self.name())
            .with_last_line(parser.last_line());

        match &self.error_sink {
            Some(sink) => {
                sink.notify(parser, vec![EventArg::from(info)]);
            }
            None => {
                warn!(
                    category = %self.name(),
                    error = %info,
                    "no error sink attached; dropping failure"
                );
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("category", &self.name())
            .field("subscribers", &self.len())
            .field("has_error_sink", &self.error_sink.is_some())
            .field("synthesize", &self.synthesizer.is_some())
            .finish()
    }
}
