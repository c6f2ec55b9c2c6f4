//! The per-connection dispatch façade.
//!
//! A [`DispatchHub`] owns one [`Dispatcher`] per category. The
//! connection that creates it owns it; there is no global instance.
//!
//! # Concurrency
//!
//! The category map sits behind a `parking_lot::RwLock`. `notify` holds
//! the read lock only long enough to clone the dispatcher's `Arc`, so a
//! subscriber may freely subscribe, unsubscribe or add categories while
//! being called.
//!
//! # Error sink
//!
//! The `ErrorInfo` category is reserved. Every dispatcher the hub
//! creates reports subscriber failures and malformed notifications
//! there, and it cannot be removed.

use crate::config::{ConfigError, DispatchConfig};
use crate::dispatcher::Dispatcher;
use crate::subscriber::SubscriberRef;
use crate::subscribers::ErrorLogger;
use crate::synth::{FakeSynthesizer, RecipeBook};
use crate::DispatchError;
use parking_lot::RwLock;
use parley_event::{category_key, CategoryDescriptor, EventArg, EventKind, EventTypeRegistry};
use parley_types::{ErrorCode, ErrorInfo, ErrorLevel, Parser};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Owner of every category dispatcher of one connection.
pub struct DispatchHub {
    dispatchers: RwLock<HashMap<String, Arc<Dispatcher>>>,
    error_sink: Arc<Dispatcher>,
    synthesizer: Option<Arc<FakeSynthesizer>>,
    catch_panics: bool,
}

impl Default for DispatchHub {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchHub {
    /// Creates a hub for the built-in catalog with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::build(
            &EventTypeRegistry::builtin(),
            &DispatchConfig::default(),
            RecipeBook::standard(),
        )
    }

    /// Creates a hub for `registry` with default settings.
    ///
    /// The error sink is always present, even if `registry` lacks it.
    #[must_use]
    pub fn with_registry(registry: &EventTypeRegistry) -> Self {
        Self::build(registry, &DispatchConfig::default(), RecipeBook::standard())
    }

    /// Creates a hub for the built-in catalog plus the categories
    /// declared in `config`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidCategory`] if a declared
    /// category is invalid or collides with an existing name.
    pub fn from_config(config: &DispatchConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_recipes(config, RecipeBook::standard())
    }

    /// Like [`DispatchHub::from_config`], synthesizing placeholders from
    /// `recipes` instead of [`RecipeBook::standard`].
    ///
    /// Extension categories with fakeable slots of their own use this to
    /// supply the recipes those slots need.
    ///
    /// # Errors
    ///
    /// See [`DispatchHub::from_config`].
    pub fn from_config_with_recipes(
        config: &DispatchConfig,
        recipes: RecipeBook,
    ) -> Result<Self, ConfigError> {
        let mut registry = EventTypeRegistry::builtin();
        for def in &config.categories {
            let desc = def.validate()?;
            registry
                .try_register(desc)
                .map_err(|source| ConfigError::InvalidCategory {
                    name: def.name.clone(),
                    source,
                })?;
        }
        Ok(Self::build(&registry, config, recipes))
    }

    fn build(registry: &EventTypeRegistry, config: &DispatchConfig, recipes: RecipeBook) -> Self {
        let sink_desc = registry
            .lookup(EventKind::ERROR_SINK.as_str())
            .unwrap_or_else(|_| Arc::new(EventKind::ERROR_SINK.descriptor()));
        let error_sink = Arc::new(Dispatcher::new(sink_desc).catch_panics(config.catch_panics));

        let synthesizer = config.synthesize.then(|| {
            Arc::new(
                FakeSynthesizer::new(recipes)
                    .with_max_depth(config.max_synthesis_depth)
                    .with_catch_panics(config.catch_panics),
            )
        });

        let hub = Self {
            dispatchers: RwLock::new(HashMap::new()),
            error_sink,
            synthesizer,
            catch_panics: config.catch_panics,
        };

        {
            let mut map = hub.dispatchers.write();
            map.insert(
                hub.error_sink.category().key(),
                Arc::clone(&hub.error_sink),
            );
            for desc in registry.iter() {
                let key = desc.key();
                if !map.contains_key(&key) {
                    map.insert(key, Arc::new(hub.make_dispatcher(Arc::clone(desc))));
                }
            }
        }

        if config.log_errors {
            hub.error_sink.subscribe(Arc::new(ErrorLogger));
        }

        info!(
            categories = hub.len(),
            synthesize = hub.synthesizer.is_some(),
            "dispatch hub ready"
        );
        hub
    }

    fn make_dispatcher(&self, category: Arc<CategoryDescriptor>) -> Dispatcher {
        let dispatcher = Dispatcher::new(category)
            .with_error_sink(Arc::clone(&self.error_sink))
            .catch_panics(self.catch_panics);
        match &self.synthesizer {
            Some(synth) => dispatcher.with_synthesizer(Arc::clone(synth)),
            None => dispatcher,
        }
    }

    // === Category management ===

    /// Adds a category.
    ///
    /// Returns `false` and changes nothing if the name is taken
    /// (ignoring case).
    pub fn add_category(&self, category: CategoryDescriptor) -> bool {
        let key = category.key();
        let name = category.name().to_string();
        let mut map = self.dispatchers.write();
        if map.contains_key(&key) {
            debug!(category = %name, "category already registered");
            return false;
        }
        map.insert(key, Arc::new(self.make_dispatcher(Arc::new(category))));
        debug!(category = %name, "category added");
        true
    }

    /// Removes a category and all of its subscriptions.
    ///
    /// Returns `false` if no such category exists.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ReservedCategory`] for the error sink.
    pub fn remove_category(&self, name: &str) -> Result<bool, DispatchError> {
        let key = category_key(name);
        if key == self.error_sink.category().key() {
            return Err(DispatchError::ReservedCategory(name.to_string()));
        }
        let removed = self.dispatchers.write().remove(&key);
        if let Some(d) = &removed {
            d.clear();
            debug!(category = %d.name(), "category removed");
        }
        Ok(removed.is_some())
    }

    /// The dispatcher for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::CategoryNotFound`] if absent.
    pub fn category(&self, name: &str) -> Result<Arc<Dispatcher>, DispatchError> {
        self.dispatchers
            .read()
            .get(&category_key(name))
            .cloned()
            .ok_or_else(|| DispatchError::CategoryNotFound(name.to_string()))
    }

    /// Returns `true` if `name` is a known category.
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.dispatchers.read().contains_key(&category_key(name))
    }

    /// Names of every category, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .dispatchers
            .read()
            .values()
            .map(|d| d.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dispatchers.read().len()
    }

    /// Always `false`: the error sink is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dispatchers.read().is_empty()
    }

    /// The reserved error sink dispatcher.
    #[must_use]
    pub fn error_sink(&self) -> &Arc<Dispatcher> {
        &self.error_sink
    }

    fn all_dispatchers(&self) -> Vec<Arc<Dispatcher>> {
        self.dispatchers.read().values().cloned().collect()
    }

    // === Subscription ===

    /// Subscribes to every notification of `category`.
    ///
    /// Subscribing an existing subscriber again clears its target.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::CategoryNotFound`] if absent.
    pub fn subscribe(&self, category: &str, subscriber: SubscriberRef) -> Result<(), DispatchError> {
        self.category(category)?.subscribe(subscriber);
        Ok(())
    }

    /// Subscribes to notifications of `category` whose target matches
    /// `target` under the connection's casemapping.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::CategoryNotFound`] if absent, or
    /// [`DispatchError::NotSpecific`] if the category has no target.
    pub fn subscribe_targeted(
        &self,
        category: &str,
        subscriber: SubscriberRef,
        target: &str,
    ) -> Result<(), DispatchError> {
        self.category(category)?
            .subscribe_targeted(subscriber, target)
            .map(|_| ())
    }

    /// Like [`DispatchHub::subscribe`], but reports failure as `false`.
    ///
    /// For optional consumers that should still work on hubs lacking an
    /// extension category.
    pub fn subscribe_best_effort(&self, category: &str, subscriber: SubscriberRef) -> bool {
        match self.subscribe(category, subscriber) {
            Ok(()) => true,
            Err(e) => {
                debug!(category = %category, error = %e, "best-effort subscribe skipped");
                false
            }
        }
    }

    /// Like [`DispatchHub::subscribe_targeted`], but reports failure as
    /// `false`.
    pub fn subscribe_targeted_best_effort(
        &self,
        category: &str,
        subscriber: SubscriberRef,
        target: &str,
    ) -> bool {
        match self.subscribe_targeted(category, subscriber, target) {
            Ok(()) => true,
            Err(e) => {
                debug!(category = %category, error = %e, "best-effort subscribe skipped");
                false
            }
        }
    }

    /// Removes `subscriber` from `category`.
    ///
    /// Returns whether it was subscribed.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::CategoryNotFound`] if absent.
    pub fn unsubscribe(&self, category: &str, subscriber: &SubscriberRef) -> Result<bool, DispatchError> {
        Ok(self.category(category)?.unsubscribe(subscriber))
    }

    /// Removes `subscriber` from every category.
    ///
    /// Returns how many subscriptions were removed.
    pub fn unsubscribe_all(&self, subscriber: &SubscriberRef) -> usize {
        let removed = self
            .all_dispatchers()
            .iter()
            .filter(|d| d.unsubscribe(subscriber))
            .count();
        debug!(subscriber = %subscriber.name(), removed, "unsubscribed everywhere");
        removed
    }

    /// Subscribes `subscriber` globally to every category.
    ///
    /// Returns how many subscriptions were newly created.
    pub fn subscribe_all(&self, subscriber: &SubscriberRef) -> usize {
        let added = self
            .all_dispatchers()
            .iter()
            .filter(|d| d.subscribe(Arc::clone(subscriber)))
            .count();
        debug!(subscriber = %subscriber.name(), added, "subscribed everywhere");
        added
    }

    /// Drops every subscription in every category.
    ///
    /// Categories stay registered. Returns how many subscriptions were
    /// dropped.
    pub fn clear(&self) -> usize {
        let dropped: usize = self.all_dispatchers().iter().map(|d| d.clear()).sum();
        debug!(dropped, "hub cleared");
        dropped
    }

    // === Notification ===

    /// Delivers a notification to `category`.
    ///
    /// Never fails: an unknown category or malformed arguments are
    /// reported to the error sink. Returns `true` if at least one
    /// subscriber was invoked.
    pub fn notify(&self, category: &str, parser: &dyn Parser, args: Vec<EventArg>) -> bool {
        match self.category(category) {
            Ok(dispatcher) => dispatcher.notify(parser, args),
            Err(e) => {
                self.report_error(
                    parser,
                    None,
                    category,
                    ErrorInfo::new(ErrorLevel::Error, "notification for unknown category")
                        .with_cause(&e)
                        .with_code(e.code()),
                );
                false
            }
        }
    }

    /// Delivers a notification for a built-in category.
    pub fn notify_kind(&self, kind: EventKind, parser: &dyn Parser, args: Vec<EventArg>) -> bool {
        self.notify(kind.as_str(), parser, args)
    }

    /// Sends a failure record to the error sink.
    ///
    /// `context_line` is the raw protocol line being processed; when
    /// `None`, the parser's last line is used. `category` names the
    /// category involved. Returns whether any sink subscriber ran.
    pub fn report_error(
        &self,
        parser: &dyn Parser,
        context_line: Option<&str>,
        category: &str,
        failure: ErrorInfo,
    ) -> bool {
        let line = context_line.map(str::to_string).or_else(|| parser.last_line());
        let info = failure.with_category(category).with_last_line(line);
        self.error_sink.notify(parser, vec![EventArg::from(info)])
    }

    /// Sends a `DebugInfo` notification.
    pub fn report_debug(&self, parser: &dyn Parser, level: i64, data: impl Into<String>) -> bool {
        self.notify_kind(
            EventKind::DebugInfo,
            parser,
            vec![EventArg::from(level), EventArg::from(data.into())],
        )
    }
}

impl std::fmt::Debug for DispatchHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchHub")
            .field("categories", &self.len())
            .field("synthesize", &self.synthesizer.is_some())
            .field("catch_panics", &self.catch_panics)
            .finish()
    }
}
