//! Synchronous event dispatch for one IRC connection.
//!
//! The connection's read loop turns wire lines into [`DispatchHub::notify`]
//! calls. Channel models, query windows and command routers subscribe to
//! the categories they care about, optionally filtered to one target.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Foundation Layer                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  parley-types    : CaseMapping, Parser, entities            │
//! │  parley-event    : EventKind catalog, shapes, EventArg      │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Layer                 ◄── HERE   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  parley-dispatch : Dispatcher, DispatchHub, synthesizer     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Core Concepts
//!
//! ## Hub and dispatchers
//!
//! [`DispatchHub`] owns one [`Dispatcher`] per category and is the only
//! type producers and consumers normally touch. Strict calls return
//! [`DispatchError::CategoryNotFound`] for unknown categories; the
//! `*_best_effort` variants return `false` instead.
//!
//! ## Delivery
//!
//! `notify` is synchronous. It works on a snapshot of the subscriber
//! list, invokes subscribers in subscription order, and returns whether
//! any subscriber ran. Nothing a subscriber does can make it fail.
//!
//! ## Error sink
//!
//! The reserved `ErrorInfo` category receives an
//! [`ErrorInfo`](parley_types::ErrorInfo) for every subscriber failure,
//! caught panic, malformed notification or unknown category. A failure
//! inside the sink itself is logged and dropped.
//!
//! ## Placeholder synthesis
//!
//! Before delivery, absent fakeable arguments are rebuilt from the
//! call's source arguments by a [`FakeSynthesizer`] walking a
//! [`RecipeBook`]. Placeholders are flagged synthetic.
//!
//! # Example
//!
//! ```
//! use parley_dispatch::{subscriber_fn, DispatchHub};
//! use parley_event::{EventArg, EventKind};
//! use parley_types::{ChannelClientInfo, ChannelInfo, ClientInfo, FixedParser};
//! use std::sync::{Arc, Mutex};
//!
//! let hub = DispatchHub::new();
//! let kicker = Arc::new(Mutex::new(None));
//! let seen = Arc::clone(&kicker);
//! hub.subscribe_targeted(
//!     "ChannelKick",
//!     subscriber_fn("chan-window", move |_parser, event| {
//!         *seen.lock().unwrap() = event.channel_client("kicked_by").cloned();
//!         Ok(())
//!     }),
//!     "#Rust",
//! )
//! .unwrap();
//!
//! let victim = ChannelClientInfo::new(Arc::new(ClientInfo::new("troll")), "#rust");
//! let delivered = hub.notify_kind(
//!     EventKind::ChannelKick,
//!     &FixedParser::new(),
//!     vec![
//!         ChannelInfo::new("#rust").into(),
//!         victim.into(),
//!         EventArg::Absent,
//!         "spam".into(),
//!         "irc.example.net".into(),
//!     ],
//! );
//! assert!(delivered);
//!
//! let kicker = kicker.lock().unwrap().take().expect("kicker synthesized");
//! assert!(kicker.is_synthetic());
//! assert_eq!(kicker.nickname(), "irc.example.net");
//! ```

mod config;
mod dispatcher;
mod error;
mod hub;
mod subscriber;
mod subscribers;
mod synth;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::{
    CategoryDef, ConfigError, DispatchConfig, ENV_CATCH_PANICS, ENV_LOG_ERRORS,
    ENV_MAX_SYNTHESIS_DEPTH, ENV_SYNTHESIZE,
};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, SubscriberError, SynthesisError};
pub use hub::DispatchHub;
pub use subscriber::{same_subscriber, subscriber_fn, FnSubscriber, Subscriber, SubscriberRef};
pub use subscribers::{ErrorLogger, EventTracer};
pub use synth::{FakeSynthesizer, Recipe, RecipeBook, DEFAULT_MAX_DEPTH};
