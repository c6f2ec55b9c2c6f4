//! Event category catalog for parley.
//!
//! This crate describes *what* can be dispatched: the categories, the
//! shape of their arguments, and the argument values themselves.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Foundation Layer                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  parley-types    : CaseMapping, Parser, entities            │
//! │  parley-event    : EventKind catalog, shapes, EventArg ◄HERE│
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  parley-dispatch : Dispatcher, DispatchHub, synthesizer     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Core Concepts
//!
//! ## Categories
//!
//! A [`CategoryDescriptor`] names a category and lists its parameters in
//! order. Each [`ParamDescriptor`] carries a [`ParamKind`] and a
//! [`ParamRole`]:
//!
//! - `Plain` arguments are passed through.
//! - `Source` arguments feed placeholder synthesis.
//! - `Fakeable` arguments may arrive absent and be synthesized.
//!
//! A category is *specific* when it designates a target parameter;
//! subscribers may then filter deliveries to a single channel or nick.
//!
//! ## Built-in catalog
//!
//! [`EventKind`] enumerates the 61 categories a connection produces.
//! [`EventTypeRegistry::builtin`] registers all of them. Extension
//! categories are built with [`CategoryDescriptor::builder`].
//!
//! ## Arguments
//!
//! [`EventArg`] is one argument value; [`EventArg::Absent`] is the null
//! slot. Subscribers see a notification as an [`Event`], which reads
//! arguments by parameter name.
//!
//! # Example
//!
//! ```
//! use parley_event::{EventKind, EventTypeRegistry};
//!
//! let registry = EventTypeRegistry::builtin();
//! let kick = registry.lookup("channelkick").unwrap();
//!
//! assert_eq!(kick.name(), EventKind::ChannelKick.as_str());
//! assert!(kick.is_specific());
//! ```

mod arg;
mod category;
mod error;
mod kind;
mod param;
mod registry;

pub use arg::{check_args, Event, EventArg};
pub use category::{category_key, CategoryBuilder, CategoryDescriptor};
pub use error::EventError;
pub use kind::EventKind;
pub use param::{ParamDescriptor, ParamKind, ParamRole};
pub use registry::EventTypeRegistry;
