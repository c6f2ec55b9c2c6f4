//! Core types for parley.
//!
//! This crate provides the foundation values shared by the event catalog
//! and the dispatch engine.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Foundation Layer                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  parley-types    : CaseMapping, Parser, entities  ◄── HERE  │
//! │  parley-event    : EventKind catalog, shapes, EventArg      │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  parley-dispatch : Dispatcher, DispatchHub, synthesizer     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`CaseMapping`] - IRC case folding (`ascii`, `rfc1459`, `strict-rfc1459`)
//! - [`Parser`] - Context trait implemented by the protocol layer
//! - [`ChannelInfo`], [`ClientInfo`], [`ChannelClientInfo`] - Entities
//!   passed as event arguments, each with a `synthetic` flag
//! - [`ErrorInfo`] - Payload of the error sink
//! - [`ErrorCode`] - Machine-readable error code contract
//!
//! # Example
//!
//! ```
//! use parley_types::{CaseMapping, ClientInfo};
//!
//! let cm = CaseMapping::Rfc1459;
//! assert!(cm.equals_ignore_case("#Chan[1]", "#chan{1}"));
//!
//! let kicker = ClientInfo::from_host("op!op@example.org");
//! assert_eq!(kicker.nickname(), "op");
//! ```

mod casemapping;
mod entity;
mod error;
mod error_info;
mod parser;

pub use casemapping::CaseMapping;
pub use entity::{
    is_channel_name, ChannelClientInfo, ChannelInfo, ClientInfo, CHANNEL_PREFIXES,
};
pub use error::{assert_error_code, assert_error_codes, ErrorCode, TypesError};
pub use error_info::{ErrorInfo, ErrorLevel};
pub use parser::{FixedParser, Parser};
