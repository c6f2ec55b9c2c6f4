//! Parameter descriptors.
//!
//! A category's contract shape is an ordered list of [`ParamDescriptor`]s.
//! Each names the argument, declares what [`ParamKind`] of value it holds,
//! and tags its [`ParamRole`]:
//!
//! ```text
//! ChannelKick
//!   channel         Channel        source
//!   kicked_client   ChannelClient  plain
//!   kicked_by       ChannelClient  fakeable   ← may be synthesized
//!   reason          Text           plain
//!   kicked_by_host  Host           source     ← feeds the synthesizer
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of value an argument slot holds.
///
/// `Host` and `Target` are carried as text but are distinct kinds so the
/// synthesizer can tell a `nick!ident@host` source apart from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// A [`ChannelInfo`](parley_types::ChannelInfo).
    Channel,
    /// A [`ChannelClientInfo`](parley_types::ChannelClientInfo).
    ChannelClient,
    /// A [`ClientInfo`](parley_types::ClientInfo).
    Client,
    /// A raw `nick!ident@host` source or bare server name.
    Host,
    /// A raw message target (nickname or channel name).
    Target,
    /// Free text.
    Text,
    /// An integer.
    Number,
    /// A boolean.
    Flag,
    /// A list of protocol tokens.
    Tokens,
    /// An [`ErrorInfo`](parley_types::ErrorInfo).
    Error,
}

impl ParamKind {
    /// Lower-case label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::ChannelClient => "channel_client",
            Self::Client => "client",
            Self::Host => "host",
            Self::Target => "target",
            Self::Text => "text",
            Self::Number => "number",
            Self::Flag => "flag",
            Self::Tokens => "tokens",
            Self::Error => "error",
        }
    }

    /// Returns `true` if a value of this kind can serve as a dispatch target.
    #[must_use]
    pub fn is_targetable(self) -> bool {
        matches!(
            self,
            Self::Channel | Self::ChannelClient | Self::Client | Self::Host | Self::Target | Self::Text
        )
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the dispatch engine treats an argument slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRole {
    /// Passed through untouched.
    #[default]
    Plain,
    /// Available as raw material when synthesizing placeholders.
    Source,
    /// May be absent on the wire; a placeholder is built when derivable.
    Fakeable,
}

/// One argument slot of a category's contract shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Slot name, unique within the category.
    pub name: String,
    /// Kind of value the slot holds.
    pub kind: ParamKind,
    /// Role of the slot.
    #[serde(default)]
    pub role: ParamRole,
}

impl ParamDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParamKind, role: ParamRole) -> Self {
        Self {
            name: name.into(),
            kind,
            role,
        }
    }

    /// Creates a [`ParamRole::Plain`] descriptor.
    #[must_use]
    pub fn plain(name: impl Into<String>, kind: ParamKind) -> Self {
        Self::new(name, kind, ParamRole::Plain)
    }

    /// Creates a [`ParamRole::Source`] descriptor.
    #[must_use]
    pub fn source(name: impl Into<String>, kind: ParamKind) -> Self {
        Self::new(name, kind, ParamRole::Source)
    }

    /// Creates a [`ParamRole::Fakeable`] descriptor.
    #[must_use]
    pub fn fakeable(name: impl Into<String>, kind: ParamKind) -> Self {
        Self::new(name, kind, ParamRole::Fakeable)
    }

    /// Returns `true` for source-tagged slots.
    #[must_use]
    pub fn is_source(&self) -> bool {
        self.role == ParamRole::Source
    }

    /// Returns `true` for fakeable slots.
    #[must_use]
    pub fn is_fakeable(&self) -> bool {
        self.role == ParamRole::Fakeable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_helpers() {
        let p = ParamDescriptor::source("channel", ParamKind::Channel);
        assert!(p.is_source());
        assert!(!p.is_fakeable());

        let f = ParamDescriptor::fakeable("kicked_by", ParamKind::ChannelClient);
        assert!(f.is_fakeable());
        assert!(!f.is_source());

        let plain = ParamDescriptor::plain("reason", ParamKind::Text);
        assert_eq!(plain.role, ParamRole::Plain);
    }

    #[test]
    fn targetable_kinds() {
        assert!(ParamKind::Channel.is_targetable());
        assert!(ParamKind::Host.is_targetable());
        assert!(!ParamKind::Number.is_targetable());
        assert!(!ParamKind::Error.is_targetable());
    }

    #[test]
    fn serde_defaults_role_to_plain() {
        let p: ParamDescriptor =
            serde_json::from_str(r#"{"name":"reason","kind":"text"}"#).unwrap();
        assert_eq!(p, ParamDescriptor::plain("reason", ParamKind::Text));

        let json = serde_json::to_string(&ParamDescriptor::fakeable("c", ParamKind::ChannelClient))
            .unwrap();
        assert!(json.contains("\"channel_client\""));
        assert!(json.contains("\"fakeable\""));
    }
}
