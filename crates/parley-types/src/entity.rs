//! Protocol entities carried as event arguments.
//!
//! These are the thin, immutable views the connection layer hands to
//! subscribers. The full channel/user model lives with the connection;
//! the dispatch engine only needs enough to compare names and to build
//! placeholders when the wire under-supplies an argument.
//!
//! Every entity carries a `synthetic` flag. It is `false` for values the
//! protocol layer built from real server data and `true` for placeholders
//! built by the synthesizer.

use crate::TypesError;
use std::fmt;
use std::sync::Arc;

/// Prefix characters that introduce a channel name.
pub const CHANNEL_PREFIXES: &[char] = &['#', '&', '!', '+'];

/// A channel the client knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    name: String,
    synthetic: bool,
}

impl ChannelInfo {
    /// Creates a channel view without validating the name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            synthetic: false,
        }
    }

    /// Creates a channel view, rejecting names without a channel prefix.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidChannelName`] for empty names and
    /// names that do not start with one of [`CHANNEL_PREFIXES`].
    pub fn try_new(name: impl Into<String>) -> Result<Self, TypesError> {
        let name = name.into();
        if !is_channel_name(&name) {
            return Err(TypesError::InvalidChannelName(name));
        }
        Ok(Self::new(name))
    }

    /// Channel name as received from the server.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this is a placeholder.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Marks this value as a placeholder.
    #[must_use]
    pub fn into_synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

impl fmt::Display for ChannelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Returns `true` if `name` looks like a channel name.
#[must_use]
pub fn is_channel_name(name: &str) -> bool {
    name.len() > 1 && name.starts_with(CHANNEL_PREFIXES)
}

/// A user on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    nickname: String,
    ident: Option<String>,
    host: Option<String>,
    synthetic: bool,
}

impl ClientInfo {
    /// Creates a client known only by nickname.
    #[must_use]
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            ident: None,
            host: None,
            synthetic: false,
        }
    }

    /// Builds a client from a `nick!ident@host` source.
    ///
    /// Partial sources are accepted: `nick`, `nick@host` and a bare
    /// server name all yield a client whose nickname is the part before
    /// the first `!` or `@`. A leading `:` is ignored.
    #[must_use]
    pub fn from_host(source: &str) -> Self {
        let source = source.strip_prefix(':').unwrap_or(source);
        let (before_at, host) = match source.split_once('@') {
            Some((left, host)) => (left, Some(host.to_string())),
            None => (source, None),
        };
        let (nickname, ident) = match before_at.split_once('!') {
            Some((nick, ident)) => (nick, Some(ident.to_string())),
            None => (before_at, None),
        };

        Self {
            nickname: nickname.to_string(),
            ident,
            host,
            synthetic: false,
        }
    }

    /// Extracts the nickname from a `nick!ident@host` source.
    #[must_use]
    pub fn parse_host(source: &str) -> &str {
        let source = source.strip_prefix(':').unwrap_or(source);
        let end = source.find(['!', '@']).unwrap_or(source.len());
        &source[..end]
    }

    /// Nickname.
    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Ident (user) part of the source, when known.
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    /// Host part of the source, when known.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns `true` if this is a placeholder.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Marks this value as a placeholder.
    #[must_use]
    pub fn into_synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

impl fmt::Display for ClientInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nickname)?;
        if let Some(ident) = &self.ident {
            write!(f, "!{ident}")?;
        }
        if let Some(host) = &self.host {
            write!(f, "@{host}")?;
        }
        Ok(())
    }
}

/// A user's membership in one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelClientInfo {
    client: Arc<ClientInfo>,
    channel: String,
    prefixes: String,
    synthetic: bool,
}

impl ChannelClientInfo {
    /// Creates a membership with no channel prefixes (`@`, `+`, ...).
    #[must_use]
    pub fn new(client: Arc<ClientInfo>, channel: impl Into<String>) -> Self {
        Self {
            client,
            channel: channel.into(),
            prefixes: String::new(),
            synthetic: false,
        }
    }

    /// Sets the channel prefix characters, e.g. `"@+"`.
    #[must_use]
    pub fn with_prefixes(mut self, prefixes: impl Into<String>) -> Self {
        self.prefixes = prefixes.into();
        self
    }

    /// The user behind this membership.
    #[must_use]
    pub fn client(&self) -> &Arc<ClientInfo> {
        &self.client
    }

    /// Shorthand for `client().nickname()`.
    #[must_use]
    pub fn nickname(&self) -> &str {
        self.client.nickname()
    }

    /// Name of the channel this membership belongs to.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Channel prefix characters, highest first.
    #[must_use]
    pub fn prefixes(&self) -> &str {
        &self.prefixes
    }

    /// Returns `true` if this is a placeholder.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Marks this value as a placeholder.
    #[must_use]
    pub fn into_synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

impl fmt::Display for ChannelClientInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefixes, self.client.nickname())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ChannelInfo ─────────────────────────────────────────

    #[test]
    fn channel_try_new_accepts_prefixed_names() {
        for name in ["#rust", "&local", "!ABCDEsafe", "+modeless"] {
            let chan = ChannelInfo::try_new(name).unwrap();
            assert_eq!(chan.name(), name);
            assert!(!chan.is_synthetic());
        }
    }

    #[test]
    fn channel_try_new_rejects_non_channels() {
        for name in ["", "#", "nick", "server.example.org"] {
            assert!(matches!(
                ChannelInfo::try_new(name),
                Err(TypesError::InvalidChannelName(_))
            ));
        }
    }

    #[test]
    fn channel_into_synthetic() {
        let chan = ChannelInfo::new("#a").into_synthetic();
        assert!(chan.is_synthetic());
        assert_eq!(chan.to_string(), "#a");
    }

    // ── ClientInfo ──────────────────────────────────────────

    #[test]
    fn from_host_full_source() {
        let client = ClientInfo::from_host(":alice!al@host.example");
        assert_eq!(client.nickname(), "alice");
        assert_eq!(client.ident(), Some("al"));
        assert_eq!(client.host(), Some("host.example"));
        assert_eq!(client.to_string(), "alice!al@host.example");
    }

    #[test]
    fn from_host_server_name() {
        let client = ClientInfo::from_host("irc.example.net");
        assert_eq!(client.nickname(), "irc.example.net");
        assert_eq!(client.ident(), None);
        assert_eq!(client.host(), None);
    }

    #[test]
    fn from_host_nick_at_host() {
        let client = ClientInfo::from_host("bob@example.com");
        assert_eq!(client.nickname(), "bob");
        assert_eq!(client.ident(), None);
        assert_eq!(client.host(), Some("example.com"));
    }

    #[test]
    fn parse_host_variants() {
        assert_eq!(ClientInfo::parse_host("nick!user@host"), "nick");
        assert_eq!(ClientInfo::parse_host(":nick!user@host"), "nick");
        assert_eq!(ClientInfo::parse_host("nick@host"), "nick");
        assert_eq!(ClientInfo::parse_host("serverhost"), "serverhost");
        assert_eq!(ClientInfo::parse_host(""), "");
    }

    // ── ChannelClientInfo ───────────────────────────────────

    #[test]
    fn channel_client_accessors() {
        let client = Arc::new(ClientInfo::new("carol"));
        let member = ChannelClientInfo::new(Arc::clone(&client), "#chan").with_prefixes("@+");
        assert_eq!(member.nickname(), "carol");
        assert_eq!(member.channel(), "#chan");
        assert_eq!(member.prefixes(), "@+");
        assert_eq!(member.to_string(), "@+carol");
        assert!(Arc::ptr_eq(member.client(), &client));
        assert!(!member.is_synthetic());
        assert!(member.into_synthetic().is_synthetic());
    }
}
