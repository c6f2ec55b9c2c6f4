//! Event arguments and the read-only event view subscribers receive.

use crate::{CategoryDescriptor, EventError, ParamKind};
use parley_types::{ChannelClientInfo, ChannelInfo, ClientInfo, ErrorInfo};
use std::borrow::Cow;
use std::sync::Arc;

/// One argument of a notification.
///
/// [`EventArg::Absent`] is the null slot: the protocol did not supply a
/// value. Entities are reference counted so a subscriber may keep what it
/// receives, including synthesized placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventArg {
    /// No value.
    #[default]
    Absent,
    /// Text, host source or raw target.
    Text(String),
    /// Integer.
    Number(i64),
    /// Boolean.
    Flag(bool),
    /// Protocol tokens.
    Tokens(Vec<String>),
    /// Channel.
    Channel(Arc<ChannelInfo>),
    /// User.
    Client(Arc<ClientInfo>),
    /// Channel membership.
    ChannelClient(Arc<ChannelClientInfo>),
    /// Error record.
    Error(Arc<ErrorInfo>),
}

static ABSENT: EventArg = EventArg::Absent;

impl EventArg {
    /// Variant label used in diagnostics.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Flag(_) => "flag",
            Self::Tokens(_) => "tokens",
            Self::Channel(_) => "channel",
            Self::Client(_) => "client",
            Self::ChannelClient(_) => "channel_client",
            Self::Error(_) => "error",
        }
    }

    /// Returns `true` for the null slot.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` if this value may occupy a slot of `kind`.
    ///
    /// [`EventArg::Absent`] fits every kind.
    #[must_use]
    pub fn fits(&self, kind: ParamKind) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(_) => matches!(kind, ParamKind::Text | ParamKind::Host | ParamKind::Target),
            Self::Number(_) => kind == ParamKind::Number,
            Self::Flag(_) => kind == ParamKind::Flag,
            Self::Tokens(_) => kind == ParamKind::Tokens,
            Self::Channel(_) => kind == ParamKind::Channel,
            Self::Client(_) => kind == ParamKind::Client,
            Self::ChannelClient(_) => kind == ParamKind::ChannelClient,
            Self::Error(_) => kind == ParamKind::Error,
        }
    }

    /// Returns `true` if this is an entity placeholder.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        match self {
            Self::Channel(c) => c.is_synthetic(),
            Self::Client(c) => c.is_synthetic(),
            Self::ChannelClient(c) => c.is_synthetic(),
            _ => false,
        }
    }

    /// Marks an entity as a placeholder. Other values are returned as is.
    #[must_use]
    pub fn into_synthetic(self) -> Self {
        match self {
            Self::Channel(c) => Self::Channel(Arc::new((*c).clone().into_synthetic())),
            Self::Client(c) => Self::Client(Arc::new((*c).clone().into_synthetic())),
            Self::ChannelClient(c) => {
                Self::ChannelClient(Arc::new((*c).clone().into_synthetic()))
            }
            other => other,
        }
    }

    /// The string a specific subscription's filter is compared against.
    ///
    /// Channels match on name, users and memberships on nickname, host
    /// sources on the nickname parsed out of them, and text as is.
    #[must_use]
    pub fn target_key(&self, kind: ParamKind) -> Option<Cow<'_, str>> {
        match self {
            Self::Channel(c) => Some(Cow::Borrowed(c.name())),
            Self::Client(c) => Some(Cow::Borrowed(c.nickname())),
            Self::ChannelClient(c) => Some(Cow::Borrowed(c.nickname())),
            Self::Text(s) if kind == ParamKind::Host => Some(Cow::Borrowed(ClientInfo::parse_host(s))),
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
            _ => None,
        }
    }

    /// Text payload.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean payload.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Token payload.
    #[must_use]
    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            Self::Tokens(t) => Some(t),
            _ => None,
        }
    }

    /// Channel payload.
    #[must_use]
    pub fn as_channel(&self) -> Option<&Arc<ChannelInfo>> {
        match self {
            Self::Channel(c) => Some(c),
            _ => None,
        }
    }

    /// User payload.
    #[must_use]
    pub fn as_client(&self) -> Option<&Arc<ClientInfo>> {
        match self {
            Self::Client(c) => Some(c),
            _ => None,
        }
    }

    /// Membership payload.
    #[must_use]
    pub fn as_channel_client(&self) -> Option<&Arc<ChannelClientInfo>> {
        match self {
            Self::ChannelClient(c) => Some(c),
            _ => None,
        }
    }

    /// Error payload.
    #[must_use]
    pub fn as_error(&self) -> Option<&Arc<ErrorInfo>> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl From<&str> for EventArg {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for EventArg {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for EventArg {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for EventArg {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<Vec<String>> for EventArg {
    fn from(t: Vec<String>) -> Self {
        Self::Tokens(t)
    }
}

macro_rules! entity_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for EventArg {
            fn from(v: $ty) -> Self {
                Self::$variant(Arc::new(v))
            }
        }

        impl From<Arc<$ty>> for EventArg {
            fn from(v: Arc<$ty>) -> Self {
                Self::$variant(v)
            }
        }
    };
}

entity_from!(ChannelInfo, Channel);
entity_from!(ClientInfo, Client);
entity_from!(ChannelClientInfo, ChannelClient);
entity_from!(ErrorInfo, Error);

impl<T: Into<EventArg>> From<Option<T>> for EventArg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}

/// Checks a notification's arguments against a category's shape.
///
/// # Errors
///
/// Returns [`EventError::ArityMismatch`] or [`EventError::KindMismatch`].
pub fn check_args(category: &CategoryDescriptor, args: &[EventArg]) -> Result<(), EventError> {
    if args.len() != category.arity() {
        return Err(EventError::ArityMismatch {
            category: category.name().to_string(),
            expected: category.arity(),
            actual: args.len(),
        });
    }

    for (param, arg) in category.params().iter().zip(args) {
        if !arg.fits(param.kind) {
            return Err(EventError::KindMismatch {
                category: category.name().to_string(),
                param: param.name.clone(),
                expected: param.kind,
                actual: arg.variant_name(),
            });
        }
    }

    Ok(())
}

/// A delivered notification.
///
/// Subscribers read arguments by parameter name:
///
/// ```
/// use parley_event::{Event, EventArg, EventKind};
/// use parley_types::ChannelInfo;
///
/// let desc = EventKind::ChannelTopic.descriptor();
/// let args = vec![EventArg::from(ChannelInfo::new("#rust")), EventArg::from(true)];
/// let event = Event::new(&desc, &args);
///
/// assert_eq!(event.channel("channel").map(|c| c.name()), Some("#rust"));
/// assert_eq!(event.flag("is_join_topic"), Some(true));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    category: &'a CategoryDescriptor,
    args: &'a [EventArg],
}

impl<'a> Event<'a> {
    /// Creates a view over validated arguments.
    #[must_use]
    pub fn new(category: &'a CategoryDescriptor, args: &'a [EventArg]) -> Self {
        Self { category, args }
    }

    /// The category being delivered.
    #[must_use]
    pub fn category(&self) -> &'a CategoryDescriptor {
        self.category
    }

    /// Shorthand for `category().name()`.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.category.name()
    }

    /// All arguments, in declaration order.
    #[must_use]
    pub fn args(&self) -> &'a [EventArg] {
        self.args
    }

    /// Argument at `index`, or [`EventArg::Absent`] when out of range.
    #[must_use]
    pub fn arg(&self, index: usize) -> &'a EventArg {
        self.args.get(index).unwrap_or(&ABSENT)
    }

    /// Argument for the named parameter.
    #[must_use]
    pub fn get(&self, param: &str) -> Option<&'a EventArg> {
        self.category
            .param_index(param)
            .and_then(|i| self.args.get(i))
    }

    /// Text of the named parameter.
    #[must_use]
    pub fn text(&self, param: &str) -> Option<&'a str> {
        self.get(param).and_then(EventArg::as_text)
    }

    /// Integer of the named parameter.
    #[must_use]
    pub fn number(&self, param: &str) -> Option<i64> {
        self.get(param).and_then(EventArg::as_number)
    }

    /// Boolean of the named parameter.
    #[must_use]
    pub fn flag(&self, param: &str) -> Option<bool> {
        self.get(param).and_then(EventArg::as_flag)
    }

    /// Tokens of the named parameter.
    #[must_use]
    pub fn tokens(&self, param: &str) -> Option<&'a [String]> {
        self.get(param).and_then(EventArg::as_tokens)
    }

    /// Channel of the named parameter.
    #[must_use]
    pub fn channel(&self, param: &str) -> Option<&'a Arc<ChannelInfo>> {
        self.get(param).and_then(EventArg::as_channel)
    }

    /// User of the named parameter.
    #[must_use]
    pub fn client(&self, param: &str) -> Option<&'a Arc<ClientInfo>> {
        self.get(param).and_then(EventArg::as_client)
    }

    /// Membership of the named parameter.
    #[must_use]
    pub fn channel_client(&self, param: &str) -> Option<&'a Arc<ChannelClientInfo>> {
        self.get(param).and_then(EventArg::as_channel_client)
    }

    /// Error record of the named parameter.
    #[must_use]
    pub fn error(&self, param: &str) -> Option<&'a Arc<ErrorInfo>> {
        self.get(param).and_then(EventArg::as_error)
    }

    /// The designated target of a specific category.
    #[must_use]
    pub fn target(&self) -> Option<Cow<'a, str>> {
        let index = self.category.target_index()?;
        let kind = self.category.params()[index].kind;
        self.args.get(index)?.target_key(kind)
    }
}
