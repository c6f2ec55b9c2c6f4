//! The built-in event catalog.
//!
//! Every protocol occurrence the connection layer reports has an
//! [`EventKind`]. Each kind knows its contract shape through
//! [`EventKind::descriptor`].
//!
//! Categories fall into three groups:
//!
//! - `Channel*` kinds are specific and target the `channel` parameter.
//! - `Private*` kinds are specific and target the sender's `host`, so a
//!   query window can subscribe to one nickname.
//! - Everything else is global.

use crate::{CategoryDescriptor, EventError, ParamDescriptor, ParamKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    // ── Channel ──────────────────────────────────────────────
    /// A user performed an action (`/me`) in a channel.
    ChannelAction,
    /// A channel member changed away state.
    ChannelAwayStateOther,
    /// A CTCP request was sent to a channel.
    ChannelCtcp,
    /// A CTCP reply was sent to a channel.
    ChannelCtcpReply,
    /// A list mode (bans, exceptions, ...) finished loading.
    ChannelGotListModes,
    /// The names list finished loading.
    ChannelGotNames,
    /// A user joined.
    ChannelJoin,
    /// A user was kicked.
    ChannelKick,
    /// A message was sent to a channel.
    ChannelMessage,
    /// Channel modes changed.
    ChannelModeChanged,
    /// A message was sent to members with a given prefix (`@#chan`).
    ChannelModeMessage,
    /// A notice was sent to members with a given prefix.
    ChannelModeNotice,
    /// A member changed nickname.
    ChannelNickChanged,
    /// Non-membership channel modes changed.
    ChannelNonUserModeChanged,
    /// A notice was sent to a channel.
    ChannelNotice,
    /// A user left.
    ChannelPart,
    /// A member quit the network.
    ChannelQuit,
    /// The local user joined.
    ChannelSelfJoin,
    /// One channel mode changed.
    ChannelSingleModeChanged,
    /// The topic changed or was received on join.
    ChannelTopic,
    /// A member's prefix modes changed.
    ChannelUserModeChanged,

    // ── Private ──────────────────────────────────────────────
    /// A user sent us an action.
    PrivateAction,
    /// A user sent us a CTCP request.
    PrivateCtcp,
    /// A user sent us a CTCP reply.
    PrivateCtcpReply,
    /// A user sent us a message.
    PrivateMessage,
    /// A user sent us a notice.
    PrivateNotice,

    // ── Unknown target ───────────────────────────────────────
    /// An action addressed to neither us nor a known channel.
    UnknownAction,
    /// A CTCP request addressed to an unknown target.
    UnknownCtcp,
    /// A CTCP reply addressed to an unknown target.
    UnknownCtcpReply,
    /// A message addressed to an unknown target.
    UnknownMessage,
    /// A notice addressed to an unknown target.
    UnknownNotice,

    // ── Connection ───────────────────────────────────────────
    /// The local user's away state changed.
    AwayState,
    /// Another user's away state changed.
    AwayStateOther,
    /// The connection could not be established.
    ConnectError,
    /// A raw line was read.
    DataIn,
    /// A raw line was written.
    DataOut,
    /// Parser debug output.
    DebugInfo,
    /// The error sink.
    ErrorInfo,
    /// Network and server software identified.
    GotNetwork,
    /// We were invited to a channel.
    Invite,
    /// End of the message of the day.
    MotdEnd,
    /// One line of the message of the day.
    MotdLine,
    /// Start of the message of the day.
    MotdStart,
    /// A user changed nickname.
    NickChanged,
    /// Our nickname is taken.
    NickInUse,
    /// A notice before registration completed.
    NoticeAuth,
    /// A numeric reply.
    Numeric,
    /// The server wants a password.
    PasswordRequired,
    /// The server did not answer a ping in time.
    PingFailed,
    /// A ping was sent.
    PingSent,
    /// The server answered a ping.
    PingSuccess,
    /// ISUPPORT (005) finished.
    Post005,
    /// A user quit the network.
    Quit,
    /// The server sent `ERROR`.
    ServerError,
    /// Registration completed.
    ServerReady,
    /// The socket closed.
    SocketClosed,
    /// Our user modes changed.
    UserModeChanged,
    /// Our user modes were reported.
    UserModeDiscovered,
    /// A `WALLOPS` desync notice.
    WallDesync,
    /// A `WALLOPS` message to operators.
    Wallop,
    /// A `WALLOPS` message to `+w` users.
    Walluser,
}

impl EventKind {
    /// Every built-in kind, in catalog order.
    pub const ALL: &'static [EventKind] = &[
        Self::ChannelAction,
        Self::ChannelAwayStateOther,
        Self::ChannelCtcp,
        Self::ChannelCtcpReply,
        Self::ChannelGotListModes,
        Self::ChannelGotNames,
        Self::ChannelJoin,
        Self::ChannelKick,
        Self::ChannelMessage,
        Self::ChannelModeChanged,
        Self::ChannelModeMessage,
        Self::ChannelModeNotice,
        Self::ChannelNickChanged,
        Self::ChannelNonUserModeChanged,
        Self::ChannelNotice,
        Self::ChannelPart,
        Self::ChannelQuit,
        Self::ChannelSelfJoin,
        Self::ChannelSingleModeChanged,
        Self::ChannelTopic,
        Self::ChannelUserModeChanged,
        Self::PrivateAction,
        Self::PrivateCtcp,
        Self::PrivateCtcpReply,
        Self::PrivateMessage,
        Self::PrivateNotice,
        Self::UnknownAction,
        Self::UnknownCtcp,
        Self::UnknownCtcpReply,
        Self::UnknownMessage,
        Self::UnknownNotice,
        Self::AwayState,
        Self::AwayStateOther,
        Self::ConnectError,
        Self::DataIn,
        Self::DataOut,
        Self::DebugInfo,
        Self::ErrorInfo,
        Self::GotNetwork,
        Self::Invite,
        Self::MotdEnd,
        Self::MotdLine,
        Self::MotdStart,
        Self::NickChanged,
        Self::NickInUse,
        Self::NoticeAuth,
        Self::Numeric,
        Self::PasswordRequired,
        Self::PingFailed,
        Self::PingSent,
        Self::PingSuccess,
        Self::Post005,
        Self::Quit,
        Self::ServerError,
        Self::ServerReady,
        Self::SocketClosed,
        Self::UserModeChanged,
        Self::UserModeDiscovered,
        Self::WallDesync,
        Self::Wallop,
        Self::Walluser,
    ];

    /// The reserved error sink category.
    pub const ERROR_SINK: EventKind = EventKind::ErrorInfo;

    /// Category name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChannelAction => "ChannelAction",
            Self::ChannelAwayStateOther => "ChannelAwayStateOther",
            Self::ChannelCtcp => "ChannelCtcp",
            Self::ChannelCtcpReply => "ChannelCtcpReply",
            Self::ChannelGotListModes => "ChannelGotListModes",
            Self::ChannelGotNames => "ChannelGotNames",
            Self::ChannelJoin => "ChannelJoin",
            Self::ChannelKick => "ChannelKick",
            Self::ChannelMessage => "ChannelMessage",
            Self::ChannelModeChanged => "ChannelModeChanged",
            Self::ChannelModeMessage => "ChannelModeMessage",
            Self::ChannelModeNotice => "ChannelModeNotice",
            Self::ChannelNickChanged => "ChannelNickChanged",
            Self::ChannelNonUserModeChanged => "ChannelNonUserModeChanged",
            Self::ChannelNotice => "ChannelNotice",
            Self::ChannelPart => "ChannelPart",
            Self::ChannelQuit => "ChannelQuit",
            Self::ChannelSelfJoin => "ChannelSelfJoin",
            Self::ChannelSingleModeChanged => "ChannelSingleModeChanged",
            Self::ChannelTopic => "ChannelTopic",
            Self::ChannelUserModeChanged => "ChannelUserModeChanged",
            Self::PrivateAction => "PrivateAction",
            Self::PrivateCtcp => "PrivateCtcp",
            Self::PrivateCtcpReply => "PrivateCtcpReply",
            Self::PrivateMessage => "PrivateMessage",
            Self::PrivateNotice => "PrivateNotice",
            Self::UnknownAction => "UnknownAction",
            Self::UnknownCtcp => "UnknownCtcp",
            Self::UnknownCtcpReply => "UnknownCtcpReply",
            Self::UnknownMessage => "UnknownMessage",
            Self::UnknownNotice => "UnknownNotice",
            Self::AwayState => "AwayState",
            Self::AwayStateOther => "AwayStateOther",
            Self::ConnectError => "ConnectError",
            Self::DataIn => "DataIn",
            Self::DataOut => "DataOut",
            Self::DebugInfo => "DebugInfo",
            Self::ErrorInfo => "ErrorInfo",
            Self::GotNetwork => "GotNetwork",
            Self::Invite => "Invite",
            Self::MotdEnd => "MotdEnd",
            Self::MotdLine => "MotdLine",
            Self::MotdStart => "MotdStart",
            Self::NickChanged => "NickChanged",
            Self::NickInUse => "NickInUse",
            Self::NoticeAuth => "NoticeAuth",
            Self::Numeric => "Numeric",
            Self::PasswordRequired => "PasswordRequired",
            Self::PingFailed => "PingFailed",
            Self::PingSent => "PingSent",
            Self::PingSuccess => "PingSuccess",
            Self::Post005 => "Post005",
            Self::Quit => "Quit",
            Self::ServerError => "ServerError",
            Self::ServerReady => "ServerReady",
            Self::SocketClosed => "SocketClosed",
            Self::UserModeChanged => "UserModeChanged",
            Self::UserModeDiscovered => "UserModeDiscovered",
            Self::WallDesync => "WallDesync",
            Self::Wallop => "Wallop",
            Self::Walluser => "Walluser",
        }
    }

    /// Returns `true` for kinds that support target filtering.
    #[must_use]
    pub fn is_specific(self) -> bool {
        self.shape().1.is_some()
    }

    /// The contract shape of this kind.
    #[must_use]
    pub fn descriptor(self) -> CategoryDescriptor {
        let (params, target) = self.shape();
        CategoryDescriptor::trusted(self.as_str(), params, target)
    }

    fn shape(self) -> (Vec<ParamDescriptor>, Option<&'static str>) {
        use ParamDescriptor as P;
        use ParamKind as K;

        let channel = || P::source("channel", K::Channel);
        let host = || P::source("host", K::Host);
        let member = |name: &str| P::plain(name, K::ChannelClient);
        let sender = || P::fakeable("client", K::ChannelClient);
        let user = || P::fakeable("client", K::Client);
        let text = |name: &str| P::plain(name, K::Text);
        let flag = |name: &str| P::plain(name, K::Flag);

        match self {
            // Channel messages
            Self::ChannelAction | Self::ChannelMessage | Self::ChannelNotice => (
                vec![channel(), sender(), text("message"), host()],
                Some("channel"),
            ),
            Self::ChannelCtcp | Self::ChannelCtcpReply => (
                vec![channel(), sender(), text("ctcp_type"), text("message"), host()],
                Some("channel"),
            ),
            Self::ChannelModeMessage | Self::ChannelModeNotice => (
                vec![channel(), text("prefix"), sender(), text("message"), host()],
                Some("channel"),
            ),

            // Channel state
            Self::ChannelGotListModes => (vec![channel(), text("mode")], Some("channel")),
            Self::ChannelGotNames | Self::ChannelSelfJoin => (vec![channel()], Some("channel")),
            Self::ChannelTopic => (vec![channel(), flag("is_join_topic")], Some("channel")),
            Self::ChannelModeChanged | Self::ChannelNonUserModeChanged => (
                vec![
                    channel(),
                    P::fakeable("set_by", K::ChannelClient),
                    host(),
                    text("modes"),
                ],
                Some("channel"),
            ),
            Self::ChannelSingleModeChanged => (
                vec![
                    channel(),
                    P::fakeable("set_by", K::ChannelClient),
                    host(),
                    text("mode"),
                ],
                Some("channel"),
            ),
            Self::ChannelUserModeChanged => (
                vec![
                    channel(),
                    member("changed_client"),
                    P::fakeable("set_by", K::ChannelClient),
                    host(),
                    text("mode"),
                ],
                Some("channel"),
            ),

            // Channel membership
            Self::ChannelJoin => (vec![channel(), member("client")], Some("channel")),
            Self::ChannelKick => (
                vec![
                    channel(),
                    member("kicked_client"),
                    P::fakeable("kicked_by", K::ChannelClient),
                    text("reason"),
                    P::source("kicked_by_host", K::Host),
                ],
                Some("channel"),
            ),
            Self::ChannelNickChanged => (
                vec![channel(), member("client"), text("old_nick")],
                Some("channel"),
            ),
            Self::ChannelPart | Self::ChannelQuit => (
                vec![channel(), member("client"), text("reason")],
                Some("channel"),
            ),
            Self::ChannelAwayStateOther => (
                vec![channel(), member("client"), flag("away")],
                Some("channel"),
            ),

            // Private
            Self::PrivateAction | Self::PrivateMessage | Self::PrivateNotice => {
                (vec![user(), text("message"), host()], Some("host"))
            }
            Self::PrivateCtcp | Self::PrivateCtcpReply => (
                vec![user(), text("ctcp_type"), text("message"), host()],
                Some("host"),
            ),

            // Unknown target
            Self::UnknownAction | Self::UnknownMessage | Self::UnknownNotice => (
                vec![
                    user(),
                    text("message"),
                    P::plain("target", K::Target),
                    host(),
                ],
                None,
            ),
            Self::UnknownCtcp | Self::UnknownCtcpReply => (
                vec![
                    user(),
                    text("ctcp_type"),
                    text("message"),
                    P::plain("target", K::Target),
                    host(),
                ],
                None,
            ),

            // Connection and server
            Self::AwayState => (vec![flag("away"), text("reason")], None),
            Self::AwayStateOther => (
                vec![P::plain("client", K::Client), flag("away")],
                None,
            ),
            Self::ConnectError | Self::ErrorInfo => (vec![P::plain("error", K::Error)], None),
            Self::DataIn => (vec![text("data")], None),
            Self::DataOut => (vec![text("data"), flag("from_parser")], None),
            Self::DebugInfo => (vec![P::plain("level", K::Number), text("data")], None),
            Self::GotNetwork => (
                vec![text("network"), text("ircd"), text("ircd_type")],
                None,
            ),
            Self::Invite => (
                vec![user(), host(), P::plain("channel", K::Target)],
                None,
            ),
            Self::MotdEnd => (vec![flag("no_motd"), text("data")], None),
            Self::MotdLine | Self::MotdStart | Self::NoticeAuth => (vec![text("data")], None),
            Self::NickChanged => (
                vec![P::plain("client", K::Client), text("old_nick")],
                None,
            ),
            Self::NickInUse => (vec![text("nickname")], None),
            Self::Numeric => (
                vec![P::plain("numeric", K::Number), P::plain("tokens", K::Tokens)],
                None,
            ),
            Self::PasswordRequired
            | Self::PingFailed
            | Self::PingSent
            | Self::PingSuccess
            | Self::Post005
            | Self::ServerReady
            | Self::SocketClosed => (Vec::new(), None),
            Self::Quit => (vec![P::plain("client", K::Client), text("reason")], None),
            Self::ServerError => (vec![text("message")], None),
            Self::UserModeChanged => (
                vec![
                    P::plain("client", K::Client),
                    P::source("set_by", K::Host),
                    text("modes"),
                ],
                None,
            ),
            Self::UserModeDiscovered => {
                (vec![P::plain("client", K::Client), text("modes")], None)
            }
            Self::WallDesync | Self::Wallop | Self::Walluser => {
                (vec![user(), text("message"), host()], None)
            }
        }
    }
}

impl FromStr for EventKind {
    type Err = EventError;

    /// Parses a category name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| EventError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
