//! Shared helpers for dispatch integration tests.

#![allow(dead_code)]

use parley_dispatch::{DispatchConfig, DispatchHub};
use parley_event::EventArg;
use parley_types::{CaseMapping, ChannelClientInfo, ChannelInfo, ClientInfo, FixedParser};
use std::sync::Arc;

// =============================================================================
// Hubs
// =============================================================================

/// A hub over the built-in catalog with the error logger detached, so
/// error sink subscriber counts only include what the test subscribes.
pub fn quiet_hub() -> DispatchHub {
    let config = DispatchConfig {
        log_errors: false,
        ..DispatchConfig::default()
    };
    DispatchHub::from_config(&config).expect("default config is valid")
}

/// Like [`quiet_hub`] but without placeholder synthesis.
pub fn hub_without_synthesis() -> DispatchHub {
    let config = DispatchConfig {
        log_errors: false,
        synthesize: false,
        ..DispatchConfig::default()
    };
    DispatchHub::from_config(&config).expect("config is valid")
}

// =============================================================================
// Parsers
// =============================================================================

/// Parser for a network advertising RFC 1459 casemapping.
pub fn parser() -> FixedParser {
    FixedParser::new()
        .with_casemapping(CaseMapping::Rfc1459)
        .with_network("ExampleNet")
        .with_server_name("irc.example.net")
}

// =============================================================================
// Arguments
// =============================================================================

pub fn channel(name: &str) -> EventArg {
    ChannelInfo::new(name).into()
}

pub fn member(nick: &str, channel: &str) -> EventArg {
    ChannelClientInfo::new(Arc::new(ClientInfo::new(nick)), channel).into()
}

/// `ChannelMessage` arguments: channel, sender, message, host.
pub fn channel_message(chan: &str, nick: &str, text: &str) -> Vec<EventArg> {
    vec![
        channel(chan),
        member(nick, chan),
        text.into(),
        format!("{nick}!{nick}@example.org").into(),
    ]
}

/// `ChannelKick` arguments with the kicker left for synthesis.
pub fn kick_by_host(chan: &str, victim: &str, reason: &str, host: &str) -> Vec<EventArg> {
    vec![
        channel(chan),
        member(victim, chan),
        EventArg::Absent,
        reason.into(),
        host.into(),
    ]
}
