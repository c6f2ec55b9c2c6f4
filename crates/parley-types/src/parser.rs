//! The producer-side context handed to every subscriber.

use crate::CaseMapping;

/// Read-only view of the connection that produced an event.
///
/// The protocol layer implements this for its parser. Subscribers receive
/// it as the first argument of every notification, and the dispatch
/// engine uses it for casemapping-aware target matching and for error
/// context.
pub trait Parser: Send + Sync {
    /// Casemapping advertised by the server.
    fn casemapping(&self) -> CaseMapping {
        CaseMapping::default()
    }

    /// The last raw line read from the server, if any.
    fn last_line(&self) -> Option<String> {
        None
    }

    /// Network name from ISUPPORT, once known.
    fn network(&self) -> Option<String> {
        None
    }

    /// Name of the server we are connected to, once known.
    fn server_name(&self) -> Option<String> {
        None
    }
}

/// A [`Parser`] with fixed answers.
///
/// Useful for replaying recorded traffic and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedParser {
    casemapping: CaseMapping,
    last_line: Option<String>,
    network: Option<String>,
    server_name: Option<String>,
}

impl FixedParser {
    /// Creates a parser using the default casemapping and no context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the casemapping.
    #[must_use]
    pub fn with_casemapping(mut self, casemapping: CaseMapping) -> Self {
        self.casemapping = casemapping;
        self
    }

    /// Sets the last line.
    #[must_use]
    pub fn with_last_line(mut self, line: impl Into<String>) -> Self {
        self.last_line = Some(line.into());
        self
    }

    /// Sets the network name.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Sets the server name.
    #[must_use]
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }
}

impl Parser for FixedParser {
    fn casemapping(&self) -> CaseMapping {
        self.casemapping
    }

    fn last_line(&self) -> Option<String> {
        self.last_line.clone()
    }

    fn network(&self) -> Option<String> {
        self.network.clone()
    }

    fn server_name(&self) -> Option<String> {
        self.server_name.clone()
    }
}
