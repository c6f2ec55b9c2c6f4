//! Error records delivered through the error sink.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of an [`ErrorInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLevel {
    /// Informational problem; processing continues unaffected.
    Warning,
    /// Something failed but the connection is still usable.
    Error,
    /// The connection cannot continue.
    Fatal,
}

impl ErrorLevel {
    /// Lower-case label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure report.
///
/// Produced by the dispatch engine when a subscriber fails or when the
/// producer misuses a category, and by the protocol layer for its own
/// problems. Carries enough context to be useful in a log line without
/// access to the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Severity.
    pub level: ErrorLevel,
    /// Human-readable summary.
    pub message: String,
    /// Last raw protocol line the connection read, if known.
    pub last_line: Option<String>,
    /// Event category being dispatched when the failure happened.
    pub category: Option<String>,
    /// Display form of the underlying failure.
    pub cause: Option<String>,
    /// Machine-readable code of the underlying failure.
    pub code: Option<String>,
}

impl ErrorInfo {
    /// Creates a record with only a level and message.
    #[must_use]
    pub fn new(level: ErrorLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            last_line: None,
            category: None,
            cause: None,
            code: None,
        }
    }

    /// Attaches the last raw protocol line.
    #[must_use]
    pub fn with_last_line(mut self, line: Option<String>) -> Self {
        self.last_line = line;
        self
    }

    /// Attaches the event category name.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attaches the underlying failure.
    #[must_use]
    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    /// Attaches a machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Returns `true` for [`ErrorLevel::Fatal`].
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.level == ErrorLevel::Fatal
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        if let Some(line) = &self.last_line {
            write!(f, " (last line: {line})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_context() {
        let info = ErrorInfo::new(ErrorLevel::Error, "subscriber failed")
            .with_category("ChannelKick")
            .with_last_line(Some(":srv KICK #a b :bye".into()))
            .with_cause("boom")
            .with_code("DISPATCH_SUBSCRIBER_FAILED");

        assert_eq!(info.category.as_deref(), Some("ChannelKick"));
        assert_eq!(info.cause.as_deref(), Some("boom"));
        assert_eq!(info.code.as_deref(), Some("DISPATCH_SUBSCRIBER_FAILED"));
        assert!(!info.is_fatal());
        assert_eq!(
            info.to_string(),
            "[error] subscriber failed: boom (last line: :srv KICK #a b :bye)"
        );
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(ErrorLevel::Warning < ErrorLevel::Error);
        assert!(ErrorLevel::Error < ErrorLevel::Fatal);
        assert!(ErrorInfo::new(ErrorLevel::Fatal, "x").is_fatal());
    }

    #[test]
    fn serde_roundtrip() {
        let info = ErrorInfo::new(ErrorLevel::Warning, "odd").with_category("Numeric");
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"warning\""));
        let back: ErrorInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}
