//! IRC casemapping.
//!
//! IRC compares nicknames and channel names case-insensitively, but
//! "case" is defined by the server's `CASEMAPPING` ISUPPORT token rather
//! than by Unicode or plain ASCII rules.
//!
//! | Mapping | Folds |
//! |---------|-------|
//! | `ascii` | `A-Z` → `a-z` |
//! | `strict-rfc1459` | as `ascii`, plus `[]\` → `{}|` |
//! | `rfc1459` | as `strict-rfc1459`, plus `~` → `^` |
//!
//! `rfc1459` is what servers assume when they do not advertise a mapping.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A protocol-defined case folding rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseMapping {
    /// Only `A-Z` fold.
    Ascii,
    /// `A-Z[]\~` fold to `a-z{}|^`.
    #[default]
    Rfc1459,
    /// `A-Z[]\` fold to `a-z{}|`.
    StrictRfc1459,
}

impl CaseMapping {
    /// Folds a single character to its lower-case form under this mapping.
    #[must_use]
    pub fn fold_char(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => c.to_ascii_lowercase(),
            (Self::Rfc1459 | Self::StrictRfc1459, '[') => '{',
            (Self::Rfc1459 | Self::StrictRfc1459, ']') => '}',
            (Self::Rfc1459 | Self::StrictRfc1459, '\\') => '|',
            (Self::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// Returns the lower-case form of `s` under this mapping.
    #[must_use]
    pub fn to_lower(self, s: &str) -> String {
        s.chars().map(|c| self.fold_char(c)).collect()
    }

    /// Compares two strings for equality under this mapping.
    #[must_use]
    pub fn equals_ignore_case(self, a: &str, b: &str) -> bool {
        let mut left = a.chars().map(|c| self.fold_char(c));
        let mut right = b.chars().map(|c| self.fold_char(c));
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) if x == y => {}
                _ => return false,
            }
        }
    }

    /// Returns the ISUPPORT token for this mapping.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Rfc1459 => "rfc1459",
            Self::StrictRfc1459 => "strict-rfc1459",
        }
    }
}

impl FromStr for CaseMapping {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "rfc1459" => Ok(Self::Rfc1459),
            "strict-rfc1459" => Ok(Self::StrictRfc1459),
            _ => Err(TypesError::UnknownCasemapping(s.to_string())),
        }
    }
}

impl fmt::Display for CaseMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
