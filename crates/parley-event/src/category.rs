//! Category descriptors.
//!
//! A [`CategoryDescriptor`] is the runtime form of one event category:
//! its name, its contract shape, and (for specific categories) which
//! parameter is the dispatch target.
//!
//! # Example
//!
//! ```
//! use parley_event::{CategoryDescriptor, ParamKind};
//!
//! let kick = CategoryDescriptor::builder("ChannelKick")
//!     .source("channel", ParamKind::Channel)
//!     .plain("kicked_client", ParamKind::ChannelClient)
//!     .fakeable("kicked_by", ParamKind::ChannelClient)
//!     .plain("reason", ParamKind::Text)
//!     .source("kicked_by_host", ParamKind::Host)
//!     .target("channel")
//!     .build()
//!     .unwrap();
//!
//! assert!(kick.is_specific());
//! assert!(kick.has_fakeable());
//! assert_eq!(kick.key(), "channelkick");
//! ```

use crate::{EventError, ParamDescriptor, ParamKind, ParamRole};
use serde::Serialize;
use std::collections::HashSet;

/// Name, shape and targeting of one event category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDescriptor {
    name: String,
    params: Vec<ParamDescriptor>,
    target: Option<usize>,
}

impl CategoryDescriptor {
    /// Starts building a descriptor.
    pub fn builder(name: impl Into<String>) -> CategoryBuilder {
        CategoryBuilder {
            name: name.into(),
            params: Vec::new(),
            target: None,
        }
    }

    /// Validates and creates a descriptor from parts.
    ///
    /// `target` names the parameter used for specific dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidCategory`] if the name is blank or
    /// contains whitespace, parameter names are blank or repeated, or
    /// the target does not name a targetable parameter.
    pub fn new(
        name: impl Into<String>,
        params: Vec<ParamDescriptor>,
        target: Option<&str>,
    ) -> Result<Self, EventError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(EventError::invalid(name, "name is blank"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(EventError::invalid(name, "name contains whitespace"));
        }

        {
            let mut seen = HashSet::new();
            for param in &params {
                if param.name.trim().is_empty() {
                    return Err(EventError::invalid(name, "parameter name is blank"));
                }
                if !seen.insert(param.name.as_str()) {
                    let reason = format!("duplicate parameter '{}'", param.name);
                    return Err(EventError::invalid(name, reason));
                }
            }
        }

        let target = match target {
            None => None,
            Some(target_name) => {
                let Some(index) = params.iter().position(|p| p.name == target_name) else {
                    let reason = format!("target '{target_name}' is not a parameter");
                    return Err(EventError::invalid(name, reason));
                };
                if !params[index].kind.is_targetable() {
                    let reason = format!(
                        "target '{target_name}' has kind {}, which cannot be matched",
                        params[index].kind
                    );
                    return Err(EventError::invalid(name, reason));
                }
                Some(index)
            }
        };

        Ok(Self {
            name,
            params,
            target,
        })
    }

    /// Builds a descriptor from a shape already known to be valid.
    ///
    /// Only the built-in catalog uses this; its shapes are checked
    /// against [`CategoryDescriptor::new`] in tests.
    pub(crate) fn trusted(
        name: &str,
        params: Vec<ParamDescriptor>,
        target: Option<&str>,
    ) -> Self {
        let target = target.and_then(|t| params.iter().position(|p| p.name == t));
        Self {
            name: name.to_string(),
            params,
            target,
        }
    }

    /// Category name as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive lookup key.
    #[must_use]
    pub fn key(&self) -> String {
        category_key(&self.name)
    }

    /// The contract shape.
    #[must_use]
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// Number of arguments a notification must supply.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Position of the named parameter.
    #[must_use]
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Returns `true` if subscribers may filter on a target.
    #[must_use]
    pub fn is_specific(&self) -> bool {
        self.target.is_some()
    }

    /// Position of the target parameter for specific categories.
    #[must_use]
    pub fn target_index(&self) -> Option<usize> {
        self.target
    }

    /// Returns `true` if any parameter is fakeable.
    #[must_use]
    pub fn has_fakeable(&self) -> bool {
        self.params.iter().any(ParamDescriptor::is_fakeable)
    }
}

/// Normalizes a category name for case-insensitive lookup.
#[must_use]
pub fn category_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Builder for [`CategoryDescriptor`].
#[derive(Debug, Clone)]
pub struct CategoryBuilder {
    name: String,
    params: Vec<ParamDescriptor>,
    target: Option<String>,
}

impl CategoryBuilder {
    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, kind: ParamKind, role: ParamRole) -> Self {
        self.params.push(ParamDescriptor::new(name, kind, role));
        self
    }

    /// Appends a plain parameter.
    #[must_use]
    pub fn plain(self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.param(name, kind, ParamRole::Plain)
    }

    /// Appends a source parameter.
    #[must_use]
    pub fn source(self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.param(name, kind, ParamRole::Source)
    }

    /// Appends a fakeable parameter.
    #[must_use]
    pub fn fakeable(self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.param(name, kind, ParamRole::Fakeable)
    }

    /// Makes the category specific, filtering on the named parameter.
    #[must_use]
    pub fn target(mut self, param: impl Into<String>) -> Self {
        self.target = Some(param.into());
        self
    }

    /// Validates and builds the descriptor.
    ///
    /// # Errors
    ///
    /// See [`CategoryDescriptor::new`].
    pub fn build(self) -> Result<CategoryDescriptor, EventError> {
        CategoryDescriptor::new(self.name, self.params, self.target.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kick() -> CategoryBuilder {
        CategoryDescriptor::builder("ChannelKick")
            .source("channel", ParamKind::Channel)
            .plain("kicked_client", ParamKind::ChannelClient)
            .fakeable("kicked_by", ParamKind::ChannelClient)
            .plain("reason", ParamKind::Text)
            .source("kicked_by_host", ParamKind::Host)
    }

    #[test]
    fn builds_specific_category() {
        let desc = kick().target("channel").build().unwrap();
        assert_eq!(desc.name(), "ChannelKick");
        assert_eq!(desc.arity(), 5);
        assert_eq!(desc.target_index(), Some(0));
        assert_eq!(desc.param_index("reason"), Some(3));
        assert!(desc.is_specific());
        assert!(desc.has_fakeable());
    }

    #[test]
    fn builds_global_category() {
        let desc = CategoryDescriptor::builder("PingSent").build().unwrap();
        assert!(!desc.is_specific());
        assert!(!desc.has_fakeable());
        assert_eq!(desc.arity(), 0);
    }

    #[test]
    fn key_is_case_insensitive() {
        assert_eq!(category_key("ChannelKick"), category_key("CHANNELKICK"));
        assert_eq!(category_key(" channelKick "), "channelkick");
    }

    #[test]
    fn rejects_blank_name() {
        let err = CategoryDescriptor::builder("  ").build().unwrap_err();
        assert!(matches!(err, EventError::InvalidCategory { .. }));
    }

    #[test]
    fn rejects_whitespace_in_name() {
        assert!(CategoryDescriptor::builder("Channel Kick").build().is_err());
    }

    #[test]
    fn rejects_duplicate_params() {
        let err = CategoryDescriptor::builder("X")
            .plain("a", ParamKind::Text)
            .plain("a", ParamKind::Number)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate parameter 'a'"));
    }

    #[test]
    fn rejects_unknown_target() {
        let err = kick().target("nope").build().unwrap_err();
        assert!(err.to_string().contains("'nope' is not a parameter"));
    }

    #[test]
    fn rejects_untargetable_target() {
        let err = CategoryDescriptor::builder("Numeric")
            .plain("numeric", ParamKind::Number)
            .target("numeric")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("cannot be matched"));
    }

    #[test]
    fn fakeable_slots_may_hold_any_kind() {
        let desc = CategoryDescriptor::builder("ServicesNotice")
            .fakeable("service", ParamKind::Text)
            .plain("message", ParamKind::Text)
            .build()
            .unwrap();
        assert!(desc.has_fakeable());
        assert!(desc.params()[0].is_fakeable());
    }

    #[test]
    fn serializes_shape() {
        let desc = kick().target("channel").build().unwrap();
        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["name"], "ChannelKick");
        assert_eq!(json["target"], 0);
        assert_eq!(json["params"][2]["role"], "fakeable");
    }
}
