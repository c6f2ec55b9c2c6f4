//! Dispatch configuration.
//!
//! # Load Order
//!
//! 1. Default values
//! 2. TOML file (missing file is not an error)
//! 3. Environment variables (`PARLEY_*`)
//!
//! # Example TOML
//!
//! ```toml
//! max_synthesis_depth = 3
//! catch_panics = true
//!
//! [[categories]]
//! name = "ZncPlayback"
//! target = "channel"
//! params = [
//!     { name = "channel", kind = "channel", role = "source" },
//!     { name = "data", kind = "text" },
//! ]
//! ```

use crate::synth::DEFAULT_MAX_DEPTH;
use parley_event::{category_key, CategoryDescriptor, EventError, ParamDescriptor};
use parley_types::ErrorCode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding [`DispatchConfig::max_synthesis_depth`].
pub const ENV_MAX_SYNTHESIS_DEPTH: &str = "PARLEY_MAX_SYNTHESIS_DEPTH";
/// Environment variable overriding [`DispatchConfig::synthesize`].
pub const ENV_SYNTHESIZE: &str = "PARLEY_SYNTHESIZE";
/// Environment variable overriding [`DispatchConfig::catch_panics`].
pub const ENV_CATCH_PANICS: &str = "PARLEY_CATCH_PANICS";
/// Environment variable overriding [`DispatchConfig::log_errors`].
pub const ENV_LOG_ERRORS: &str = "PARLEY_LOG_ERRORS";

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config '{origin}': {source}")]
    ParseToml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid environment variable value.
    #[error("invalid value for environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// A declared category failed validation.
    #[error("category definition '{name}': {source}")]
    InvalidCategory {
        name: String,
        #[source]
        source: EventError,
    },
}

impl ConfigError {
    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse TOML error.
    pub fn parse_toml(origin: impl Into<String>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            origin: origin.into(),
            source,
        }
    }

    /// Creates an invalid env var error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "CONFIG_READ_FILE",
            Self::ParseToml { .. } => "CONFIG_PARSE_TOML",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV_VAR",
            Self::InvalidCategory { .. } => "CONFIG_INVALID_CATEGORY",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Fixing the file or variable and reloading works.
        true
    }
}

/// A declarative extension category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDef {
    /// Category name, unique ignoring case.
    pub name: String,

    /// Parameters in argument order.
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,

    /// Parameter used for targeted subscriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl CategoryDef {
    /// Validates this definition into a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCategory`] if the shape is invalid.
    pub fn validate(&self) -> Result<CategoryDescriptor, ConfigError> {
        CategoryDescriptor::new(self.name.clone(), self.params.clone(), self.target.as_deref())
            .map_err(|source| ConfigError::InvalidCategory {
                name: self.name.clone(),
                source,
            })
    }
}

/// Dispatch engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Recursion bound for placeholder synthesis. Default: 4.
    pub max_synthesis_depth: usize,

    /// Whether fakeable slots are synthesized at all. Default: true.
    pub synthesize: bool,

    /// Whether panicking subscribers are caught. Default: true.
    pub catch_panics: bool,

    /// Whether the hub logs error sink records via `tracing`. Default: true.
    pub log_errors: bool,

    /// Extension categories registered on top of the built-in catalog.
    pub categories: Vec<CategoryDef>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_synthesis_depth: DEFAULT_MAX_DEPTH,
            synthesize: true,
            catch_panics: true,
            log_errors: true,
            categories: Vec::new(),
        }
    }
}

impl DispatchConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseToml`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::parse_toml("<inline>", e))
    }

    /// Loads a config file, returning `None` if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = toml::from_str(&content)
            .map_err(|e| ConfigError::parse_toml(path.display().to_string(), e))?;

        debug!(path = %path.display(), "Loaded dispatch config");
        Ok(Some(config))
    }

    /// Loads defaults, then `path` if present, then environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be parsed,
    /// or an environment variable holds an invalid value.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    fn load_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(file) = Self::load_file(path)? {
            config.merge(&file);
        }
        config.apply_env_with(lookup)?;
        Ok(config)
    }

    /// Applies `PARLEY_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] on an unparseable value.
    pub fn apply_env_vars(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable source.
    fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_MAX_SYNTHESIS_DEPTH) {
            self.max_synthesis_depth = val.trim().parse().map_err(|_| {
                ConfigError::invalid_env_var(ENV_MAX_SYNTHESIS_DEPTH, "expected unsigned integer")
            })?;
        }

        for (name, field) in [
            (ENV_SYNTHESIZE, &mut self.synthesize),
            (ENV_CATCH_PANICS, &mut self.catch_panics),
            (ENV_LOG_ERRORS, &mut self.log_errors),
        ] {
            if let Some(val) = lookup(name) {
                *field = parse_bool(&val)
                    .ok_or_else(|| ConfigError::invalid_env_var(name, "expected bool"))?;
            }
        }

        Ok(())
    }

    /// Merges another config into this one.
    ///
    /// Scalar settings are taken from `other`. Category definitions
    /// accumulate: one in `other` whose name matches an existing one
    /// (ignoring case) replaces it, the rest are appended.
    pub fn merge(&mut self, other: &Self) {
        self.max_synthesis_depth = other.max_synthesis_depth;
        self.synthesize = other.synthesize;
        self.catch_panics = other.catch_panics;
        self.log_errors = other.log_errors;

        for def in &other.categories {
            let key = category_key(&def.name);
            self.categories.retain(|c| category_key(&c.name) != key);
            self.categories.push(def.clone());
        }
    }

    /// Validates all category definitions.
    ///
    /// Returns all validation errors (not just the first one).
    pub fn validate_all(&self) -> Vec<ConfigError> {
        self.categories
            .iter()
            .filter_map(|c| c.validate().err())
            .collect()
    }
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off"
/// (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_event::{ParamKind, ParamRole};
    use parley_types::assert_error_code;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn def(name: &str) -> CategoryDef {
        CategoryDef {
            name: name.to_string(),
            params: vec![ParamDescriptor::plain("data", ParamKind::Text)],
            target: None,
        }
    }

    // ── Defaults ────────────────────────────────────────────

    #[test]
    fn defaults() {
        let cfg = DispatchConfig::default();
        assert_eq!(cfg.max_synthesis_depth, 4);
        assert!(cfg.synthesize);
        assert!(cfg.catch_panics);
        assert!(cfg.log_errors);
        assert!(cfg.categories.is_empty());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(DispatchConfig::from_toml("").unwrap(), DispatchConfig::default());
    }

    // ── Parsing ─────────────────────────────────────────────

    #[test]
    fn parses_categories() {
        let cfg = DispatchConfig::from_toml(
            r#"
max_synthesis_depth = 2
log_errors = false

[[categories]]
name = "ZncPlayback"
target = "channel"
params = [
    { name = "channel", kind = "channel", role = "source" },
    { name = "data", kind = "text" },
]
"#,
        )
        .unwrap();

        assert_eq!(cfg.max_synthesis_depth, 2);
        assert!(!cfg.log_errors);
        assert!(cfg.synthesize);

        let desc = cfg.categories[0].validate().unwrap();
        assert_eq!(desc.name(), "ZncPlayback");
        assert!(desc.is_specific());
        assert_eq!(desc.params()[0].role, ParamRole::Source);
        assert_eq!(desc.params()[1].role, ParamRole::Plain);
    }

    #[test]
    fn malformed_toml() {
        let err = DispatchConfig::from_toml("max_synthesis_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert_error_code(&err, "CONFIG_");
    }

    #[test]
    fn serde_roundtrip() {
        let mut cfg = DispatchConfig::default();
        cfg.categories.push(def("Extra"));
        let text = toml::to_string(&cfg).unwrap();
        assert_eq!(DispatchConfig::from_toml(&text).unwrap(), cfg);
    }

    // ── Validation ──────────────────────────────────────────

    #[test]
    fn validate_all_collects_every_error() {
        let mut bad_target = def("BadTarget");
        bad_target.target = Some("missing".into());
        let cfg = DispatchConfig {
            categories: vec![def("Good"), def("has space"), bad_target],
            ..DispatchConfig::default()
        };

        let errors = cfg.validate_all();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ConfigError::InvalidCategory { .. })));
        assert!(errors[1].to_string().contains("BadTarget"));
    }

    // ── Merge ───────────────────────────────────────────────

    #[test]
    fn merge_replaces_same_name_and_appends_rest() {
        let mut base = DispatchConfig {
            categories: vec![def("A"), def("B")],
            ..DispatchConfig::default()
        };
        let mut replacement = def("a");
        replacement.params.push(ParamDescriptor::plain("extra", ParamKind::Flag));
        let overlay = DispatchConfig {
            max_synthesis_depth: 1,
            categories: vec![replacement.clone(), def("C")],
            ..DispatchConfig::default()
        };

        base.merge(&overlay);

        assert_eq!(base.max_synthesis_depth, 1);
        let names: Vec<_> = base.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["B", "a", "C"]);
        assert_eq!(base.categories[1], replacement);
    }

    // ── Files ───────────────────────────────────────────────

    #[test]
    fn load_file_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");
        assert!(DispatchConfig::load_file(&path).unwrap().is_none());
    }

    #[test]
    fn load_file_reads_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dispatch.toml");
        std::fs::write(&path, "synthesize = false\n").unwrap();

        let cfg = DispatchConfig::load_file(&path).unwrap().unwrap();
        assert!(!cfg.synthesize);
    }

    #[test]
    fn load_file_reports_path_on_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        std::fs::write(&path, "[[categories]\n").unwrap();

        let err = DispatchConfig::load_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn load_layers_defaults_file_then_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dispatch.toml");
        std::fs::write(
            &path,
            r#"
max_synthesis_depth = 2
synthesize = false

[[categories]]
name = "ZncPlayback"
params = [{ name = "data", kind = "text" }]
"#,
        )
        .unwrap();

        let cfg = DispatchConfig::load_with(&path, env(&[(ENV_SYNTHESIZE, "yes")])).unwrap();

        // file over defaults
        assert_eq!(cfg.max_synthesis_depth, 2);
        assert_eq!(cfg.categories.len(), 1);
        // env over file
        assert!(cfg.synthesize);
        // untouched defaults
        assert!(cfg.catch_panics);
        assert!(cfg.log_errors);
    }

    #[test]
    fn load_without_file_uses_defaults_and_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");

        let cfg = DispatchConfig::load_with(&path, env(&[(ENV_MAX_SYNTHESIS_DEPTH, "9")])).unwrap();
        assert_eq!(cfg.max_synthesis_depth, 9);
        assert!(cfg.synthesize);

        let err = DispatchConfig::load_with(&path, env(&[(ENV_LOG_ERRORS, "sometimes")]))
            .unwrap_err();
        assert_error_code(&err, "CONFIG_");
    }

    #[test]
    fn load_reads_file_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dispatch.toml");
        std::fs::write(&path, "[[categories]]\nname = \"ZncPlayback\"\n").unwrap();

        let cfg = DispatchConfig::load(&path).unwrap();
        assert_eq!(cfg.categories[0].name, "ZncPlayback");
    }

    // ── Environment ─────────────────────────────────────────

    #[test]
    fn env_overrides() {
        let mut cfg = DispatchConfig::default();
        cfg.apply_env_with(env(&[
            (ENV_MAX_SYNTHESIS_DEPTH, " 7 "),
            (ENV_SYNTHESIZE, "off"),
            (ENV_CATCH_PANICS, "NO"),
            (ENV_LOG_ERRORS, "1"),
        ]))
        .unwrap();

        assert_eq!(cfg.max_synthesis_depth, 7);
        assert!(!cfg.synthesize);
        assert!(!cfg.catch_panics);
        assert!(cfg.log_errors);
    }

    #[test]
    fn env_invalid_values() {
        let mut cfg = DispatchConfig::default();
        let err = cfg
            .apply_env_with(env(&[(ENV_SYNTHESIZE, "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_SYNTHESIZE));

        let err = cfg
            .apply_env_with(env(&[(ENV_MAX_SYNTHESIS_DEPTH, "-1")]))
            .unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID_ENV_VAR");
    }

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("invalid"), None);
    }
}
