//! Layered configuration.
//!
//! Values are merged in order: built-in defaults, then a TOML file
//! (`treefold.toml` unless a path is given), then `TREEFOLD_`-prefixed
//! environment variables with `__` separating nested keys, e.g.
//! `TREEFOLD_TRAVERSAL__MAX_DEPTH=6`.
//!
//! ```toml
//! [traversal]
//! max_depth = 3
//! max_links = 16
//! relations = ["@", "~"]
//! shape = "FORGET_MEMBERS | EDGE_LABELS"
//!
//! [members]
//! max_at_level = [8, 4]
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::balance::BalanceSettings;
use crate::files::FileTreeSettings;
use crate::lexicon::RelationSet;
use crate::walker::{ShapeFlags, TraversalConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LINKS};

/// File looked up in the working directory by [`TreefoldConfig::load`].
pub const DEFAULT_CONFIG_FILE: &str = "treefold.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "TREEFOLD_";

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A provider failed or a value has the wrong type.
    #[error("Failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// An explicitly named file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// A value is outside its accepted range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The effective configuration could not be written as TOML.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// `[traversal]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalSettings {
    /// Recursion depth.
    pub max_depth: usize,
    /// Targets expanded per relation kind.
    pub max_links: usize,
    /// Relation symbols to follow; empty means every kind.
    pub relations: Vec<String>,
    /// Shaping flags in `A | B` form.
    pub shape: ShapeFlags,
    /// Emit already-expanded concepts as leaves.
    pub dedup_visited: bool,
    /// Wall-clock budget per walk, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

impl Default for TraversalSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_links: DEFAULT_MAX_LINKS,
            relations: Vec::new(),
            shape: ShapeFlags::empty(),
            dedup_visited: false,
            deadline_ms: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Plain,
    /// One JSON object per line.
    Json,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreefoldConfig {
    /// Walk limits, filters and shaping.
    pub traversal: TraversalSettings,
    /// Regrouping of member lists.
    pub members: BalanceSettings,
    /// Regrouping of relation target lists.
    pub relations: BalanceSettings,
    /// Filesystem variant.
    pub files: FileTreeSettings,
    /// Logging.
    pub logging: LoggingConfig,
}

impl TreefoldConfig {
    /// Loads defaults, `treefold.toml` if present, then the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Extract` if a provider holds malformed values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::layered(Path::new(DEFAULT_CONFIG_FILE)))
    }

    /// Loads defaults, the given file, then the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist, or
    /// `ConfigError::Extract` on malformed values.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::extract(Self::layered(path))
    }

    /// Parses a TOML document over the defaults, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Extract` on malformed TOML or values.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::extract(Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(toml)))
    }

    fn layered(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Extract(Box::new(e)))
    }

    /// Checks every section against its accepted bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.traversal_config()?
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.files
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.level is empty".to_string()));
        }
        for (section, settings) in [
            ("members", &self.members),
            ("relations", &self.relations),
            ("files.balance", &self.files.balance),
        ] {
            if settings.enabled && !settings.bounds_fan_out() {
                warn!(
                    section,
                    caps = ?settings.max_at_level,
                    "Fan-out caps leave lists ungrouped at some level"
                );
            }
        }
        Ok(())
    }

    /// Builds the immutable walk configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for unknown relation symbols.
    pub fn traversal_config(&self) -> Result<TraversalConfig, ConfigError> {
        let traversal = &self.traversal;
        let relations = RelationSet::from_symbols(&traversal.relations)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let mut config = TraversalConfig::new(traversal.max_depth, traversal.max_links)
            .with_relations(relations)
            .with_shape(traversal.shape)
            .with_members_balance(self.members.clone())
            .with_relations_balance(self.relations.clone())
            .with_dedup_visited(traversal.dedup_visited);
        if let Some(ms) = traversal.deadline_ms {
            config = config.with_deadline(Duration::from_millis(ms));
        }
        Ok(config)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if a value cannot be represented.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
