//! Error types for treefold-core.
//!
//! Lookup misses inside a walk never surface here: they prune one branch and
//! are counted in the walk statistics. Only failures that leave nothing to
//! return reach the caller.

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The initial query matched no concept, word or stem.
    #[error("Query '{0}' could not be resolved")]
    UnresolvedQuery(String),

    /// Walk or listing limits are outside the accepted bounds.
    #[error("Invalid limits: {0}")]
    InvalidConfig(String),

    /// A concept with the same id is already registered.
    #[error("Concept '{0}' already exists")]
    ConceptExists(String),

    /// A member with the same id is already registered.
    #[error("Member '{0}' already exists")]
    MemberExists(String),

    /// A referenced concept is not registered.
    #[error("Unknown concept '{0}'")]
    UnknownConcept(String),

    /// A relation symbol is not in the registry.
    #[error("Unknown relation symbol '{0}'")]
    UnknownRelation(String),

    /// Listing the root directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
