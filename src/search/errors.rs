//! Search configuration errors
//!
//! Error codes:
//! - MEM_CONFIG_NO_PREDICATES (FATAL)
//! - MEM_CONFIG_DUPLICATE_PREDICATE (FATAL)
//! - MEM_CONFIG_INVALID_DEPTH (FATAL)
//! - MEM_CONFIG_INVALID_COMPLEXITY (FATAL)
//! - MEM_CONFIG_READ_FAILED (FATAL)
//! - MEM_CONFIG_MALFORMED (FATAL)
//!
//! Every configuration error is fatal: it is raised at the boundary before
//! any search begins.

use std::fmt;

use thiserror::Error;

use crate::predicate::PredicateFamily;

/// Severity levels for configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run cannot start
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("At least one predicate family is required")]
    NoPredicates,

    #[error("Predicate family listed twice: {0}")]
    DuplicatePredicate(PredicateFamily),

    #[error("max_depth must be > 0")]
    InvalidDepth,

    #[error("max_complexity must be a positive finite number, got {0}")]
    InvalidComplexity(f64),

    #[error("Failed to read config: {0}")]
    ReadFailed(String),

    #[error("Invalid config JSON: {0}")]
    Malformed(String),
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::NoPredicates => "MEM_CONFIG_NO_PREDICATES",
            ConfigError::DuplicatePredicate(_) => "MEM_CONFIG_DUPLICATE_PREDICATE",
            ConfigError::InvalidDepth => "MEM_CONFIG_INVALID_DEPTH",
            ConfigError::InvalidComplexity(_) => "MEM_CONFIG_INVALID_COMPLEXITY",
            ConfigError::ReadFailed(_) => "MEM_CONFIG_READ_FAILED",
            ConfigError::Malformed(_) => "MEM_CONFIG_MALFORMED",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}
