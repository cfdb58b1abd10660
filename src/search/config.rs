//! Search configuration
//!
//! Loaded from a JSON file or built in code, and validated before any
//! search begins. Missing fields take their defaults.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, LogEvent};
use crate::predicate::{Encoding, PredicateFamily};

use super::errors::{ConfigError, ConfigResult};

/// Bounds and predicate catalogue of a complexity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Families to enumerate, in enumeration order
    #[serde(default = "PredicateFamily::default_set")]
    pub predicates: Vec<PredicateFamily>,

    /// Maximum number of breadth-first passes
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum accumulated cost of a recorded collection
    #[serde(default = "default_max_complexity")]
    pub max_complexity: f64,

    /// Prefix code used to price programs
    #[serde(default)]
    pub encoding: Encoding,
}

fn default_max_depth() -> usize {
    4
}

fn default_max_complexity() -> f64 {
    40.0
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            predicates: PredicateFamily::default_set(),
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            encoding: Encoding::default(),
        }
    }
}

impl SearchConfig {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed(e.to_string()))?;

        let config: SearchConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        config.validate()?;

        log_event_with_fields(
            LogEvent::ConfigLoaded,
            &[
                ("predicates", &config.predicates.len().to_string()),
                ("max_depth", &config.max_depth.to_string()),
                ("max_complexity", &config.max_complexity.to_string()),
            ],
        );

        Ok(config)
    }

    pub fn with_predicates(mut self, predicates: Vec<PredicateFamily>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_complexity(mut self, max_complexity: f64) -> Self {
        self.max_complexity = max_complexity;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Reject configurations no search can run with
    pub fn validate(&self) -> ConfigResult<()> {
        let result = self.check();
        if let Err(e) = &result {
            log_event_with_fields(
                LogEvent::ConfigRejected,
                &[("code", e.code()), ("reason", &e.to_string())],
            );
        }
        result
    }

    fn check(&self) -> ConfigResult<()> {
        if self.predicates.is_empty() {
            return Err(ConfigError::NoPredicates);
        }

        let mut seen = BTreeSet::new();
        for family in &self.predicates {
            if !seen.insert(*family) {
                return Err(ConfigError::DuplicatePredicate(*family));
            }
        }

        if self.max_depth == 0 {
            return Err(ConfigError::InvalidDepth);
        }

        if !self.max_complexity.is_finite() || self.max_complexity <= 0.0 {
            return Err(ConfigError::InvalidComplexity(self.max_complexity));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_complexity, 40.0);
        assert_eq!(config.predicates, PredicateFamily::default_set());
        assert_eq!(config.encoding, Encoding::Floored);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_takes_defaults() {
        let config: SearchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"{"predicates": ["has_label", "random_choice"], "max_depth": 2, "max_complexity": 25.5, "encoding": "continuous"}"#,
        );
        let config = SearchConfig::load(file.path()).unwrap();
        assert_eq!(
            config.predicates,
            vec![PredicateFamily::HasLabel, PredicateFamily::RandomChoice]
        );
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_complexity, 25.5);
        assert_eq!(config.encoding, Encoding::Continuous);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SearchConfig::load(Path::new("/nonexistent/search.json")).unwrap_err();
        assert_eq!(err.code(), "MEM_CONFIG_READ_FAILED");
    }

    #[test]
    fn test_load_malformed_json() {
        let file = write_config("{ not json");
        let err = SearchConfig::load(file.path()).unwrap_err();
        assert_eq!(err.code(), "MEM_CONFIG_MALFORMED");
    }

    #[test]
    fn test_unknown_family_rejected() {
        let file = write_config(r#"{"predicates": ["telepathy"]}"#);
        let err = SearchConfig::load(file.path()).unwrap_err();
        assert_eq!(err.code(), "MEM_CONFIG_MALFORMED");
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            SearchConfig::default().with_predicates(vec![]).validate(),
            Err(ConfigError::NoPredicates)
        );
        assert_eq!(
            SearchConfig::default()
                .with_predicates(vec![PredicateFamily::Day, PredicateFamily::Day])
                .validate(),
            Err(ConfigError::DuplicatePredicate(PredicateFamily::Day))
        );
        assert_eq!(
            SearchConfig::default().with_max_depth(0).validate(),
            Err(ConfigError::InvalidDepth)
        );
        assert!(SearchConfig::default().with_max_complexity(0.0).validate().is_err());
        assert!(SearchConfig::default()
            .with_max_complexity(f64::INFINITY)
            .validate()
            .is_err());
    }
}
