//! Scoring errors
//!
//! Error codes:
//! - MEM_SCORING_UNKNOWN_EVENT (ERROR)
//! - MEM_SCORING_UNREACHABLE (ERROR)
//! - MEM_SCORING_NO_QUALIFYING_PREDICATES (ERROR)
//! - MEM_SCORING_NO_FINITE_COMPLEXITIES (ERROR)
//!
//! All scoring errors are local to one call and never abort a scoring pass.

use std::fmt;

use thiserror::Error;

use crate::event::EventId;

/// Severity levels for scoring errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The call has no answer; other calls are unaffected
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Result type for scoring operations
pub type ScoringResult<T> = Result<T, ScoringError>;

/// Scoring errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Unknown event: {0}")]
    UnknownEvent(EventId),

    #[error("Event {0} was never isolated within the search bounds")]
    Unreachable(EventId),

    #[error("No predicate held for event {hypothesis} also holds for event {consequence}")]
    NoQualifyingPredicates {
        hypothesis: EventId,
        consequence: EventId,
    },

    #[error("No event has a finite complexity")]
    NoFiniteComplexities,
}

impl ScoringError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ScoringError::UnknownEvent(_) => "MEM_SCORING_UNKNOWN_EVENT",
            ScoringError::Unreachable(_) => "MEM_SCORING_UNREACHABLE",
            ScoringError::NoQualifyingPredicates { .. } => "MEM_SCORING_NO_QUALIFYING_PREDICATES",
            ScoringError::NoFiniteComplexities => "MEM_SCORING_NO_FINITE_COMPLEXITIES",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}
