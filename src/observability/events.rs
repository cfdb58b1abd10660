//! Observable lifecycle events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events of the analysis pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEvent {
    /// Search configuration loaded and validated
    ConfigLoaded,
    /// Configuration rejected
    ConfigRejected,
    /// Root collection built and indexed
    MemoryBuilt,
    /// Complexity search begins
    SearchStart,
    /// One breadth-first pass finished
    SearchPass,
    /// Complexity search complete
    SearchComplete,
    /// Absolute surprise computed for the whole collection
    SurpriseComputed,
    /// Abduction query answered
    AbductionQuery,
}

impl LogEvent {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            LogEvent::ConfigLoaded => "CONFIG_LOADED",
            LogEvent::ConfigRejected => "CONFIG_REJECTED",
            LogEvent::MemoryBuilt => "MEMORY_BUILT",
            LogEvent::SearchStart => "SEARCH_BEGIN",
            LogEvent::SearchPass => "SEARCH_PASS",
            LogEvent::SearchComplete => "SEARCH_COMPLETE",
            LogEvent::SurpriseComputed => "SURPRISE_COMPUTED",
            LogEvent::AbductionQuery => "ABDUCTION_QUERY",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, LogEvent::ConfigRejected)
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
