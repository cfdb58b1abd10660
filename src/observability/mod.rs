//! Observability subsystem
//!
//! This module provides:
//! - Structured logging (JSON lines)
//! - Search counters
//! - Lifecycle event tracing
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on search or scoring results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use memorability::observability::{Logger, LogEvent, ObservationScope};
//!
//! Logger::info("SEARCH_PASS", &[("frontier", "42")]);
//!
//! let scope = ObservationScope::new("COMPLEXITY_SEARCH");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::LogEvent;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, SearchMetrics};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event
pub fn log_event(event: LogEvent) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: LogEvent, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

/// Log a lifecycle event at TRACE level
pub fn trace_event(event: LogEvent, fields: &[(&str, &str)]) {
    Logger::trace(event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(LogEvent::SearchStart);
        log_event(LogEvent::SearchComplete);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(LogEvent::MemoryBuilt, &[("events", "5")]);
        trace_event(LogEvent::SearchPass, &[("pass", "0")]);
    }
}
