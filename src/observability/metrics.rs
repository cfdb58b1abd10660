//! Search counters
//!
//! - Counters only, monotonic increase
//! - One registry per search run
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing the work done by one complexity search.
///
/// All counters use Relaxed atomics; exact values are read once the search
/// has finished, through `snapshot`.
#[derive(Debug, Default)]
pub struct SearchMetrics {
    /// Breadth-first passes run
    passes: AtomicU64,
    /// Filters applied (every program tried)
    filters_applied: AtomicU64,
    /// Filters that reported the family as inapplicable
    incompatible_filters: AtomicU64,
    /// Programs that kept the whole collection
    non_discriminating: AtomicU64,
    /// Filters whose result was a single event within budget
    singletons: AtomicU64,
    /// Best-known complexity improvements
    improvements: AtomicU64,
    /// Narrowed collections dropped for exceeding the cost bound
    pruned: AtomicU64,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_passes(&self) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_filters_applied(&self) {
        self.filters_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_incompatible(&self) {
        self.incompatible_filters.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_non_discriminating(&self) {
        self.non_discriminating.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_singletons(&self) {
        self.singletons.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_improvements(&self) {
        self.improvements.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_pruned(&self) {
        self.pruned.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            passes: self.passes.load(Ordering::Relaxed),
            filters_applied: self.filters_applied.load(Ordering::Relaxed),
            incompatible_filters: self.incompatible_filters.load(Ordering::Relaxed),
            non_discriminating: self.non_discriminating.load(Ordering::Relaxed),
            singletons: self.singletons.load(Ordering::Relaxed),
            improvements: self.improvements.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of the search counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub passes: u64,
    pub filters_applied: u64,
    pub incompatible_filters: u64,
    pub non_discriminating: u64,
    pub singletons: u64,
    pub improvements: u64,
    pub pruned: u64,
}

impl MetricsSnapshot {
    /// Counters as JSON, keys in fixed order
    pub fn to_json(&self) -> String {
        format!(
            r#"{{"passes":{},"filters_applied":{},"incompatible_filters":{},"non_discriminating":{},"singletons":{},"improvements":{},"pruned":{}}}"#,
            self.passes,
            self.filters_applied,
            self.incompatible_filters,
            self.non_discriminating,
            self.singletons,
            self.improvements,
            self.pruned,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        assert_eq!(SearchMetrics::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let metrics = SearchMetrics::new();
        metrics.increment_passes();
        metrics.increment_passes();
        metrics.increment_filters_applied();
        metrics.increment_incompatible();
        metrics.increment_non_discriminating();
        metrics.increment_singletons();
        metrics.increment_improvements();
        metrics.increment_pruned();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.passes, 2);
        assert_eq!(snapshot.filters_applied, 1);
        assert_eq!(snapshot.incompatible_filters, 1);
        assert_eq!(snapshot.non_discriminating, 1);
        assert_eq!(snapshot.singletons, 1);
        assert_eq!(snapshot.improvements, 1);
        assert_eq!(snapshot.pruned, 1);
    }

    #[test]
    fn test_snapshot_json_parses() {
        let metrics = SearchMetrics::new();
        metrics.increment_singletons();
        let parsed: serde_json::Value = serde_json::from_str(&metrics.snapshot().to_json()).unwrap();
        assert_eq!(parsed["singletons"], 1);
        assert_eq!(parsed["passes"], 0);
    }
}
