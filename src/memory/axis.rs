//! Per-axis rank index
//!
//! Maps every distinct value seen on an axis to the set of events holding
//! it. Values are kept in a BTreeMap for deterministic ordering; after a
//! batch load the distinct values are frozen into a sorted vector so that
//! rank lookups are O(1) on top of the result size.

use std::collections::{BTreeMap, BTreeSet};

use crate::event::{EventId, Scalar};

/// Rank index for a single axis.
#[derive(Debug, Clone, Default)]
pub struct AxisIndex {
    /// Maps values to the ids of the events holding them
    tree: BTreeMap<Scalar, BTreeSet<EventId>>,
    /// Distinct values, ascending. Valid after `finalize`.
    sorted: Vec<Scalar>,
    /// Number of events carrying this axis
    occurrences: usize,
}

impl AxisIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` holds `value` on this axis.
    pub fn insert(&mut self, value: Scalar, id: EventId) {
        if self.tree.entry(value).or_default().insert(id) {
            self.occurrences += 1;
        }
    }

    /// Freeze the distinct values after a batch of insertions.
    pub fn finalize(&mut self) {
        self.sorted = self.tree.keys().cloned().collect();
    }

    /// Distinct values, ascending.
    pub fn sorted_values(&self) -> &[Scalar] {
        &self.sorted
    }

    /// Events holding the `k`-th distinct value, counting from the largest
    /// value when `descending`. `None` when `k` is past the last rank.
    pub fn kth(&self, k: usize, descending: bool) -> Option<&BTreeSet<EventId>> {
        if k >= self.sorted.len() {
            return None;
        }
        let value = if descending {
            &self.sorted[self.sorted.len() - 1 - k]
        } else {
            &self.sorted[k]
        };
        self.tree.get(value)
    }

    /// Number of events carrying the axis.
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temps() -> AxisIndex {
        let mut axis = AxisIndex::new();
        axis.insert(Scalar::from_float(21.0), 3);
        axis.insert(Scalar::from_float(18.5), 1);
        axis.insert(Scalar::from_float(21.0), 2);
        axis.insert(Scalar::from_float(25.0), 0);
        axis.finalize();
        axis
    }

    #[test]
    fn test_sorted_distinct_values() {
        let axis = temps();
        let values: Vec<f64> = axis.sorted_values().iter().filter_map(|v| v.as_f64()).collect();
        assert_eq!(values, vec![18.5, 21.0, 25.0]);
        assert_eq!(axis.occurrences(), 4);
    }

    #[test]
    fn test_kth_ascending_and_descending() {
        let axis = temps();
        assert_eq!(axis.kth(0, false).unwrap().iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(axis.kth(0, true).unwrap().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(axis.kth(1, true).unwrap().iter().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_kth_out_of_range() {
        let axis = temps();
        assert!(axis.kth(3, false).is_none());
        assert!(axis.kth(100, true).is_none());
    }

    #[test]
    fn test_duplicate_insert_counted_once() {
        let mut axis = AxisIndex::new();
        axis.insert(Scalar::from_int(1), 7);
        axis.insert(Scalar::from_int(1), 7);
        axis.finalize();
        assert_eq!(axis.occurrences(), 1);
        assert_eq!(axis.kth(0, false).map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_mixed_numeric_values_share_ranks() {
        let mut axis = AxisIndex::new();
        axis.insert(Scalar::from_int(25), 0);
        axis.insert(Scalar::from_float(20.5), 1);
        axis.insert(Scalar::from_float(18.0), 2);
        axis.insert(Scalar::from_int(18), 3);
        axis.finalize();
        assert_eq!(axis.sorted_values().len(), 3);
        assert_eq!(axis.kth(0, true).unwrap().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(axis.kth(0, false).unwrap().iter().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_unfinalized_has_no_ranks() {
        let mut axis = AxisIndex::new();
        axis.insert(Scalar::from_int(1), 0);
        assert!(axis.kth(0, false).is_none());
    }
}
