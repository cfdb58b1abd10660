//! Per-event results of a complexity search

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::event::EventId;
use crate::memory::Memory;
use crate::observability::MetricsSnapshot;
use crate::predicate::Predicate;

/// A predicate chain that isolated exactly one event, with its cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Designation {
    pub recipe: Vec<String>,
    pub complexity: f64,
}

/// Everything a search discovered, keyed by event id.
///
/// Owned by the caller; a fresh search always produces a fresh outcome.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub(crate) complexities: BTreeMap<EventId, f64>,
    pub(crate) recipes: BTreeMap<EventId, Vec<String>>,
    pub(crate) designations: BTreeMap<EventId, Vec<Designation>>,
    pub(crate) co_memberships: BTreeMap<EventId, Vec<Arc<Memory>>>,
    pub(crate) predicates_held: BTreeMap<EventId, BTreeSet<Predicate>>,
    pub(crate) passes: usize,
    pub(crate) metrics: MetricsSnapshot,
}

impl SearchOutcome {
    /// Outcome with every event of `memory` unreached.
    pub(crate) fn for_memory(memory: &Memory) -> Self {
        Self {
            complexities: memory.ids().map(|id| (id, f64::INFINITY)).collect(),
            ..Self::default()
        }
    }

    /// Best-known complexity; +infinity when never isolated, `None` for
    /// ids the search never saw.
    pub fn complexity(&self, id: EventId) -> Option<f64> {
        self.complexities.get(&id).copied()
    }

    /// All complexities, by id.
    pub fn complexities(&self) -> &BTreeMap<EventId, f64> {
        &self.complexities
    }

    /// Whether the event was isolated within the bounds.
    pub fn is_reachable(&self, id: EventId) -> bool {
        self.complexity(id).map_or(false, f64::is_finite)
    }

    /// Recipe of the cheapest designation, empty when unreached.
    pub fn recipe(&self, id: EventId) -> &[String] {
        self.recipes.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn designations(&self, id: EventId) -> &[Designation] {
        self.designations.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-singleton collections the event was observed in.
    pub fn co_memberships(&self, id: EventId) -> &[Arc<Memory>] {
        self.co_memberships.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Predicates that held for the event along some explored path.
    pub fn predicates_held(&self, id: EventId) -> impl Iterator<Item = &Predicate> {
        self.predicates_held.get(&id).into_iter().flatten()
    }

    /// Number of passes actually run.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn metrics(&self) -> &MetricsSnapshot {
        &self.metrics
    }

    /// Number of events isolated within the bounds.
    pub fn reachable_count(&self) -> usize {
        self.complexities.values().filter(|c| c.is_finite()).count()
    }

    /// Record that `predicate` held for the event, and the non-singleton
    /// collection it produced, if any.
    pub(crate) fn observe(
        &mut self,
        id: EventId,
        predicate: &Predicate,
        collection: Option<&Arc<Memory>>,
    ) {
        if let Some(collection) = collection {
            self.co_memberships
                .entry(id)
                .or_default()
                .push(Arc::clone(collection));
        }
        let held = self.predicates_held.entry(id).or_default();
        if !held.contains(predicate) {
            held.insert(predicate.clone());
        }
    }

    /// Record a designation; returns true when it improves the best-known
    /// complexity.
    pub(crate) fn designate(&mut self, id: EventId, recipe: &[String], complexity: f64) -> bool {
        self.designations.entry(id).or_default().push(Designation {
            recipe: recipe.to_vec(),
            complexity,
        });

        let best = self.complexities.entry(id).or_insert(f64::INFINITY);
        if complexity < *best {
            *best = complexity;
            self.recipes.insert(id, recipe.to_vec());
            true
        } else {
            false
        }
    }
}
