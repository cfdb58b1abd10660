//! Narrowing a collection by one predicate
//!
//! The generic path evaluates the predicate on every member and refuses to
//! apply partially: one undefined verdict makes the whole filter
//! incompatible. The optimized path answers rank, day and month predicates
//! straight from the collection's indices, in time proportional to the
//! result, and defers to the generic path for every other family.

use crate::event::EventId;
use crate::memory::Memory;
use crate::predicate::{Encoding, Predicate};

/// Applies predicates to the collection they are bound to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filter {
    /// Number of predicate families available to the search
    family_count: usize,
    encoding: Encoding,
}

impl Filter {
    /// A filter pricing the family choice among `family_count` families.
    pub fn new(family_count: usize, encoding: Encoding) -> Self {
        Self {
            family_count,
            encoding,
        }
    }

    pub fn family_count(&self) -> usize {
        self.family_count
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Fixed per-step cost of choosing a family: `log2(F) + 1`.
    pub fn choice_cost(&self) -> f64 {
        (self.family_count.max(1) as f64).log2() + 1.0
    }

    /// Cost added by one filtering step with `predicate`.
    pub fn step_cost(&self, predicate: &Predicate) -> f64 {
        predicate.encoding_length(self.encoding) + self.choice_cost()
    }

    /// Scan every member. `None` when the predicate is incompatible with
    /// its collection.
    pub fn apply_generic(&self, predicate: &Predicate) -> Option<Memory> {
        let memory = predicate.memory();
        let mut kept = Vec::new();
        for event in memory.iter() {
            let verdict = predicate.evaluate(event);
            if verdict.is_undefined() {
                return None;
            }
            if verdict.is_true() {
                kept.extend(event.id());
            }
        }
        Some(self.narrow(predicate, kept))
    }

    /// Same result as `apply_generic`, answered from indices where the
    /// family allows it.
    pub fn apply(&self, predicate: &Predicate) -> Option<Memory> {
        if !predicate.family().is_index_backed() {
            return self.apply_generic(predicate);
        }
        let kept = predicate.indexed_members()?;
        Some(self.narrow(predicate, kept))
    }

    fn narrow(&self, predicate: &Predicate, kept: Vec<EventId>) -> Memory {
        let memory = predicate.memory();
        let mut recipe = memory.recipe().to_vec();
        recipe.push(predicate.description());
        let complexity = memory.complexity() + self.step_cost(predicate);
        memory.subset(kept, recipe, complexity)
    }
}
