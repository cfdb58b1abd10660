//! Bounded breadth-first complexity search
//!
//! Each pass takes a frontier of (collection, cost) pairs and, for every
//! configured family in order, enumerates programs 0, 1, 2, ... against
//! each collection until the family becomes inapplicable. Results that
//! narrow the collection are recorded for their members; singletons become
//! designations and larger results join the next frontier.
//!
//! # Invariants
//!
//! - Family order and program order are fixed, so complexities are
//!   reproducible across runs
//! - Costs only grow along a path, so pruning on `max_complexity` never
//!   discards a path that could become cheaper
//! - No designation and no frontier entry exceeds `max_complexity`
//! - Best-known complexities never get worse from one pass to the next

use std::sync::Arc;

use crate::filter::Filter;
use crate::memory::Memory;
use crate::observability::{log_event_with_fields, trace_event, LogEvent, SearchMetrics, Timer};
use crate::predicate::{Predicate, PredicateFamily};

use super::config::SearchConfig;
use super::errors::ConfigResult;
use super::outcome::SearchOutcome;

/// A collection waiting to be narrowed, with the cost of reaching it.
type FrontierEntry = (Arc<Memory>, f64);

/// Minimum-description-length search over a collection.
#[derive(Debug, Clone)]
pub struct ComplexitySearch {
    config: SearchConfig,
    filter: Filter,
}

impl ComplexitySearch {
    /// Validate `config` and prepare a search.
    pub fn new(config: SearchConfig) -> ConfigResult<Self> {
        config.validate()?;
        let filter = Filter::new(config.predicates.len(), config.encoding);
        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Run the search to its depth or cost bound.
    ///
    /// Events never isolated keep a complexity of +infinity.
    pub fn run(&self, memory: Arc<Memory>) -> SearchOutcome {
        let timer = Timer::new();
        let metrics = SearchMetrics::new();
        let mut outcome = SearchOutcome::for_memory(&memory);

        log_event_with_fields(
            LogEvent::SearchStart,
            &[
                ("events", &memory.len().to_string()),
                ("predicates", &self.config.predicates.len().to_string()),
                ("max_depth", &self.config.max_depth.to_string()),
                ("max_complexity", &self.config.max_complexity.to_string()),
            ],
        );

        let mut frontier: Vec<FrontierEntry> = vec![(memory, 0.0)];
        let mut passes = 0;
        while passes < self.config.max_depth && !frontier.is_empty() {
            let next = self.pass(&frontier, &mut outcome, &metrics);
            passes += 1;
            metrics.increment_passes();

            trace_event(
                LogEvent::SearchPass,
                &[
                    ("pass", &passes.to_string()),
                    ("frontier", &frontier.len().to_string()),
                    ("next_frontier", &next.len().to_string()),
                    ("reachable", &outcome.reachable_count().to_string()),
                ],
            );
            frontier = next;
        }

        outcome.passes = passes;
        outcome.metrics = metrics.snapshot();

        log_event_with_fields(
            LogEvent::SearchComplete,
            &[
                ("passes", &passes.to_string()),
                ("reachable", &outcome.reachable_count().to_string()),
                ("singletons", &outcome.metrics.singletons.to_string()),
                ("elapsed_ms", &timer.elapsed_ms()),
            ],
        );

        outcome
    }

    /// One breadth-first pass; returns the next frontier.
    fn pass(
        &self,
        frontier: &[FrontierEntry],
        outcome: &mut SearchOutcome,
        metrics: &SearchMetrics,
    ) -> Vec<FrontierEntry> {
        let mut next = Vec::new();
        for (collection, cost) in frontier {
            if collection.is_empty() {
                continue;
            }
            if *cost >= self.config.max_complexity {
                metrics.increment_pruned();
                continue;
            }
            for family in &self.config.predicates {
                self.enumerate(*family, collection, *cost, outcome, metrics, &mut next);
            }
        }
        next
    }

    /// Try programs 0, 1, 2, ... of one family until it becomes
    /// inapplicable to `collection`.
    fn enumerate(
        &self,
        family: PredicateFamily,
        collection: &Arc<Memory>,
        cost: f64,
        outcome: &mut SearchOutcome,
        metrics: &SearchMetrics,
        next: &mut Vec<FrontierEntry>,
    ) {
        for program in 0u64.. {
            let predicate = Predicate::new(family, program, Arc::clone(collection));
            metrics.increment_filters_applied();

            let Some(result) = self.filter.apply(&predicate) else {
                metrics.increment_incompatible();
                break;
            };

            if result.len() == collection.len() {
                metrics.increment_non_discriminating();
                continue;
            }

            let result = Arc::new(result);
            let shared = (result.len() > 1).then_some(&result);
            for id in result.ids() {
                outcome.observe(id, &predicate, shared);
            }

            let new_cost = cost + self.filter.step_cost(&predicate);
            if new_cost > self.config.max_complexity {
                metrics.increment_pruned();
                continue;
            }

            if let Some(id) = result.item().and_then(|event| event.id()) {
                metrics.increment_singletons();
                if outcome.designate(id, result.recipe(), new_cost) {
                    metrics.increment_improvements();
                }
            } else if result.len() > 1 {
                next.push((result, new_cost));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, Label};
    use crate::predicate::bit_length;

    const DAY: f64 = 86_400.0;
    const T0: f64 = 1_615_809_600.0;

    fn rooms() -> Arc<Memory> {
        let room = Label::root("room");
        let kitchen = Label::child("kitchen", &room);
        let bathroom = Label::child("bathroom", &room);
        let mut events: Vec<Event> = (0..4)
            .map(|i| Event::new(T0 - i as f64 * DAY, Arc::clone(&kitchen)))
            .collect();
        events.push(Event::new(T0 - 10.0 * DAY, bathroom));
        Arc::new(Memory::from_events(events))
    }

    fn search(config: SearchConfig) -> ComplexitySearch {
        ComplexitySearch::new(config).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(ComplexitySearch::new(SearchConfig::default().with_max_depth(0)).is_err());
    }

    #[test]
    fn test_unique_label_isolated_in_one_pass() {
        let config = SearchConfig::default().with_max_depth(1);
        let outcome = search(config.clone()).run(rooms());

        let family_term = (config.predicates.len() as f64).log2() + 1.0;
        assert_eq!(outcome.complexity(4), Some(bit_length(2) + family_term));
        assert_eq!(outcome.recipe(4), &["label(room/bathroom)".to_string()]);
        assert_eq!(outcome.passes(), 1);
    }

    #[test]
    fn test_mixed_root_kitchens_need_two_passes() {
        let one = search(SearchConfig::default().with_max_depth(1)).run(rooms());
        assert!(!one.is_reachable(0));

        let two = search(SearchConfig::default().with_max_depth(2)).run(rooms());
        assert!(two.is_reachable(0));
        assert_eq!(two.recipe(0).len(), 2);
        assert_eq!(two.recipe(0)[0], "label(room/kitchen)");
        assert_eq!(two.recipe(0)[1], "day(0)");
    }

    #[test]
    fn test_co_memberships_and_predicates_recorded() {
        let outcome = search(SearchConfig::default().with_max_depth(2)).run(rooms());
        assert!(!outcome.co_memberships(0).is_empty());
        assert!(outcome.co_memberships(0).iter().all(|m| m.len() > 1));
        assert!(outcome.predicates_held(0).count() >= 2);
        // the bathroom is only ever seen alone
        assert!(outcome.co_memberships(4).is_empty());
    }

    #[test]
    fn test_cost_bound_limits_designations() {
        let bound = 10.0;
        let outcome = search(SearchConfig::default().with_max_complexity(bound)).run(rooms());
        for id in 0..5 {
            for designation in outcome.designations(id) {
                assert!(designation.complexity <= bound);
            }
        }
        assert!(outcome.is_reachable(4));
        assert!(!outcome.is_reachable(0));
        assert!(outcome.metrics().pruned > 0);
    }

    #[test]
    fn test_search_stops_on_empty_frontier() {
        let label = Label::root("solo");
        let memory = Arc::new(Memory::from_events(vec![Event::new(T0, label)]));
        let outcome = search(SearchConfig::default()).run(memory);
        assert_eq!(outcome.passes(), 1);
        assert!(!outcome.is_reachable(0));
        assert_eq!(outcome.metrics().passes, 1);
    }

    #[test]
    fn test_runs_are_independent_and_reproducible() {
        let engine = search(SearchConfig::default());
        let first = engine.run(rooms());
        let second = engine.run(rooms());
        assert_eq!(first.complexities(), second.complexities());
        assert_eq!(first.designations(0), second.designations(0));
    }
}
