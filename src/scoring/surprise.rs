//! Absolute and relative surprise
//!
//! Surprise measures how far an event's complexity is from the complexity
//! expected of the events it was observed with during the search. Only
//! finite complexities take part in any average.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use crate::event::EventId;
use crate::memory::Memory;
use crate::observability::{log_event_with_fields, LogEvent, ObservationScope};
use crate::search::{Designation, SearchOutcome};

use super::errors::{ScoringError, ScoringResult};

/// Mean of the finite values, `None` when there are none.
pub(crate) fn mean_finite<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Everything known about one event after search and scoring.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub id: EventId,
    /// +infinity (serialized as null) when never isolated
    pub complexity: f64,
    pub recipe: Vec<String>,
    pub designations: Vec<(Vec<String>, f64)>,
    pub co_memberships: usize,
    pub surprise: Option<f64>,
}

/// Scores events from the by-products of a complexity search.
#[derive(Debug)]
pub struct SurpriseScorer {
    pub(crate) memory: Arc<Memory>,
    pub(crate) outcome: SearchOutcome,
    /// Mean complexity over every reachable event
    baseline: Option<f64>,
    /// Absolute surprise of every reachable event
    surprises: BTreeMap<EventId, f64>,
}

impl SurpriseScorer {
    /// Precompute absolute surprise for every event of `memory`.
    pub fn new(memory: Arc<Memory>, outcome: SearchOutcome) -> Self {
        let events = memory.len().to_string();
        let scope = ObservationScope::with_fields("SURPRISE_SCORING", &[("events", events.as_str())]);

        let baseline = mean_finite(outcome.complexities().values().copied());
        let mut scorer = Self {
            memory,
            outcome,
            baseline,
            surprises: BTreeMap::new(),
        };

        let surprises: BTreeMap<EventId, f64> = scorer
            .memory
            .ids()
            .filter_map(|id| scorer.compute_surprise(id).ok().map(|s| (id, s)))
            .collect();
        scorer.surprises = surprises;

        let scored = scorer.surprises.len().to_string();
        log_event_with_fields(LogEvent::SurpriseComputed, &[("scored", scored.as_str())]);
        scope.complete_with_fields(&[("scored", scored.as_str())]);

        scorer
    }

    pub fn memory(&self) -> &Arc<Memory> {
        &self.memory
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    /// Mean complexity over every reachable event.
    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Precomputed absolute surprise of every reachable event.
    pub fn surprises(&self) -> &BTreeMap<EventId, f64> {
        &self.surprises
    }

    /// Finite complexity of a member, or why there is none.
    pub(crate) fn complexity_of(&self, id: EventId) -> ScoringResult<f64> {
        match self.outcome.complexity(id) {
            None => Err(ScoringError::UnknownEvent(id)),
            Some(c) if c.is_finite() => Ok(c),
            Some(_) => Err(ScoringError::Unreachable(id)),
        }
    }

    /// Complexity of a member, +infinity when unknown or unreached.
    pub(crate) fn complexity_or_inf(&self, id: EventId) -> f64 {
        self.outcome.complexity(id).unwrap_or(f64::INFINITY)
    }

    /// Absolute surprise of an event.
    pub fn surprise(&self, id: EventId) -> ScoringResult<f64> {
        if let Some(surprise) = self.surprises.get(&id) {
            return Ok(*surprise);
        }
        self.compute_surprise(id)
    }

    fn compute_surprise(&self, id: EventId) -> ScoringResult<f64> {
        let complexity = self.complexity_of(id)?;
        let baseline = self.baseline.ok_or(ScoringError::NoFiniteComplexities)?;

        let mut means = vec![baseline];
        // Collections reached along different paths with the same recipe
        // set count once.
        let mut seen: BTreeSet<BTreeSet<&str>> = BTreeSet::new();
        for collection in self.outcome.co_memberships(id) {
            let recipe: BTreeSet<&str> = collection.recipe().iter().map(String::as_str).collect();
            if !seen.insert(recipe) {
                continue;
            }
            let others = collection
                .ids()
                .filter(|other| *other != id)
                .map(|other| self.complexity_or_inf(other));
            if let Some(mean) = mean_finite(others) {
                means.push(mean);
            }
        }

        let expected = mean_finite(means).ok_or(ScoringError::NoFiniteComplexities)?;
        Ok((complexity - expected).abs())
    }

    /// Surprise of hypothesis `h` given consequence `c`.
    ///
    /// Averages, over the predicates that held for `h` and also hold for
    /// `c`, the distance between `h`'s complexity and the mean complexity of
    /// every event of the collection satisfying the predicate.
    pub fn relative_surprise(&self, hypothesis: EventId, consequence: EventId) -> ScoringResult<f64> {
        let complexity = self.complexity_of(hypothesis)?;
        let target = self
            .memory
            .get(consequence)
            .ok_or(ScoringError::UnknownEvent(consequence))?;

        let differences = self
            .outcome
            .predicates_held(hypothesis)
            .filter(|predicate| predicate.evaluate(target).is_true())
            .filter_map(|predicate| {
                let holders = self
                    .memory
                    .iter()
                    .filter(|event| predicate.evaluate(event).is_true())
                    .filter_map(|event| event.id())
                    .map(|id| self.complexity_or_inf(id));
                mean_finite(holders).map(|mean| (mean - complexity).abs())
            });

        mean_finite(differences).ok_or(ScoringError::NoQualifyingPredicates {
            hypothesis,
            consequence,
        })
    }

    /// Events whose absolute surprise reaches `threshold`, by id.
    pub fn detect_unusual(&self, threshold: f64) -> Vec<EventId> {
        self.surprises
            .iter()
            .filter(|(_, surprise)| **surprise >= threshold)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Search and scoring results for one event.
    pub fn explain(&self, id: EventId) -> ScoringResult<Explanation> {
        let complexity = self
            .outcome
            .complexity(id)
            .ok_or(ScoringError::UnknownEvent(id))?;
        Ok(Explanation {
            id,
            complexity,
            recipe: self.outcome.recipe(id).to_vec(),
            designations: self
                .outcome
                .designations(id)
                .iter()
                .map(|Designation { recipe, complexity }| (recipe.clone(), *complexity))
                .collect(),
            co_memberships: self.outcome.co_memberships(id).len(),
            surprise: self.surprises.get(&id).copied(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, Label};
    use crate::search::{ComplexitySearch, SearchConfig};

    const DAY: f64 = 86_400.0;
    const T0: f64 = 1_615_809_600.0;

    fn scorer() -> SurpriseScorer {
        let room = Label::root("room");
        let kitchen = Label::child("kitchen", &room);
        let bathroom = Label::child("bathroom", &room);
        let mut events: Vec<Event> = (0..4)
            .map(|i| Event::new(T0 - i as f64 * DAY, Arc::clone(&kitchen)))
            .collect();
        events.push(Event::new(T0 - 10.0 * DAY, bathroom));
        let memory = Arc::new(Memory::from_events(events));
        let outcome = ComplexitySearch::new(SearchConfig::default().with_max_depth(2))
            .unwrap()
            .run(Arc::clone(&memory));
        SurpriseScorer::new(memory, outcome)
    }

    #[test]
    fn test_mean_finite() {
        assert_eq!(mean_finite(vec![1.0, 3.0, f64::INFINITY]), Some(2.0));
        assert_eq!(mean_finite(vec![f64::INFINITY]), None);
        assert_eq!(mean_finite(Vec::new()), None);
    }

    #[test]
    fn test_surprise_of_lone_event_is_distance_to_baseline() {
        let scorer = scorer();
        let baseline = scorer.baseline().unwrap();
        let bathroom = scorer.outcome().complexity(4).unwrap();
        // never co-occurs with anything
        assert!((scorer.surprise(4).unwrap() - (bathroom - baseline).abs()).abs() < 1e-9);
    }

    #[test]
    fn test_surprise_averages_co_memberships() {
        let scorer = scorer();
        let baseline = scorer.baseline().unwrap();
        let complexity = scorer.outcome().complexity(0).unwrap();
        // the kitchen collection holds 1, 2 and 3 besides 0
        let others = mean_finite((1..4).map(|id| scorer.outcome().complexity(id).unwrap())).unwrap();
        let expected = (complexity - (baseline + others) / 2.0).abs();
        assert!((scorer.surprise(0).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_event() {
        let scorer = scorer();
        assert_eq!(scorer.surprise(99), Err(ScoringError::UnknownEvent(99)));
        assert!(scorer.explain(99).is_err());
    }

    #[test]
    fn test_relative_surprise_shared_label() {
        let scorer = scorer();
        // label(room/kitchen) held for 0 and holds for 1
        let relative = scorer.relative_surprise(0, 1).unwrap();
        assert!(relative.is_finite());
        assert!(relative >= 0.0);
    }

    #[test]
    fn test_relative_surprise_without_shared_predicate() {
        let scorer = scorer();
        assert_eq!(
            scorer.relative_surprise(4, 0),
            Err(ScoringError::NoQualifyingPredicates {
                hypothesis: 4,
                consequence: 0
            })
        );
    }

    #[test]
    fn test_detect_unusual_thresholds() {
        let scorer = scorer();
        assert_eq!(scorer.detect_unusual(0.0).len(), 5);
        assert!(scorer.detect_unusual(f64::INFINITY).is_empty());
    }

    #[test]
    fn test_explain() {
        let scorer = scorer();
        let explanation = scorer.explain(4).unwrap();
        assert_eq!(explanation.recipe, vec!["label(room/bathroom)".to_string()]);
        assert_eq!(explanation.designations.len(), 1);
        assert_eq!(explanation.co_memberships, 0);
        assert!(explanation.surprise.is_some());
    }
}
