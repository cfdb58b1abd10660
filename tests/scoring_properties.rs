//! Scoring Property Tests
//!
//! Tests for scoring invariants over a synthetic log of 100 events:
//! - Stricter thresholds flag fewer or equal events
//! - Abduction candidates are strictly earlier than the consequence
//! - Abduction ranking is deterministic and bounded
//! - Missing data is reported, never coerced to zero

use memorability::event::{Duration, Event, Label};
use memorability::memory::Memory;
use memorability::scoring::{ScoringError, SurpriseScorer, ABDUCTION_LIMIT};
use memorability::search::{ComplexitySearch, SearchConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const MINUTE: f64 = 60.0;
// 2021-03-15T00:00:00Z
const MIDNIGHT: f64 = 1_615_766_400.0;

// =============================================================================
// Helper Functions
// =============================================================================

/// 100 events over ten days: temperature readings with normally spread
/// values plus a few door openings, from a seeded generator.
fn synthetic_log(seed: u64) -> Arc<Memory> {
    let mut rng = StdRng::seed_from_u64(seed);
    let home = Label::root("home");
    let reading = Label::new("reading")
        .under(&home)
        .with_axis("temp", true)
        .shared();
    let door = Label::child("door", &home);

    let mut timestamp = MIDNIGHT;
    let events: Vec<Event> = (0..100)
        .map(|i| {
            timestamp += rng.gen_range(30.0..250.0) * MINUTE;
            let device = ["hall", "bedroom", "kitchen", "garage"][rng.gen_range(0..4)];
            if i % 10 == 7 {
                Event::new(timestamp, Arc::clone(&door))
                    .with_duration(Duration::Seconds(rng.gen_range(1.0..30.0)))
                    .with_characteristic("device", device)
            } else {
                // sum of uniforms: bell-shaped around 20
                let temp: f64 = (0..4).map(|_| rng.gen_range(15.0..25.0)).sum::<f64>() / 4.0;
                Event::new(timestamp, Arc::clone(&reading))
                    .with_duration(Duration::Seconds(MINUTE))
                    .with_characteristic("temp", (temp * 10.0).round() / 10.0)
                    .with_characteristic("device", device)
            }
        })
        .collect();
    Arc::new(Memory::from_events(events))
}

fn scorer(seed: u64) -> SurpriseScorer {
    let memory = synthetic_log(seed);
    let search = ComplexitySearch::new(SearchConfig::default().with_max_depth(3)).unwrap();
    let outcome = search.run(Arc::clone(&memory));
    SurpriseScorer::new(memory, outcome)
}

// =============================================================================
// Unusual Event Detection
// =============================================================================

/// Raising the threshold never flags more events.
#[test]
fn test_detect_unusual_monotonic() {
    let scorer = scorer(7);
    assert_eq!(scorer.memory().len(), 100);
    assert!(!scorer.surprises().is_empty());

    let max = scorer
        .surprises()
        .values()
        .copied()
        .fold(0.0_f64, f64::max);
    let mut previous = usize::MAX;
    for step in 0..=50 {
        let threshold = max * step as f64 / 40.0;
        let flagged = scorer.detect_unusual(threshold);
        assert!(flagged.len() <= previous, "threshold {} flagged more", threshold);
        previous = flagged.len();
    }
    assert_eq!(scorer.detect_unusual(max + 1.0).len(), 0);
    assert_eq!(scorer.detect_unusual(0.0).len(), scorer.surprises().len());
}

/// Flagged events are exactly those at or above the threshold, in id order.
#[test]
fn test_detect_unusual_matches_surprise_map() {
    let scorer = scorer(11);
    let threshold = 2.0;
    let flagged = scorer.detect_unusual(threshold);
    let expected: Vec<u64> = scorer
        .surprises()
        .iter()
        .filter(|(_, s)| **s >= threshold)
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(flagged, expected);
    assert!(flagged.windows(2).all(|w| w[0] < w[1]));
}

/// Every precomputed surprise is finite and non-negative, and unreachable
/// events have none.
#[test]
fn test_surprise_map_well_formed() {
    let scorer = scorer(3);
    for (id, surprise) in scorer.surprises() {
        assert!(surprise.is_finite() && *surprise >= 0.0);
        assert!(scorer.outcome().is_reachable(*id));
    }
    for id in scorer.memory().ids() {
        if !scorer.outcome().is_reachable(id) {
            assert_eq!(scorer.surprise(id), Err(ScoringError::Unreachable(id)));
        }
    }
}

// =============================================================================
// Abduction
// =============================================================================

/// Candidates are always strictly earlier than the consequence.
#[test]
fn test_abduction_respects_causality() {
    let scorer = scorer(5);
    for consequence in scorer.memory().iter() {
        let id = consequence.id().unwrap();
        for (candidate, score) in scorer.abduction(id).unwrap() {
            let earlier = scorer.memory().get(candidate).unwrap();
            assert!(earlier.timestamp() < consequence.timestamp());
            assert!(score.is_finite() && score >= 0.0);
        }
    }
}

/// Rankings are bounded, ordered and reproducible.
#[test]
fn test_abduction_ranking_deterministic() {
    let first = scorer(5);
    let second = scorer(5);
    for id in 90..100 {
        let ranked = first.abduction(id).unwrap();
        assert!(ranked.len() <= ABDUCTION_LIMIT);
        for pair in ranked.windows(2) {
            assert!(pair[0].1 > pair[1].1 || (pair[0].1 == pair[1].1 && pair[0].0 < pair[1].0));
        }
        assert_eq!(ranked, second.abduction(id).unwrap());
    }
}

/// Late events have explanations to choose from.
#[test]
fn test_late_events_have_candidates() {
    let scorer = scorer(5);
    let with_candidates = (50..100)
        .filter(|id| !scorer.abduction(*id).unwrap().is_empty())
        .count();
    assert!(with_candidates > 0);
}

// =============================================================================
// Relative Surprise
// =============================================================================

/// Relative surprise is either a finite non-negative number or an explicit
/// "no qualifying predicate" outcome.
#[test]
fn test_relative_surprise_outcomes() {
    let scorer = scorer(9);
    let mut answered = 0;
    for hypothesis in 0..20u64 {
        for consequence in 80..100u64 {
            match scorer.relative_surprise(hypothesis, consequence) {
                Ok(value) => {
                    assert!(value.is_finite() && value >= 0.0);
                    answered += 1;
                }
                Err(ScoringError::NoQualifyingPredicates { .. }) => {}
                Err(ScoringError::Unreachable(id)) => assert_eq!(id, hypothesis),
                Err(other) => panic!("unexpected error: {}", other),
            }
        }
    }
    assert!(answered > 0);
}
