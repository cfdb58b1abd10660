//! Abduction: which earlier events best explain a given one
//!
//! Every collection the consequence was observed in during the search
//! contributes one sample per strictly earlier member: the distance between
//! that member's complexity and the collection's mean complexity.
//! Candidates are ranked by their average sample.

use std::collections::BTreeMap;

use crate::event::EventId;
use crate::observability::{log_event_with_fields, LogEvent};

use super::errors::{ScoringError, ScoringResult};
use super::surprise::{mean_finite, SurpriseScorer};

/// Maximum number of candidates returned by an abduction query.
pub const ABDUCTION_LIMIT: usize = 10;

impl SurpriseScorer {
    /// Ranked candidate explanations for `consequence`: at most
    /// `ABDUCTION_LIMIT` (id, score) pairs, by descending score then
    /// ascending id. Only events strictly earlier than the consequence are
    /// eligible.
    pub fn abduction(&self, consequence: EventId) -> ScoringResult<Vec<(EventId, f64)>> {
        let event = self
            .memory
            .get(consequence)
            .ok_or(ScoringError::UnknownEvent(consequence))?;
        let deadline = event.timestamp();

        let mut samples: BTreeMap<EventId, Vec<f64>> = BTreeMap::new();
        for collection in self.outcome.co_memberships(consequence) {
            let Some(mean) = mean_finite(collection.ids().map(|id| self.complexity_or_inf(id)))
            else {
                continue;
            };
            for member in collection.iter() {
                let Some(id) = member.id() else {
                    continue;
                };
                if id == consequence || member.timestamp() >= deadline {
                    continue;
                }
                let complexity = self.complexity_or_inf(id);
                if complexity.is_finite() {
                    samples.entry(id).or_default().push((mean - complexity).abs());
                }
            }
        }

        let mut ranked: Vec<(EventId, f64)> = samples
            .into_iter()
            .filter_map(|(id, scores)| mean_finite(scores).map(|score| (id, score)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(ABDUCTION_LIMIT);

        log_event_with_fields(
            LogEvent::AbductionQuery,
            &[
                ("consequence", consequence.to_string().as_str()),
                ("candidates", ranked.len().to_string().as_str()),
            ],
        );

        Ok(ranked)
    }
}
