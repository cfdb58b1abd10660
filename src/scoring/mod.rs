//! Surprise and abduction scoring
//!
//! Consumes the by-product maps of a complexity search: absolute surprise
//! for every event, relative surprise between two events, unusual-event
//! detection and ranked abduction queries.

mod abduction;
mod errors;
mod surprise;

pub use abduction::ABDUCTION_LIMIT;
pub use errors::{ScoringError, ScoringResult, Severity};
pub use surprise::{Explanation, SurpriseScorer};
