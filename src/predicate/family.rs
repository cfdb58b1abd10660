//! The closed set of predicate families
//!
//! Each family is a tag; its program-validity and evaluation rules live in
//! `Predicate::evaluate`, and the optimized filter dispatches on the tag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A parametrized family of boolean tests over events.
///
/// The declaration order is also the `Ord` order, used to key predicates
/// deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateFamily {
    /// Label at a frequency rank of the collection's label index
    HasLabel,
    /// Rank position along one of the collection's clever axes
    AxisRank,
    /// One of the collection's devices
    Device,
    /// N calendar days before a reference instant
    Day,
    /// N calendar months before the collection's latest timestamp
    Month,
    /// Location equality, against an auxiliary event or a zone
    Location,
    /// Arbitrary choice of one member
    RandomChoice,
}

impl PredicateFamily {
    /// Every family, in declaration order.
    pub const ALL: [PredicateFamily; 7] = [
        PredicateFamily::HasLabel,
        PredicateFamily::AxisRank,
        PredicateFamily::Device,
        PredicateFamily::Day,
        PredicateFamily::Month,
        PredicateFamily::Location,
        PredicateFamily::RandomChoice,
    ];

    /// Families searched when none are configured.
    pub fn default_set() -> Vec<PredicateFamily> {
        vec![
            PredicateFamily::HasLabel,
            PredicateFamily::AxisRank,
            PredicateFamily::Day,
            PredicateFamily::Device,
            PredicateFamily::Location,
        ]
    }

    /// Returns the snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            PredicateFamily::HasLabel => "has_label",
            PredicateFamily::AxisRank => "axis_rank",
            PredicateFamily::Device => "device",
            PredicateFamily::Day => "day",
            PredicateFamily::Month => "month",
            PredicateFamily::Location => "location",
            PredicateFamily::RandomChoice => "random_choice",
        }
    }

    /// Whether the optimized filter answers this family from indices.
    pub fn is_index_backed(&self) -> bool {
        matches!(
            self,
            PredicateFamily::AxisRank | PredicateFamily::Day | PredicateFamily::Month
        )
    }
}

impl fmt::Display for PredicateFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
