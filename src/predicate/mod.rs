//! Predicate families
//!
//! Parametrized, partial boolean tests over events. A predicate is bound to
//! a collection and an integer program; evaluation answers true, false or
//! undefined, and undefined means the whole predicate is inapplicable to
//! the bound collection.

pub mod encoding;
mod family;
mod predicate;

pub use encoding::{bit_length, bit_length_continuous, list_bit_length, Encoding};
pub use family::PredicateFamily;
pub use predicate::{split_rank_program, Predicate, Verdict};
