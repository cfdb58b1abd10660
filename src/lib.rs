//! memorability - complexity, surprise and abduction over timestamped event logs
//!
//! Every event of a log gets a complexity: the description length of the
//! cheapest discriminating predicate chain that isolates it. Surprise and
//! abduction scores are derived from the by-products of that search.

pub mod cli;
pub mod event;
pub mod filter;
pub mod memory;
pub mod observability;
pub mod predicate;
pub mod scoring;
pub mod search;
