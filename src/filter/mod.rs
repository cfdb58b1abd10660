//! Filter protocol
//!
//! Applies one predicate to its bound collection, producing a narrower
//! collection whose recipe and complexity extend the input's, or `None`
//! when the predicate is inapplicable.

mod filter;

pub use filter::Filter;
