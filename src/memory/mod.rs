//! Indexed event collections
//!
//! A `Memory` is derived, in-memory-only state built once from a finite
//! event source. Every predicate and filter queries it.
//!
//! # Design Principles
//!
//! - Immutable once built: narrower collections come from filtering
//! - Deterministic: BTreeMap iteration order, ids ascending
//! - Indices are finalized (deduplicated, sorted) after each batch load

mod axis;
mod memory;
pub mod period;

pub use axis::AxisIndex;
pub use memory::Memory;
