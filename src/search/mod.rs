//! Complexity search
//!
//! Bounded breadth-first minimum-description-length search that finds, for
//! every event, the cheapest predicate chain isolating it.
//!
//! # Usage
//!
//! ```ignore
//! use memorability::search::{ComplexitySearch, SearchConfig};
//!
//! let search = ComplexitySearch::new(SearchConfig::default())?;
//! let outcome = search.run(Arc::new(memory));
//! let cost = outcome.complexity(event_id);
//! ```

mod config;
mod errors;
mod outcome;
mod search;

pub use config::SearchConfig;
pub use errors::{ConfigError, ConfigResult, Severity};
pub use outcome::{Designation, SearchOutcome};
pub use search::ComplexitySearch;
