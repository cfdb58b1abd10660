//! Event and label model
//!
//! The atomic data unit of the crate: immutable events, the tree-shaped
//! label taxonomy over event kinds, and totally ordered characteristic
//! values.

mod event;
mod label;
mod scalar;

pub use event::{
    is_builtin_axis, Duration, Event, EventId, DEVICE_KEY, DURATION_AXIS, LOCATION_KEY,
    TIMESTAMP_AXIS,
};
pub use label::{Label, LabelSpec};
pub use scalar::Scalar;
