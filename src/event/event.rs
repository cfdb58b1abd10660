//! Event records
//!
//! An event is an immutable record of something that happened: a start
//! timestamp (epoch seconds), a duration, a label and an open set of named
//! characteristics. Its identifier is metadata assigned by the collection
//! it is inserted into and is not part of its value identity.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::label::Label;
use super::scalar::Scalar;

/// Identifier assigned to an event on insertion into a collection.
pub type EventId = u64;

/// Built-in axis holding the event timestamp.
pub const TIMESTAMP_AXIS: &str = "timestamp";
/// Built-in axis holding the event duration.
pub const DURATION_AXIS: &str = "duration";
/// Characteristic naming the device that produced the event.
pub const DEVICE_KEY: &str = "device";
/// Characteristic naming the zone the event happened in.
pub const LOCATION_KEY: &str = "location";

/// How long an event lasted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Duration {
    /// Finished after the given number of seconds.
    Seconds(f64),
    /// Still going on.
    Ongoing,
}

impl Duration {
    /// Interpret a raw duration where any negative value means "ongoing".
    pub fn from_raw(seconds: f64) -> Self {
        if seconds < 0.0 {
            Duration::Ongoing
        } else {
            Duration::Seconds(seconds)
        }
    }

    pub fn is_ongoing(&self) -> bool {
        matches!(self, Duration::Ongoing)
    }

    /// Value on the duration axis. Ongoing events rank as the longest.
    pub fn axis_value(&self) -> f64 {
        match self {
            Duration::Seconds(s) => *s,
            Duration::Ongoing => f64::INFINITY,
        }
    }

    fn hash_bits(&self) -> u64 {
        match self {
            Duration::Seconds(s) => s.to_bits(),
            Duration::Ongoing => u64::MAX,
        }
    }
}

/// Whether `key` names an axis every event derives from its own fields.
pub fn is_builtin_axis(key: &str) -> bool {
    key == TIMESTAMP_AXIS || key == DURATION_AXIS
}

/// An immutable timestamped record.
#[derive(Debug, Clone)]
pub struct Event {
    timestamp: f64,
    duration: Duration,
    label: Arc<Label>,
    characteristics: BTreeMap<String, Scalar>,
    id: Option<EventId>,
}

impl Event {
    /// Create an ongoing event with no characteristics.
    pub fn new(timestamp: f64, label: Arc<Label>) -> Self {
        Self {
            timestamp,
            duration: Duration::Ongoing,
            label,
            characteristics: BTreeMap::new(),
            id: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Attach a characteristic. The built-in `timestamp` and `duration`
    /// axes cannot be overridden; values under those names are dropped.
    pub fn with_characteristic(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        let key = key.into();
        if !is_builtin_axis(&key) {
            self.characteristics.insert(key, value.into());
        }
        self
    }

    /// Copy of this event carrying the given identifier.
    pub(crate) fn with_id(&self, id: EventId) -> Self {
        let mut event = self.clone();
        event.id = Some(id);
        event
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn label(&self) -> &Arc<Label> {
        &self.label
    }

    pub fn characteristics(&self) -> &BTreeMap<String, Scalar> {
        &self.characteristics
    }

    /// Identifier, once the event belongs to a collection.
    pub fn id(&self) -> Option<EventId> {
        self.id
    }

    /// Value of a characteristic, resolving the built-in `timestamp` and
    /// `duration` axes.
    pub fn characteristic(&self, key: &str) -> Option<Scalar> {
        match key {
            TIMESTAMP_AXIS => Some(Scalar::from_float(self.timestamp)),
            DURATION_AXIS => Some(Scalar::from_float(self.duration.axis_value())),
            _ => self.characteristics.get(key).cloned(),
        }
    }

    /// Device name, when the event carries one.
    pub fn device(&self) -> Option<String> {
        self.characteristics.get(DEVICE_KEY).map(|v| v.to_string())
    }

    /// Location, when the event carries one.
    pub fn location(&self) -> Option<&Scalar> {
        self.characteristics.get(LOCATION_KEY)
    }

    /// Whether `label` is this event's label or one of its forebears.
    pub fn has_label(&self, label: &Label) -> bool {
        self.label.descends_from(label)
    }

    /// Whether the event is still going on at `current_time`.
    pub fn is_going(&self, current_time: f64) -> bool {
        match self.duration {
            Duration::Ongoing => true,
            Duration::Seconds(d) => {
                self.timestamp + d > current_time && current_time >= self.timestamp
            }
        }
    }

    /// Whether the event intersects the open interval `(t0, t1)`.
    pub fn time_intersect(&self, t0: f64, t1: f64) -> bool {
        match self.duration {
            Duration::Ongoing => self.timestamp < t1,
            Duration::Seconds(d) => {
                let end = self.timestamp + d;
                (t0 < end && end < t1) || (t0 < self.timestamp && self.timestamp < t1)
            }
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && self.duration.hash_bits() == other.duration.hash_bits()
            && self.timestamp.to_bits() == other.timestamp.to_bits()
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        self.duration.hash_bits().hash(state);
        self.timestamp.to_bits().hash(state);
    }
}
