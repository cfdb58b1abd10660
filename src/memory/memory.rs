//! Indexed event collection
//!
//! A `Memory` is an immutable-once-built set of events plus the indices every
//! predicate and filter queries: per-axis rank indices, label membership,
//! day/month groupings and device/zone groupings.
//!
//! # Invariants
//!
//! - Ids assigned within a collection are unique and increase in insertion
//!   order, starting at `max_event_id + 1`
//! - Derived collections keep the ids of their members
//! - Content never changes after construction; narrower collections are
//!   built by filtering
//! - All iteration orders are deterministic (id order, BTreeMap order)

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::event::{Event, EventId, Label, Scalar, DURATION_AXIS, TIMESTAMP_AXIS};

use super::axis::AxisIndex;
use super::period;

/// An indexed, immutable set of events.
#[derive(Debug, Clone)]
pub struct Memory {
    /// Members, keyed by id
    events: BTreeMap<EventId, Arc<Event>>,
    /// Descriptions of the predicates that produced this collection
    recipe: Vec<String>,
    /// Accumulated description length of the recipe
    complexity: f64,
    /// Axis name -> rank index
    axes: BTreeMap<String, AxisIndex>,
    /// Label -> members whose ancestor chain contains it
    labels: HashMap<Label, BTreeSet<EventId>>,
    /// Labels by descending frequency (then depth, then path)
    label_order: Vec<Label>,
    /// `YYYYMMDD` -> members
    events_by_day: BTreeMap<String, BTreeSet<EventId>>,
    /// `YYYYMM` -> members
    events_by_month: BTreeMap<String, BTreeSet<EventId>>,
    /// Day keys, most recent first
    days_sorted: Vec<String>,
    /// Month keys, most recent first
    months_sorted: Vec<String>,
    /// Device name -> members
    events_by_device: BTreeMap<String, BTreeSet<EventId>>,
    /// Location value -> members
    events_by_zone: BTreeMap<Scalar, BTreeSet<EventId>>,
    max_event_id: Option<EventId>,
    first_timestamp: f64,
    last_timestamp: f64,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates an empty root collection
    pub fn new() -> Self {
        Self::with_recipe(Vec::new(), 0.0)
    }

    fn with_recipe(recipe: Vec<String>, complexity: f64) -> Self {
        Self {
            events: BTreeMap::new(),
            recipe,
            complexity,
            axes: BTreeMap::new(),
            labels: HashMap::new(),
            label_order: Vec::new(),
            events_by_day: BTreeMap::new(),
            events_by_month: BTreeMap::new(),
            days_sorted: Vec::new(),
            months_sorted: Vec::new(),
            events_by_device: BTreeMap::new(),
            events_by_zone: BTreeMap::new(),
            max_event_id: None,
            first_timestamp: f64::INFINITY,
            last_timestamp: f64::NEG_INFINITY,
        }
    }

    /// Build a root collection from a finite event source.
    ///
    /// Events are assigned ids in iteration order. Events that already carry
    /// an id keep it.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        let mut memory = Self::new();
        for event in events {
            let event = match event.id() {
                Some(_) => event,
                None => event.with_id(memory.next_id()),
            };
            memory.append(Arc::new(event));
        }
        memory.finalize();
        memory
    }

    /// Build a narrower collection from members of this one.
    ///
    /// Ids that do not belong to this collection are ignored.
    pub fn subset<I>(&self, ids: I, recipe: Vec<String>, complexity: f64) -> Self
    where
        I: IntoIterator<Item = EventId>,
    {
        let mut memory = Self::with_recipe(recipe, complexity);
        for id in ids {
            if let Some(event) = self.events.get(&id) {
                memory.append(Arc::clone(event));
            }
        }
        memory.finalize();
        memory
    }

    fn next_id(&self) -> EventId {
        self.max_event_id.map_or(0, |max| max + 1)
    }

    /// Index a single event. All the per-axis, label and period structures
    /// are updated here; `finalize` must run after a batch.
    fn append(&mut self, event: Arc<Event>) {
        let Some(id) = event.id() else {
            return;
        };

        if let Some(date) = period::date_of(event.timestamp()) {
            self.events_by_day
                .entry(period::day_key(date))
                .or_default()
                .insert(id);
            self.events_by_month
                .entry(period::month_key(date))
                .or_default()
                .insert(id);
        }

        if let Some(device) = event.device() {
            self.events_by_device.entry(device).or_default().insert(id);
        }
        if let Some(zone) = event.location() {
            self.events_by_zone.entry(zone.clone()).or_default().insert(id);
        }

        self.max_event_id = Some(self.max_event_id.map_or(id, |max| max.max(id)));
        self.first_timestamp = self.first_timestamp.min(event.timestamp());
        self.last_timestamp = self.last_timestamp.max(event.timestamp());

        for axis in [TIMESTAMP_AXIS, DURATION_AXIS] {
            if let Some(value) = event.characteristic(axis) {
                self.axes.entry(axis.to_string()).or_default().insert(value, id);
            }
        }
        for (axis, value) in event.characteristics() {
            self.axes
                .entry(axis.clone())
                .or_default()
                .insert(value.clone(), id);
        }

        for label in event.label().ancestors() {
            self.labels.entry(label.clone()).or_default().insert(id);
        }

        self.events.insert(id, event);
    }

    /// Freeze sorted views after a batch load.
    fn finalize(&mut self) {
        for axis in self.axes.values_mut() {
            axis.finalize();
        }

        let mut order: Vec<Label> = self.labels.keys().cloned().collect();
        order.sort_by(|a, b| {
            self.labels[b]
                .len()
                .cmp(&self.labels[a].len())
                .then_with(|| a.depth().cmp(&b.depth()))
                .then_with(|| a.path().cmp(&b.path()))
        });
        self.label_order = order;

        self.days_sorted = self.events_by_day.keys().rev().cloned().collect();
        self.months_sorted = self.events_by_month.keys().rev().cloned().collect();
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The only member of a singleton collection.
    pub fn item(&self) -> Option<&Arc<Event>> {
        if self.events.len() == 1 {
            self.events.values().next()
        } else {
            None
        }
    }

    pub fn get(&self, id: EventId) -> Option<&Arc<Event>> {
        self.events.get(&id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events.contains_key(&id)
    }

    /// Whether a value-equal event (label, duration, timestamp) is a member.
    pub fn contains_value(&self, event: &Event) -> bool {
        self.events.values().any(|member| member.as_ref() == event)
    }

    /// Members in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Event>> {
        self.events.values()
    }

    /// Member ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = EventId> + '_ {
        self.events.keys().copied()
    }

    pub fn recipe(&self) -> &[String] {
        &self.recipe
    }

    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    pub fn max_event_id(&self) -> Option<EventId> {
        self.max_event_id
    }

    /// Earliest timestamp, `None` when empty.
    pub fn first_timestamp(&self) -> Option<f64> {
        (!self.is_empty()).then_some(self.first_timestamp)
    }

    /// Latest timestamp, `None` when empty.
    pub fn last_timestamp(&self) -> Option<f64> {
        (!self.is_empty()).then_some(self.last_timestamp)
    }

    // =========================================================================
    // Labels
    // =========================================================================

    /// Labels ordered by descending number of members carrying them.
    pub fn labels(&self) -> &[Label] {
        &self.label_order
    }

    /// Number of members carrying `label` in their ancestor chain.
    pub fn label_occurrences(&self, label: &Label) -> usize {
        self.labels.get(label).map_or(0, |ids| ids.len())
    }

    /// Whether the collection is dominated by a single label kind.
    ///
    /// Besides the shared root, at most one other label may account for all
    /// members; an empty or single-label collection is comparable.
    pub fn is_comparable(&self) -> bool {
        if self.label_order.len() <= 1 {
            return true;
        }
        self.label_occurrences(&self.label_order[1]) == self.len()
    }

    /// Deepest label shared by every member of a comparable collection.
    pub fn dominant_label(&self) -> Option<&Label> {
        if self.is_empty() || !self.is_comparable() {
            return None;
        }
        self.label_order
            .iter()
            .filter(|label| self.label_occurrences(label) == self.len())
            .max_by_key(|label| label.depth())
    }

    /// Ranking axes declared on the dominant label, with their direction.
    /// Empty for non-comparable collections.
    pub fn clever_axes(&self) -> Vec<(String, bool)> {
        self.dominant_label()
            .map(|label| label.axes().to_vec())
            .unwrap_or_default()
    }

    // =========================================================================
    // Axes
    // =========================================================================

    /// Axis names ordered by descending number of members carrying them.
    pub fn axes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.axes.keys().map(String::as_str).collect();
        names.sort_by(|a, b| {
            self.axis_occurrences(b)
                .cmp(&self.axis_occurrences(a))
                .then_with(|| a.cmp(b))
        });
        names
    }

    pub fn axis_occurrences(&self, axis: &str) -> usize {
        self.axes.get(axis).map_or(0, AxisIndex::occurrences)
    }

    /// Distinct values seen on `axis`, ascending.
    pub fn sorted_axis(&self, axis: &str) -> &[Scalar] {
        match self.axes.get(axis) {
            Some(index) => index.sorted_values(),
            None => &[],
        }
    }

    /// Members holding the `k`-th distinct value on `axis`, counted from the
    /// largest when `descending`.
    ///
    /// Returns an empty list when the axis is unknown or `k` is past the
    /// last distinct value.
    pub fn kth_along_axis(&self, axis: &str, k: usize, descending: bool) -> Vec<EventId> {
        self.axes
            .get(axis)
            .and_then(|index| index.kth(k, descending))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    // =========================================================================
    // Periods
    // =========================================================================

    /// Day keys, most recent first.
    pub fn days(&self) -> &[String] {
        &self.days_sorted
    }

    /// Month keys, most recent first.
    pub fn months(&self) -> &[String] {
        &self.months_sorted
    }

    /// The `n`-th most recent day holding at least one member.
    pub fn past_day(&self, n: usize) -> Option<&str> {
        self.days_sorted.get(n).map(String::as_str)
    }

    /// The `n`-th most recent month holding at least one member.
    pub fn past_month(&self, n: usize) -> Option<&str> {
        self.months_sorted.get(n).map(String::as_str)
    }

    /// Members that started on the given `YYYYMMDD` day.
    pub fn day_events(&self, day: &str) -> Vec<EventId> {
        self.events_by_day
            .get(day)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Members that started in the given `YYYYMM` month.
    pub fn month_events(&self, month: &str) -> Vec<EventId> {
        self.events_by_month
            .get(month)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    // =========================================================================
    // Devices and zones
    // =========================================================================

    /// Distinct device names, sorted.
    pub fn devices(&self) -> Vec<&str> {
        self.events_by_device.keys().map(String::as_str).collect()
    }

    pub fn device_events(&self, device: &str) -> Vec<EventId> {
        self.events_by_device
            .get(device)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Distinct locations, sorted.
    pub fn zones(&self) -> Vec<&Scalar> {
        self.events_by_zone.keys().collect()
    }
}
