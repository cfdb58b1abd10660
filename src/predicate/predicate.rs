//! Predicates bound to a collection
//!
//! A predicate is a (family, program) pair bound to the collection it is
//! evaluated against, optionally with an auxiliary reference event. The
//! program is resolved against the collection once, at construction; an
//! invalid program resolves to `Target::Undefined` and every evaluation
//! then answers `Verdict::Undefined`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::event::{Event, EventId, Label, Scalar};
use crate::memory::{period, Memory};

use super::encoding::Encoding;
use super::family::PredicateFamily;

/// Outcome of evaluating a predicate on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    True,
    False,
    /// The predicate cannot be evaluated for this collection and event.
    Undefined,
}

impl Verdict {
    pub fn is_true(&self) -> bool {
        matches!(self, Verdict::True)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Verdict::Undefined)
    }
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value {
            Verdict::True
        } else {
            Verdict::False
        }
    }
}

/// What a program selects once resolved against its collection.
#[derive(Debug, Clone)]
enum Target {
    Undefined,
    Label(Label),
    LabelDistance { reference: Label, distance: usize },
    Rank {
        axis: String,
        descending: bool,
        rank: u64,
        axis_index: u64,
        /// `None` when the rank is past the last distinct value
        value: Option<Scalar>,
    },
    Device(String),
    /// `YYYYMMDD` key
    Day(String),
    /// `YYYYMM` key
    Month(String),
    Zone(Scalar),
    Member(EventId),
}

/// A boolean test over events, bound to a collection.
///
/// Equality and hashing use the (family, program) pair only.
#[derive(Debug, Clone)]
pub struct Predicate {
    family: PredicateFamily,
    program: u64,
    memory: Arc<Memory>,
    aux: Option<Arc<Event>>,
    target: Target,
}

impl Predicate {
    /// Bind `program` of `family` to `memory`.
    pub fn new(family: PredicateFamily, program: u64, memory: Arc<Memory>) -> Self {
        Self::bind(family, program, memory, None)
    }

    /// Bind `program` of `family` to `memory`, relative to an auxiliary
    /// reference event.
    pub fn with_aux(
        family: PredicateFamily,
        program: u64,
        memory: Arc<Memory>,
        aux: Arc<Event>,
    ) -> Self {
        Self::bind(family, program, memory, Some(aux))
    }

    fn bind(
        family: PredicateFamily,
        program: u64,
        memory: Arc<Memory>,
        aux: Option<Arc<Event>>,
    ) -> Self {
        let target = resolve(family, program, &memory, aux.as_deref());
        Self {
            family,
            program,
            memory,
            aux,
            target,
        }
    }

    pub fn family(&self) -> PredicateFamily {
        self.family
    }

    pub fn program(&self) -> u64 {
        self.program
    }

    /// The collection this predicate is bound to.
    pub fn memory(&self) -> &Arc<Memory> {
        &self.memory
    }

    pub fn aux(&self) -> Option<&Arc<Event>> {
        self.aux.as_ref()
    }

    /// Whether the program is valid for the bound collection.
    pub fn is_defined(&self) -> bool {
        !matches!(self.target, Target::Undefined)
    }

    /// Evaluate on a single event.
    pub fn evaluate(&self, event: &Event) -> Verdict {
        match &self.target {
            Target::Undefined => Verdict::Undefined,
            Target::Label(label) => event.has_label(label).into(),
            Target::LabelDistance {
                reference,
                distance,
            } => (event.label().distance_to(reference) == *distance).into(),
            Target::Rank { axis, value, .. } => match value {
                Some(value) => (event.characteristic(axis).as_ref() == Some(value)).into(),
                None => Verdict::False,
            },
            Target::Device(device) => match event.device() {
                Some(name) => (name == *device).into(),
                None => Verdict::Undefined,
            },
            Target::Day(key) => match period::date_of(event.timestamp()) {
                Some(date) => (period::day_key(date) == *key).into(),
                None => Verdict::False,
            },
            Target::Month(key) => match period::date_of(event.timestamp()) {
                Some(date) => (period::month_key(date) == *key).into(),
                None => Verdict::False,
            },
            Target::Zone(zone) => (event.location() == Some(zone)).into(),
            Target::Member(id) => (event.id() == Some(*id)).into(),
        }
    }

    /// Bits needed to write the program.
    ///
    /// Rank programs are coded as two independent fields. A random choice
    /// costs the price of picking one member among the whole collection.
    pub fn encoding_length(&self, encoding: Encoding) -> f64 {
        match (&self.target, self.family) {
            (Target::Rank {
                rank, axis_index, ..
            }, _) => encoding.cost(*axis_index) + encoding.cost(*rank),
            (_, PredicateFamily::AxisRank) => {
                let (axis_index, rank) = split_rank_program(self.program, self.memory.len());
                encoding.cost(axis_index) + encoding.cost(rank)
            }
            (_, PredicateFamily::RandomChoice) => encoding.cost(self.memory.len() as u64),
            _ => encoding.cost(self.program),
        }
    }

    /// Human-readable form, used in recipes.
    pub fn description(&self) -> String {
        let base = match &self.target {
            Target::Label(label) => format!("label({})", label.path()),
            Target::LabelDistance { distance, .. } => format!("label(~{})", distance),
            Target::Rank { axis, rank, .. } => format!("rank({}, {})", axis, rank),
            Target::Device(device) => format!("device({})", device),
            Target::Day(_) => format!("day({})", self.program),
            Target::Month(_) => format!("month({})", self.program),
            Target::Zone(zone) => format!("location({})", zone),
            Target::Member(_) => format!("choice({})", self.program),
            Target::Undefined => format!("{}({})", self.family, self.program),
        };
        match self.aux.as_ref().and_then(|aux| aux.id()) {
            Some(id) => format!("{}@{}", base, id),
            None => base,
        }
    }

    /// Members of the bound collection selected by this predicate, when it
    /// can be answered from the collection's indices without a scan.
    ///
    /// `None` when the predicate is undefined for the collection, or when
    /// its family has no index path.
    pub(crate) fn indexed_members(&self) -> Option<Vec<EventId>> {
        match &self.target {
            Target::Undefined => None,
            Target::Rank {
                axis,
                descending,
                rank,
                value,
                ..
            } => match value {
                Some(_) => Some(self.memory.kth_along_axis(axis, *rank as usize, *descending)),
                None => Some(Vec::new()),
            },
            Target::Day(key) => Some(self.memory.day_events(key)),
            Target::Month(key) => Some(self.memory.month_events(key)),
            _ => None,
        }
    }
}

/// Split a composite rank program into (axis index, rank) for a collection
/// of `size` members.
pub fn split_rank_program(program: u64, size: usize) -> (u64, u64) {
    let size = size.max(1) as u64;
    (program / size, program % size)
}

fn resolve(
    family: PredicateFamily,
    program: u64,
    memory: &Memory,
    aux: Option<&Event>,
) -> Target {
    let resolved = match family {
        PredicateFamily::HasLabel => match aux {
            None => resolve_label(program, memory),
            Some(aux) => resolve_label_distance(program, memory, aux),
        },
        PredicateFamily::AxisRank => resolve_rank(program, memory),
        PredicateFamily::Device => usize::try_from(program)
            .ok()
            .and_then(|index| memory.devices().get(index).map(|d| Target::Device(d.to_string()))),
        PredicateFamily::Day => resolve_day(program, memory, aux),
        PredicateFamily::Month => resolve_month(program, memory),
        PredicateFamily::Location => resolve_zone(program, memory, aux),
        PredicateFamily::RandomChoice => usize::try_from(program)
            .ok()
            .and_then(|index| memory.ids().nth(index))
            .map(Target::Member),
    };
    resolved.unwrap_or(Target::Undefined)
}

fn resolve_label(program: u64, memory: &Memory) -> Option<Target> {
    let index = usize::try_from(program).ok()?;
    memory.labels().get(index).cloned().map(Target::Label)
}

fn resolve_label_distance(program: u64, memory: &Memory, aux: &Event) -> Option<Target> {
    let reference = aux.label().as_ref();
    let reach = memory
        .iter()
        .map(|event| event.label().distance_to(reference))
        .max()?;
    let distance = usize::try_from(program).ok().filter(|d| *d <= reach)?;
    Some(Target::LabelDistance {
        reference: reference.clone(),
        distance,
    })
}

fn resolve_rank(program: u64, memory: &Memory) -> Option<Target> {
    if !memory.is_comparable() {
        return None;
    }
    let (axis_index, rank) = split_rank_program(program, memory.len());
    let axes = memory.clever_axes();
    let (axis, descending) = axes.get(usize::try_from(axis_index).ok()?)?;

    let sorted = memory.sorted_axis(axis);
    let rank_index = usize::try_from(rank).ok().filter(|r| *r < sorted.len());
    let value = rank_index.map(|r| {
        if *descending {
            sorted[sorted.len() - 1 - r].clone()
        } else {
            sorted[r].clone()
        }
    });

    Some(Target::Rank {
        axis: axis.clone(),
        descending: *descending,
        rank,
        axis_index,
        value,
    })
}

fn resolve_day(program: u64, memory: &Memory, aux: Option<&Event>) -> Option<Target> {
    let reference = match aux {
        Some(aux) => aux.timestamp(),
        None => {
            if !memory.is_comparable() {
                return None;
            }
            memory.last_timestamp()?
        }
    };
    let earliest = memory.days().last()?;
    let date = period::days_before(period::date_of(reference)?, program)?;
    let key = period::day_key(date);
    // Targets before the earliest day end the enumeration.
    (key.as_str() >= earliest.as_str()).then_some(Target::Day(key))
}

fn resolve_month(program: u64, memory: &Memory) -> Option<Target> {
    if !memory.is_comparable() {
        return None;
    }
    let latest = period::date_of(memory.last_timestamp()?)?;
    let earliest = memory.months().last()?;
    let offset = i64::try_from(program).ok()?;
    let key = period::month_key_of_ordinal(period::month_ordinal(latest) - offset);
    (key.as_str() >= earliest.as_str()).then_some(Target::Month(key))
}

fn resolve_zone(program: u64, memory: &Memory, aux: Option<&Event>) -> Option<Target> {
    let zones = memory.zones();
    let index = usize::try_from(program).ok()?;
    match aux {
        None => zones.get(index).map(|zone| Target::Zone((*zone).clone())),
        Some(aux) if index == 0 => aux.location().cloned().map(Target::Zone),
        Some(_) => zones.get(index - 1).map(|zone| Target::Zone((*zone).clone())),
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.program == other.program
    }
}

impl Eq for Predicate {}

impl Hash for Predicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.program.hash(state);
    }
}

impl PartialOrd for Predicate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Predicate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.family
            .cmp(&other.family)
            .then_with(|| self.program.cmp(&other.program))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
