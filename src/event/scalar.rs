//! Totally ordered scalar values for event characteristics
//!
//! Characteristics are heterogeneous, but every ranking axis needs a total
//! order. Ordering is deterministic: Bool < numbers < String. Int and Float
//! share one numeric domain and compare by value, so `Int(20)` and
//! `Float(20.0)` are the same rank value.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

/// A characteristic value.
///
/// Floats are stored as order-preserving bits so that `Scalar` can be used
/// as an index key. Equality, ordering and hashing all go through the same
/// rank key, so they stay consistent across the two numeric variants.
/// Integers beyond 2^53 compare at `f64` precision.
#[derive(Debug, Clone)]
pub enum Scalar {
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value (stored as bits for total ordering)
    Float(u64),
    /// String value
    String(String),
}

impl Scalar {
    /// Create a scalar from a boolean
    pub fn from_bool(v: bool) -> Self {
        Scalar::Bool(v)
    }

    /// Create a scalar from an integer
    pub fn from_int(v: i64) -> Self {
        Scalar::Int(v)
    }

    /// Create a scalar from a float
    ///
    /// Uses bit representation for total ordering. `-0.0` is stored as
    /// `0.0`.
    pub fn from_float(v: f64) -> Self {
        Scalar::Float(ordered_bits(v))
    }

    /// Create a scalar from a string
    pub fn from_string(v: impl Into<String>) -> Self {
        Scalar::String(v.into())
    }

    /// Create a scalar from a JSON value. Arrays, objects and null have no
    /// scalar form.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Scalar::from_bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Scalar::from_int(i))
                } else {
                    n.as_f64().map(Scalar::from_float)
                }
            }
            Value::String(s) => Some(Scalar::from_string(s.as_str())),
            _ => None,
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(ordered) => {
                let bits = if (ordered >> 63) == 1 {
                    ordered ^ (1 << 63)
                } else {
                    !ordered
                };
                Some(f64::from_bits(bits))
            }
            _ => None,
        }
    }

    fn rank_key(&self) -> RankKey<'_> {
        match self {
            Scalar::Bool(b) => RankKey::Bool(*b),
            Scalar::Int(i) => RankKey::Number(ordered_bits(*i as f64)),
            Scalar::Float(ordered) => RankKey::Number(*ordered),
            Scalar::String(s) => RankKey::Text(s),
        }
    }

    /// String view of the value, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form of the value. Non-finite floats become null.
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::from(*i),
            Scalar::Float(_) => self
                .as_f64()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

/// Order-preserving bit pattern of a float.
fn ordered_bits(v: f64) -> u64 {
    let bits = if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    if (bits >> 63) == 1 {
        !bits
    } else {
        bits ^ (1 << 63)
    }
}

/// What equality, ordering and hashing of a `Scalar` look at.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
enum RankKey<'a> {
    Bool(bool),
    Number(u64),
    Text(&'a str),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.rank_key() == other.rank_key()
    }
}

impl Eq for Scalar {}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank_key().cmp(&other.rank_key())
    }
}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank_key().hash(state);
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(_) => write!(f, "{}", self.as_f64().unwrap_or(f64::NAN)),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::from_bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::from_int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::from_float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::from_string(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::from_string(v)
    }
}
