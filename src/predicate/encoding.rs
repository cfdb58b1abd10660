//! Encoding length of predicate programs
//!
//! Programs are non-negative integers written with a self-delimiting
//! doubled-length prefix code: the length of the binary form is written
//! first (itself doubled), then the binary form. Smaller integers are always
//! cheaper, logarithmically.

use serde::{Deserialize, Serialize};

/// Cost of 0 and 1.
const SMALL_INTEGER_BITS: f64 = 2.0;

/// Number of bits of `k` in binary, `floor(log2 k) + 1` for `k >= 1`.
fn binary_width(k: u64) -> u32 {
    u64::BITS - k.leading_zeros()
}

/// Bits needed to write `k` with the doubled-length prefix code.
///
/// `0` and `1` cost 2 bits; for `k >= 2` the cost is
/// `base + 2 * (floor(log2 base) + 1)` with `base = floor(log2 k) + 1`.
pub fn bit_length(k: u64) -> f64 {
    if k <= 1 {
        return SMALL_INTEGER_BITS;
    }
    let base = binary_width(k);
    let prefix = 2 * (u32::BITS - base.leading_zeros());
    (base + prefix) as f64
}

/// Real-valued variant of `bit_length`, without the floor operations.
/// Strictly increasing for `k >= 2`.
pub fn bit_length_continuous(k: u64) -> f64 {
    if k <= 1 {
        return SMALL_INTEGER_BITS;
    }
    let base = (k as f64).log2() + 1.0;
    base + 2.0 * (base.log2() + 1.0)
}

/// Cost of a list-valued program: the sum of its elements' costs.
pub fn list_bit_length(values: &[u64], encoding: Encoding) -> f64 {
    values.iter().map(|v| encoding.cost(*v)).sum()
}

/// Which variant of the prefix code prices programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Whole-bit code lengths (`bit_length`)
    #[default]
    Floored,
    /// Real-valued code lengths (`bit_length_continuous`)
    Continuous,
}

impl Encoding {
    /// Bits needed to write `k`.
    pub fn cost(&self, k: u64) -> f64 {
        match self {
            Encoding::Floored => bit_length(k),
            Encoding::Continuous => bit_length_continuous(k),
        }
    }
}
