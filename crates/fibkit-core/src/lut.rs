//! Lookup table of small Fibonacci numbers.
//!
//! The table is built once, on first access, and never mutated afterwards.
//! Every lookup hands out an owned copy so callers can never alias the
//! shared storage.

use std::sync::LazyLock;

use num_bigint::BigUint;

use crate::constants::{FIB_TABLE, MAX_FIB_U64};

static LOOKUP_TABLE: LazyLock<Vec<BigUint>> =
    LazyLock::new(|| FIB_TABLE.iter().map(|&v| BigUint::from(v)).collect());

/// Return F(n) for `n <= 93` as a fresh `BigUint`.
///
/// # Panics
///
/// Panics if `n > 93`. Callers must check the index first; the calculator
/// fast path does.
#[must_use]
pub fn lookup(n: u64) -> BigUint {
    assert!(
        n <= MAX_FIB_U64,
        "lookup table index out of range: {n} > {MAX_FIB_U64}"
    );
    // n <= 93, the conversion cannot truncate.
    #[allow(clippy::cast_possible_truncation)]
    LOOKUP_TABLE[n as usize].clone()
}

/// Whether `n` is answered by the lookup table.
#[inline]
#[must_use]
pub fn is_small(n: u64) -> bool {
    n <= MAX_FIB_U64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_values() {
        assert_eq!(lookup(0), BigUint::ZERO);
        assert_eq!(lookup(1), BigUint::from(1u32));
        assert_eq!(lookup(2), BigUint::from(1u32));
        assert_eq!(lookup(10), BigUint::from(55u32));
        assert_eq!(lookup(20), BigUint::from(6765u32));
    }

    #[test]
    fn lookup_boundary() {
        assert_eq!(lookup(93), BigUint::from(12_200_160_415_121_876_738u64));
    }

    #[test]
    fn lookup_returns_independent_copies() {
        let mut first = lookup(50);
        first += 1u32;
        first <<= 10;
        assert_eq!(lookup(50), BigUint::from(12_586_269_025u64));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn lookup_out_of_range_panics() {
        let _ = lookup(94);
    }

    #[test]
    fn is_small_boundary() {
        assert!(is_small(0));
        assert!(is_small(93));
        assert!(!is_small(94));
    }
}
