//! # fibkit-core
//!
//! Core library for FibKit. Computes exact Fibonacci numbers with two
//! engines, Fast Doubling and Matrix Exponentiation, sharing a lookup
//! table for small indices, pooled working state, cooperative
//! cancellation and throttled progress reporting.

pub mod calculator;
pub mod constants;
pub mod fastdoubling;
pub mod lut;
pub mod matrix;
pub(crate) mod matrix_ops;
pub mod matrix_types;
pub mod observer;
pub mod observers;
pub mod options;
pub(crate) mod parallel;
pub mod pool;
pub mod progress;
pub mod registry;

// Re-exports
pub use calculator::{Algorithm, Calculator, CoreCalculator, FibCalculator, FibError};
pub use constants::{
    exit_codes, DEFAULT_PARALLEL_THRESHOLD, FIB_TABLE, MAX_FIB_U64, PROGRESS_REPORT_THRESHOLD,
};
pub use observer::{FrozenObserver, ProgressObserver, ProgressSubject};
pub use options::Options;
pub use progress::{CancellationToken, ProgressReporter, ProgressUpdate};
pub use registry::{CalculatorFactory, DefaultFactory};

use num_bigint::BigUint;

/// Compute F(n) using the fast doubling algorithm.
///
/// Goes through [`FibCalculator`], so small indices use the lookup table.
/// For progress, cancellation or a custom threshold, use the `Calculator`
/// trait directly.
///
/// # Example
/// ```
/// assert_eq!(fibkit_core::fibonacci(10).to_string(), "55");
/// assert_eq!(fibkit_core::fibonacci(0).to_string(), "0");
/// ```
#[must_use]
pub fn fibonacci(n: u64) -> BigUint {
    // A fresh token never fires, so the calculation cannot fail here.
    FibCalculator::new(Algorithm::FastDoubling)
        .calculate(
            &CancellationToken::new(),
            &observers::NoOpObserver::new(),
            0,
            n,
            &Options::default(),
        )
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fibonacci_matches_calculator_across_lookup_boundary() {
        let calc = FibCalculator::new(Algorithm::MatrixExponentiation);
        for n in [0, 1, 2, 92, 93, 94, 95, 1_000] {
            let expected = calc
                .calculate(
                    &CancellationToken::new(),
                    &observers::NoOpObserver::new(),
                    0,
                    n,
                    &Options::default(),
                )
                .unwrap();
            assert_eq!(fibonacci(n), expected, "F({n})");
        }
    }
}
