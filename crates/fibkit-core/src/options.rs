//! Calculation options and configuration.

use crate::constants::DEFAULT_PARALLEL_THRESHOLD;

/// Options for Fibonacci calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Threshold (in bits) above which a step's multiplications run
    /// concurrently. Zero makes every step eligible.
    pub parallel_threshold: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Options {
    /// Options with the given parallel threshold.
    #[must_use]
    pub fn with_parallel_threshold(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// Whether operands of `bits` bits are large enough to parallelize.
    #[inline]
    #[must_use]
    pub fn exceeds_threshold(&self, bits: u64) -> bool {
        usize::try_from(bits).map_or(true, |bits| bits > self.parallel_threshold)
    }
}
