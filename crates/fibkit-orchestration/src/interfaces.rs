//! Orchestration interfaces.

use std::time::Duration;

use num_bigint::BigUint;

use fibkit_core::calculator::FibError;

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present a calculation result.
    fn present_result(
        &self,
        algorithm: &str,
        n: u64,
        result: &BigUint,
        duration: Duration,
        details: bool,
    );

    /// Present a comparison result.
    fn present_comparison(&self, results: &[CalculationResult]);

    /// Present an error.
    fn present_error(&self, error: &FibError);
}

/// Result of a single calculation.
#[derive(Debug, Clone)]
pub struct CalculationResult {
    /// Algorithm name.
    pub algorithm: String,
    /// The computed value or a structured error.
    pub outcome: Result<BigUint, FibError>,
    /// Computation duration.
    pub duration: Duration,
}

impl CalculationResult {
    /// Whether the calculation produced a value.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The computed value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&BigUint> {
        self.outcome.as_ref().ok()
    }

    /// The error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&FibError> {
        self.outcome.as_ref().err()
    }
}
