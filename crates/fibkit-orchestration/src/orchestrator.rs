//! Core orchestration: concurrent execution and result analysis.

use std::sync::Arc;
use std::time::Instant;

use num_bigint::BigUint;
use rayon::prelude::*;
use tracing::{debug, warn};

use fibkit_core::calculator::{Calculator, FibError};
use fibkit_core::observer::ProgressObserver;
use fibkit_core::options::Options;
use fibkit_core::progress::CancellationToken;

use crate::interfaces::CalculationResult;

fn run_one(
    index: usize,
    calc: &dyn Calculator,
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> CalculationResult {
    let start = Instant::now();
    let outcome = calc.calculate(cancel, observer, index, n, opts);
    let duration = start.elapsed();

    match &outcome {
        Ok(_) => debug!(algorithm = calc.name(), ?duration, "calculation finished"),
        Err(e) => warn!(algorithm = calc.name(), error = %e, "calculation failed"),
    }

    CalculationResult {
        algorithm: calc.name().to_string(),
        outcome,
        duration,
    }
}

/// Run every calculator for the same `n`, each on its own rayon task.
///
/// Results come back in input order. A failing calculator never stops the
/// others; they all share `cancel`.
pub fn execute_calculations(
    calculators: &[Arc<dyn Calculator>],
    n: u64,
    opts: &Options,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> Vec<CalculationResult> {
    debug!(n, count = calculators.len(), "executing calculations");

    if let [calc] = calculators {
        return vec![run_one(0, calc.as_ref(), n, opts, cancel, observer)];
    }

    calculators
        .par_iter()
        .enumerate()
        .map(|(i, calc)| run_one(i, calc.as_ref(), n, opts, cancel, observer))
        .collect()
}

/// Sort results (successes first, then by duration) and cross-check them.
///
/// Returns the agreed value, `FibError::Calculation` when nothing succeeded
/// and `FibError::Mismatch` when two successful results differ.
pub fn analyze_comparison_results(
    results: &mut [CalculationResult],
) -> Result<BigUint, FibError> {
    results.sort_by_key(|r| (!r.is_success(), r.duration));

    let mut values = results.iter().filter_map(CalculationResult::value);
    let Some(first) = values.next() else {
        return Err(FibError::Calculation("no valid results".into()));
    };

    if values.any(|v| v != first) {
        warn!("results differ between algorithms");
        return Err(FibError::Mismatch);
    }

    Ok(first.clone())
}
