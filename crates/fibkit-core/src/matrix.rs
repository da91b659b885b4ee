//! Matrix Exponentiation algorithm for Fibonacci computation.
//!
//! Computes F(n) as the top-left entry of Q^(n-1) where Q = [[1,1],[1,0]],
//! scanning the exponent from the least significant bit upwards.
//! States come from a shared pool.

use num_bigint::BigUint;
use tracing::debug;

use crate::calculator::{CoreCalculator, FibError};
use crate::constants::STATE_POOL_CAPACITY;
use crate::matrix_ops::{multiply_matrices, square_symmetric_matrix};
use crate::matrix_types::MatrixState;
use crate::options::Options;
use crate::parallel::parallelism_available;
use crate::pool::ObjectPool;
use crate::progress::{CancellationToken, ProgressReporter};

static STATE_POOL: ObjectPool<MatrixState> = ObjectPool::new(STATE_POOL_CAPACITY);

/// Number of idle matrix states in the shared pool.
#[must_use]
pub fn pooled_states() -> usize {
    STATE_POOL.available()
}

/// Matrix Exponentiation calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixExponentiation;

impl MatrixExponentiation {
    /// Execute the square-and-multiply loop.
    fn execute_matrix_loop(
        &self,
        n: u64,
        cancel: &CancellationToken,
        reporter: &ProgressReporter<'_>,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        let exponent = n - 1;
        let num_bits = 64 - exponent.leading_zeros();
        let can_parallelize = parallelism_available();
        let mut state = STATE_POOL.acquire();

        debug!(
            n,
            num_bits,
            threshold = opts.parallel_threshold,
            can_parallelize,
            "matrix exponentiation start"
        );

        for i in 0..num_bits {
            cancel.check_cancelled()?;
            reporter.report_step(u64::from(i), u64::from(num_bits));

            let MatrixState {
                result,
                power,
                temp,
                scratch,
            } = &mut *state;

            if (exponent >> i) & 1 == 1 {
                let bits = result.a.bits().max(power.a.bits());
                let parallel = can_parallelize && opts.exceeds_threshold(bits);
                multiply_matrices(temp, result, power, scratch, parallel);
                std::mem::swap(result, temp);
            }

            // The last squaring would never be used.
            if i + 1 < num_bits {
                let parallel = can_parallelize && opts.exceeds_threshold(power.a.bits());
                square_symmetric_matrix(temp, power, scratch, parallel);
                std::mem::swap(power, temp);
            }
        }

        Ok(std::mem::take(&mut state.result.a))
    }
}

impl CoreCalculator for MatrixExponentiation {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        reporter: &ProgressReporter<'_>,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        if n == 0 {
            return Ok(BigUint::ZERO);
        }
        self.execute_matrix_loop(n, cancel, reporter, opts)
    }

    fn name(&self) -> &'static str {
        "MatrixExponentiation"
    }
}
