//! Optimized Fast Doubling algorithm for Fibonacci computation.
//!
//! Uses the doubling identities:
//!   F(2k)   = F(k) * (2*F(k+1) - F(k))
//!   F(2k+1) = F(k+1)^2 + F(k)^2
//!
//! Iterates from MSB to LSB over the bits of n, rotating buffers with
//! `mem::swap` instead of copying. States come from a shared pool.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::debug;

use crate::calculator::{CoreCalculator, FibError};
use crate::constants::STATE_POOL_CAPACITY;
use crate::options::Options;
use crate::parallel::{execute_products, parallelism_available, Product};
use crate::pool::{ObjectPool, Poolable};
use crate::progress::{CancellationToken, ProgressReporter};

/// Working registers for one fast doubling run.
pub struct CalculationState {
    /// Current F(k).
    pub f_k: BigUint,
    /// Current F(k+1).
    pub f_k1: BigUint,
    /// F(k+1)^2.
    pub t1: BigUint,
    /// 2*F(k+1) - F(k).
    pub t2: BigUint,
    /// F(k) * t2.
    pub t3: BigUint,
    /// F(k)^2.
    pub t4: BigUint,
}

impl CalculationState {
    /// Create a new calculation state initialized for F(0)=0, F(1)=1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            f_k: BigUint::ZERO,
            f_k1: BigUint::from(1u32),
            t1: BigUint::ZERO,
            t2: BigUint::ZERO,
            t3: BigUint::ZERO,
            t4: BigUint::ZERO,
        }
    }
}

impl Default for CalculationState {
    fn default() -> Self {
        Self::new()
    }
}

impl Poolable for CalculationState {
    // Temporaries are overwritten before being read, so only the pair needs
    // resetting.
    fn reset(&mut self) {
        self.f_k.set_zero();
        self.f_k1.set_one();
    }

    fn retained_bits(&self) -> u64 {
        [&self.f_k, &self.f_k1, &self.t1, &self.t2, &self.t3, &self.t4]
            .iter()
            .map(|v| v.bits())
            .max()
            .unwrap_or(0)
    }
}

static STATE_POOL: ObjectPool<CalculationState> = ObjectPool::new(STATE_POOL_CAPACITY);

/// Number of idle fast doubling states in the shared pool.
#[must_use]
pub fn pooled_states() -> usize {
    STATE_POOL.available()
}

/// Replace (F(k), F(k+1)) with (F(2k), F(2k+1)).
fn doubling_step(state: &mut CalculationState, parallel: bool) {
    let CalculationState {
        f_k,
        f_k1,
        t1,
        t2,
        t3,
        t4,
    } = state;

    t2.clone_from(f_k1);
    *t2 <<= 1;
    *t2 -= &*f_k;

    let (fk, fk1, t) = (&*f_k, &*f_k1, &*t2);
    if parallel {
        // Two products go to the pool, the third runs here.
        rayon::scope(|s| {
            s.spawn(|_| *t3 = fk * t);
            s.spawn(|_| *t1 = fk1 * fk1);
            *t4 = fk * fk;
        });
    } else {
        execute_products(
            [
                Product::new(t3, fk, t),
                Product::new(t1, fk1, fk1),
                Product::new(t4, fk, fk),
            ],
            false,
        );
    }

    std::mem::swap(f_k, t3);
    std::mem::swap(f_k1, t1);
    *f_k1 += &*t4;
}

/// Replace (F(m), F(m+1)) with (F(m+1), F(m+2)).
fn advance_step(state: &mut CalculationState) {
    state.f_k += &state.f_k1;
    std::mem::swap(&mut state.f_k, &mut state.f_k1);
}

/// Optimized Fast Doubling calculator.
///
/// # Example
/// ```
/// use fibkit_core::calculator::CoreCalculator;
/// use fibkit_core::fastdoubling::OptimizedFastDoubling;
/// use fibkit_core::observers::NoOpObserver;
/// use fibkit_core::options::Options;
/// use fibkit_core::progress::{CancellationToken, ProgressReporter};
///
/// let observer = NoOpObserver::new();
/// let reporter = ProgressReporter::new(&observer, 0, "FastDoubling");
/// let result = OptimizedFastDoubling
///     .calculate_core(&CancellationToken::new(), &reporter, 100, &Options::default())
///     .unwrap();
/// assert_eq!(result.to_string(), "354224848179261915075");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizedFastDoubling;

impl OptimizedFastDoubling {
    /// Execute the doubling loop.
    fn execute_doubling_loop(
        &self,
        n: u64,
        cancel: &CancellationToken,
        reporter: &ProgressReporter<'_>,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        let num_bits = 64 - n.leading_zeros();
        let can_parallelize = parallelism_available();
        let mut state = STATE_POOL.acquire();

        debug!(
            n,
            num_bits,
            threshold = opts.parallel_threshold,
            can_parallelize,
            "fast doubling start"
        );

        for i in (0..num_bits).rev() {
            cancel.check_cancelled()?;

            if i < num_bits - 1 {
                reporter.report_step(u64::from(num_bits - 1 - i), u64::from(num_bits));
            }

            let parallel = can_parallelize && opts.exceeds_threshold(state.f_k1.bits());
            doubling_step(&mut state, parallel);

            if (n >> i) & 1 == 1 {
                advance_step(&mut state);
            }
        }

        Ok(std::mem::take(&mut state.f_k))
    }
}

impl CoreCalculator for OptimizedFastDoubling {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        reporter: &ProgressReporter<'_>,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        match n {
            0 => Ok(BigUint::ZERO),
            1 | 2 => Ok(BigUint::one()),
            _ => self.execute_doubling_loop(n, cancel, reporter, opts),
        }
    }

    fn name(&self) -> &'static str {
        "FastDoubling"
    }
}
