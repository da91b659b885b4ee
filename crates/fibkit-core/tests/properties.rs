//! Property-based tests for the Fibonacci engines.
//!
//! These exercise the `CoreCalculator` trait directly, bypassing the
//! lookup-table fast path, and the public `Calculator` facade on top.

use num_bigint::BigUint;
use proptest::prelude::*;

use fibkit_core::calculator::{Algorithm, Calculator, CoreCalculator, FibCalculator};
use fibkit_core::fastdoubling::OptimizedFastDoubling;
use fibkit_core::matrix::MatrixExponentiation;
use fibkit_core::observers::NoOpObserver;
use fibkit_core::options::Options;
use fibkit_core::progress::{CancellationToken, ProgressReporter};

fn compute_core(algo: &dyn CoreCalculator, n: u64, opts: &Options) -> BigUint {
    let observer = NoOpObserver::new();
    let reporter = ProgressReporter::new(&observer, 0, algo.name());
    algo.calculate_core(&CancellationToken::new(), &reporter, n, opts)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Both engines agree for random n, with and without parallel steps.
    #[test]
    fn core_algorithms_agree(n in 0u64..5000, threshold in prop_oneof![Just(0usize), Just(2048usize)]) {
        let opts = Options::with_parallel_threshold(threshold);
        let fd = compute_core(&OptimizedFastDoubling, n, &opts);
        let mx = compute_core(&MatrixExponentiation, n, &opts);
        prop_assert_eq!(&fd, &mx, "FastDoubling != Matrix at n={}", n);
    }

    /// F(n) + F(n+1) == F(n+2) for random n.
    #[test]
    fn fibonacci_addition_property(n in 2u64..2000) {
        let opts = Options::default();
        let fn_val = compute_core(&OptimizedFastDoubling, n, &opts);
        let fn1_val = compute_core(&OptimizedFastDoubling, n + 1, &opts);
        let fn2_val = compute_core(&OptimizedFastDoubling, n + 2, &opts);
        prop_assert_eq!(&fn_val + &fn1_val, fn2_val, "F({}) + F({}) != F({})", n, n + 1, n + 2);
    }

    /// F(2n) = F(n) * (2*F(n+1) - F(n)).
    #[test]
    fn doubling_identity(n in 1u64..1500) {
        let opts = Options::default();
        let f_n = compute_core(&MatrixExponentiation, n, &opts);
        let f_n1 = compute_core(&MatrixExponentiation, n + 1, &opts);
        let f_2n = compute_core(&MatrixExponentiation, 2 * n, &opts);
        let doubled: BigUint = (&f_n1 << 1u32) - &f_n;
        prop_assert_eq!(f_2n, &f_n * doubled);
    }

    /// The facade matches the raw engine on both sides of the table boundary.
    #[test]
    fn facade_matches_engine(n in 0u64..400) {
        let opts = Options::default();
        for algorithm in Algorithm::ALL {
            let via_facade = FibCalculator::new(algorithm)
                .calculate(&CancellationToken::new(), &NoOpObserver::new(), 0, n, &opts)
                .unwrap();
            prop_assert_eq!(via_facade, compute_core(&OptimizedFastDoubling, n, &opts));
        }
    }
}
