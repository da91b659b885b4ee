#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

use fibkit_core::calculator::{Algorithm, Calculator, FibCalculator};
use fibkit_core::observers::NoOpObserver;
use fibkit_core::options::Options;
use fibkit_core::progress::CancellationToken;

fuzz_target!(|data: &[u8]| {
    let [a, b, c, t, ..] = *data else {
        return;
    };
    // Keep n small enough for both engines to finish quickly.
    let n = u64::from(u32::from_le_bytes([a, b, c, 0]) % 20_000);
    let opts = Options::with_parallel_threshold(usize::from(t) * 64);

    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let results: Vec<BigUint> = Algorithm::ALL
        .iter()
        .map(|&algo| {
            FibCalculator::new(algo)
                .calculate(&cancel, &observer, 0, n, &opts)
                .expect("a fresh token never fires")
        })
        .collect();

    assert_eq!(results[0], results[1], "engines disagree at n={n}");
    if n >= 2 {
        // F(n) = F(n-1) + F(n-2)
        let prev = FibCalculator::new(Algorithm::FastDoubling)
            .calculate(&cancel, &observer, 0, n - 1, &opts)
            .expect("a fresh token never fires");
        let prev2 = FibCalculator::new(Algorithm::MatrixExponentiation)
            .calculate(&cancel, &observer, 0, n - 2, &opts)
            .expect("a fresh token never fires");
        assert_eq!(results[0], prev + prev2, "recurrence broken at n={n}");
    }
});
