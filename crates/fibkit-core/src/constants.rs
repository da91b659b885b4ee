//! Constants for Fibonacci calculation thresholds and configuration.

/// Default threshold (in bits) above which the multiplications of a single
/// step are dispatched to concurrent tasks.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

/// Minimum progress change (1%) before reporting an update.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.01;

/// Maximum Fibonacci index that fits in a u64.
/// F(93) = 12200160415121876738
pub const MAX_FIB_U64: u64 = 93;

/// Pooled states holding integers larger than this (in bits) are dropped on
/// release instead of being kept for reuse.
pub const MAX_POOLED_BIT_LEN: u64 = 100_000_000;

/// Maximum number of idle states kept by each engine's pool.
pub const STATE_POOL_CAPACITY: usize = 8;

/// Precomputed Fibonacci values for n = 0..=93 (fast path).
///
/// F(93) = 12,200,160,415,121,876,738 is the largest Fibonacci number
/// that fits in `u64`. F(94) = 19,740,274,219,868,223,167 overflows
/// `u64::MAX` (18,446,744,073,709,551,615).
pub const FIB_TABLE: [u64; 94] = {
    let mut table = [0u64; 94];
    table[0] = 0;
    table[1] = 1;
    let mut i = 2;
    while i < 94 {
        table[i] = table[i - 1] + table[i - 2];
        i += 1;
    }
    table
};

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Computation timed out.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Algorithm results did not match during cross-validation.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Computation cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
