//! Calculator traits and the `FibCalculator` decorator.
//!
//! `Calculator` is the public trait consumed by orchestration.
//! `CoreCalculator` is the internal trait implemented by the engines.
//! `FibCalculator` adds the lookup-table fast path, cancellation check and
//! the final progress report around an [`Algorithm`].

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use tracing::debug;

use crate::fastdoubling::OptimizedFastDoubling;
use crate::lut;
use crate::matrix::MatrixExponentiation;
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::progress::{CancellationToken, ProgressReporter};

/// Error type for Fibonacci calculations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FibError {
    /// A calculation error occurred.
    #[error("calculation error: {0}")]
    Calculation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Calculation was cancelled.
    #[error("calculation cancelled")]
    Cancelled,

    /// Calculation timed out.
    #[error("calculation timed out: {0}")]
    Timeout(String),

    /// Results from different algorithms don't match.
    #[error("result mismatch between algorithms")]
    Mismatch,
}

impl FibError {
    /// Whether this error stems from a cancellation or an expired deadline.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Timeout(_))
    }
}

/// Public trait for Fibonacci calculators, consumed by orchestration.
pub trait Calculator: Send + Sync {
    /// Calculate F(n) with the given options.
    fn calculate(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError>;

    /// Get the name of this calculator.
    fn name(&self) -> &str;
}

/// Internal trait for algorithm implementations.
///
/// Engines receive a bound [`ProgressReporter`] and must return an
/// integer the caller owns outright.
pub trait CoreCalculator: Send + Sync {
    /// Perform the core calculation for large n.
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        reporter: &ProgressReporter<'_>,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError>;

    /// Get the name of this algorithm.
    fn name(&self) -> &'static str;
}

/// The available engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    /// Fast doubling over the bits of n.
    FastDoubling,
    /// Binary exponentiation of the Fibonacci Q-matrix.
    MatrixExponentiation,
}

impl Algorithm {
    /// Every algorithm, in registry order.
    pub const ALL: [Algorithm; 2] = [Algorithm::FastDoubling, Algorithm::MatrixExponentiation];

    /// Short key used on the command line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::FastDoubling => "fast",
            Self::MatrixExponentiation => "matrix",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.engine().name()
    }

    fn engine(self) -> &'static dyn CoreCalculator {
        match self {
            Self::FastDoubling => &OptimizedFastDoubling,
            Self::MatrixExponentiation => &MatrixExponentiation,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = FibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" | "fastdoubling" | "fast-doubling" => Ok(Self::FastDoubling),
            "matrix" | "matrixexponentiation" | "matrix-exponentiation" => {
                Ok(Self::MatrixExponentiation)
            }
            other => Err(FibError::Config(format!("unknown algorithm: {other:?}"))),
        }
    }
}

/// Decorator that wraps an engine with the fast path and progress reporting.
#[derive(Debug, Clone, Copy)]
pub struct FibCalculator {
    algorithm: Algorithm,
}

impl FibCalculator {
    /// Create a new `FibCalculator` for the given algorithm.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    /// Create a calculator from a name such as `"fast"` or `"matrix"`.
    pub fn from_name(name: &str) -> Result<Self, FibError> {
        name.parse().map(Self::new)
    }

    /// The wrapped algorithm.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl Calculator for FibCalculator {
    fn calculate(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        let engine = self.algorithm.engine();
        let reporter = ProgressReporter::new(observer, calc_index, engine.name());

        if lut::is_small(n) {
            debug!(algorithm = engine.name(), n, "lookup table fast path");
            reporter.complete();
            return Ok(lut::lookup(n));
        }

        cancel.check_cancelled()?;

        let value = engine.calculate_core(cancel, &reporter, n, opts)?;
        reporter.complete();
        Ok(value)
    }

    fn name(&self) -> &str {
        self.algorithm.name()
    }
}
