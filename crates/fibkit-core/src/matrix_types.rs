//! Matrix types for the Matrix Exponentiation algorithm.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::pool::Poolable;

/// 2x2 matrix of `BigUint` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    pub a: BigUint, // [0][0]
    pub b: BigUint, // [0][1]
    pub c: BigUint, // [1][0]
    pub d: BigUint, // [1][1]
}

impl Matrix {
    /// Create the identity matrix.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            a: BigUint::one(),
            b: BigUint::ZERO,
            c: BigUint::ZERO,
            d: BigUint::one(),
        }
    }

    /// Create the Fibonacci Q matrix [[1,1],[1,0]].
    #[must_use]
    pub fn fibonacci_q() -> Self {
        Self {
            a: BigUint::one(),
            b: BigUint::one(),
            c: BigUint::one(),
            d: BigUint::ZERO,
        }
    }

    /// Overwrite in place with the identity, keeping allocations.
    pub fn set_identity(&mut self) {
        self.a.set_one();
        self.b.set_zero();
        self.c.set_zero();
        self.d.set_one();
    }

    /// Overwrite in place with the Q matrix, keeping allocations.
    pub fn set_fibonacci_q(&mut self) {
        self.a.set_one();
        self.b.set_one();
        self.c.set_one();
        self.d.set_zero();
    }

    /// Whether `b == c`. Every power of Q is symmetric.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.b == self.c
    }

    /// Largest entry size in bits.
    #[must_use]
    pub fn max_bits(&self) -> u64 {
        self.a.bits().max(self.b.bits()).max(self.c.bits()).max(self.d.bits())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// Working set for one matrix exponentiation run.
pub struct MatrixState {
    /// Accumulated product, starts at the identity.
    pub result: Matrix,
    /// Q raised to successive powers of two.
    pub power: Matrix,
    /// Destination for the next product before it is swapped in.
    pub temp: Matrix,
    /// Scratch integers for the individual products.
    pub scratch: [BigUint; 8],
}

impl MatrixState {
    /// Create a new matrix state for computing Q^n.
    #[must_use]
    pub fn new() -> Self {
        Self {
            result: Matrix::identity(),
            power: Matrix::fibonacci_q(),
            temp: Matrix::identity(),
            scratch: Default::default(),
        }
    }
}

impl Default for MatrixState {
    fn default() -> Self {
        Self::new()
    }
}

impl Poolable for MatrixState {
    fn reset(&mut self) {
        self.result.set_identity();
        self.power.set_fibonacci_q();
    }

    fn retained_bits(&self) -> u64 {
        let matrices = self
            .result
            .max_bits()
            .max(self.power.max_bits())
            .max(self.temp.max_bits());
        self.scratch
            .iter()
            .map(BigUint::bits)
            .fold(matrices, u64::max)
    }
}
