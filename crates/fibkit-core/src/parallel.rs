//! Fan-out of independent big-integer products.
//!
//! Each step of both engines needs a handful of products whose operands are
//! read-only and whose destinations are disjoint. `execute_products` runs
//! them inside a fresh `rayon::scope`, so the step cannot finish before every
//! product has been written.

use num_bigint::BigUint;

/// One pending multiplication `dest = lhs * rhs`.
pub(crate) struct Product<'a> {
    dest: &'a mut BigUint,
    lhs: &'a BigUint,
    rhs: &'a BigUint,
}

impl<'a> Product<'a> {
    pub(crate) fn new(dest: &'a mut BigUint, lhs: &'a BigUint, rhs: &'a BigUint) -> Self {
        Self { dest, lhs, rhs }
    }

    fn run(self) {
        *self.dest = self.lhs * self.rhs;
    }
}

/// Whether the current rayon pool can run anything side by side.
#[inline]
pub(crate) fn parallelism_available() -> bool {
    rayon::current_num_threads() > 1
}

/// Run every product, concurrently when `parallel` is set.
pub(crate) fn execute_products<const N: usize>(products: [Product<'_>; N], parallel: bool) {
    if parallel {
        rayon::scope(|s| {
            for product in products {
                s.spawn(move |_| product.run());
            }
        });
    } else {
        for product in products {
            product.run();
        }
    }
}
