//! 2x2 matrix products written into caller-provided destinations.

use num_bigint::BigUint;

use crate::matrix_types::Matrix;
use crate::parallel::{execute_products, Product};

/// `dest = m1 * m2` using the eight independent entry products.
pub(crate) fn multiply_matrices(
    dest: &mut Matrix,
    m1: &Matrix,
    m2: &Matrix,
    scratch: &mut [BigUint; 8],
    parallel: bool,
) {
    let [t1, t2, t3, t4, t5, t6, t7, t8] = scratch;
    execute_products(
        [
            Product::new(t1, &m1.a, &m2.a),
            Product::new(t2, &m1.b, &m2.c),
            Product::new(t3, &m1.a, &m2.b),
            Product::new(t4, &m1.b, &m2.d),
            Product::new(t5, &m1.c, &m2.a),
            Product::new(t6, &m1.d, &m2.c),
            Product::new(t7, &m1.c, &m2.b),
            Product::new(t8, &m1.d, &m2.d),
        ],
        parallel,
    );

    dest.a.clone_from(t1);
    dest.a += &*t2;
    dest.b.clone_from(t3);
    dest.b += &*t4;
    dest.c.clone_from(t5);
    dest.c += &*t6;
    dest.d.clone_from(t7);
    dest.d += &*t8;
}

/// `dest = mat^2` for a symmetric matrix, with four products.
///
/// With b == c: a' = a^2 + b^2, b' = c' = b(a + d), d' = b^2 + d^2.
pub(crate) fn square_symmetric_matrix(
    dest: &mut Matrix,
    mat: &Matrix,
    scratch: &mut [BigUint; 8],
    parallel: bool,
) {
    debug_assert!(mat.is_symmetric());
    let [a_sq, b_sq, d_sq, b_sum, sum, ..] = scratch;

    sum.clone_from(&mat.a);
    *sum += &mat.d;

    execute_products(
        [
            Product::new(a_sq, &mat.a, &mat.a),
            Product::new(b_sq, &mat.b, &mat.b),
            Product::new(d_sq, &mat.d, &mat.d),
            Product::new(b_sum, &mat.b, sum),
        ],
        parallel,
    );

    dest.a.clone_from(a_sq);
    dest.a += &*b_sq;
    dest.b.clone_from(b_sum);
    dest.c.clone_from(b_sum);
    dest.d.clone_from(b_sq);
    dest.d += &*d_sq;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(a: u32, b: u32, c: u32, d: u32) -> Matrix {
        Matrix {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    fn product(m1: &Matrix, m2: &Matrix, parallel: bool) -> Matrix {
        let mut dest = Matrix::identity();
        let mut scratch: [BigUint; 8] = Default::default();
        multiply_matrices(&mut dest, m1, m2, &mut scratch, parallel);
        dest
    }

    fn square(mat: &Matrix, parallel: bool) -> Matrix {
        let mut dest = Matrix::identity();
        let mut scratch: [BigUint; 8] = Default::default();
        square_symmetric_matrix(&mut dest, mat, &mut scratch, parallel);
        dest
    }

    #[test]
    fn multiply_identity() {
        let id = Matrix::identity();
        let q = Matrix::fibonacci_q();
        assert_eq!(product(&id, &q, false), q);
        assert_eq!(product(&q, &id, false), q);
    }

    #[test]
    fn multiply_general_matrices() {
        // [[1,2],[3,4]] * [[5,6],[7,8]] = [[19,22],[43,50]]
        for parallel in [false, true] {
            assert_eq!(product(&m(1, 2, 3, 4), &m(5, 6, 7, 8), parallel), m(19, 22, 43, 50));
        }
    }

    #[test]
    fn square_q_matrix() {
        let q2 = square(&Matrix::fibonacci_q(), false);
        assert_eq!(q2, m(2, 1, 1, 1));
    }

    #[test]
    fn square_matches_multiply() {
        // Q^5 = [[8,5],[5,3]]
        let q5 = m(8, 5, 5, 3);
        for parallel in [false, true] {
            assert_eq!(square(&q5, parallel), product(&q5, &q5, false));
        }
        assert_eq!(square(&q5, false), m(89, 55, 55, 34));
    }

    #[test]
    fn cube_q_matrix() {
        let q = Matrix::fibonacci_q();
        let q3 = product(&square(&q, false), &q, false);
        assert_eq!(q3, m(3, 2, 2, 1));
    }

    #[test]
    fn dirty_scratch_does_not_leak() {
        let mut dest = Matrix::identity();
        let mut scratch: [BigUint; 8] = std::array::from_fn(|i| BigUint::from(i as u32 + 1000));
        square_symmetric_matrix(&mut dest, &Matrix::fibonacci_q(), &mut scratch, false);
        assert_eq!(dest, m(2, 1, 1, 1));
    }
}
