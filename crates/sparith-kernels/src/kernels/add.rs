//! Additive combination kernels: `C = alpha * A + beta * B`.
//!
//! `add` is `(1, 1)` and `subtract` is `(1, -1)`. Sparse rows are folded into
//! a [`Spa`] and gathered once per row; exact-zero sums are not emitted.

#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k/p for indices"
)]

use crate::operand::Matrix;
use crate::spa::Spa;
use crate::util::usize_to_i64;
use sparith_core::Csr;

/// CSR + CSR: both rows scattered with their scale, gathered once.
pub fn add_csr_csr(
    c: &mut Csr<f64, i64>,
    lhs: &Csr<f64, i64>,
    rhs: &Csr<f64, i64>,
    alpha: f64,
    beta: f64,
) {
    let mut spa = Spa::new(lhs.ncols);
    for i in 0..lhs.nrows {
        spa.scatter_vec(lhs.row(i), alpha, &mut c.indices);
        spa.scatter_vec(rhs.row(i), beta, &mut c.indices);
        spa.gather_nonzero_and_zero(&mut c.data, &mut c.indices);
        c.seal_row(i);
    }
}

/// CSR + any matrix (`alpha * csr + beta * other`).
///
/// The dense row goes in first, zero entries skipped, then the sparse row on
/// top. A raw row-major buffer is read directly; otherwise every cell goes
/// through element access.
pub fn add_csr_mat(
    c: &mut Csr<f64, i64>,
    csr: &Csr<f64, i64>,
    other: &dyn Matrix,
    alpha: f64,
    beta: f64,
) {
    let (ar, ac) = csr.shape();
    let mut spa = Spa::new(ac);

    if let Some(raw) = other.raw_dense() {
        for i in 0..ar {
            spa.accumulate_dense(raw.row(i), beta, &mut c.indices);
            let (ai, av) = csr.row(i);
            spa.scatter(av, ai, alpha, &mut c.indices);
            spa.gather_nonzero_and_zero(&mut c.data, &mut c.indices);
            c.seal_row(i);
        }
        return;
    }

    for i in 0..ar {
        for j in 0..ac {
            let v = other.at(i, j);
            if v != 0.0 {
                spa.scatter_value(v, j, beta, &mut c.indices);
            }
        }
        let (ai, av) = csr.row(i);
        spa.scatter(av, ai, alpha, &mut c.indices);
        spa.gather_nonzero_and_zero(&mut c.data, &mut c.indices);
        c.seal_row(i);
    }
}

/// Generic fallback: visits every cell of both operands.
pub fn add_mat_mat(c: &mut Csr<f64, i64>, a: &dyn Matrix, b: &dyn Matrix, alpha: f64, beta: f64) {
    let (ar, ac) = a.dims();
    for i in 0..ar {
        for j in 0..ac {
            let v = alpha * a.at(i, j) + beta * b.at(i, j);
            if v != 0.0 {
                c.indices.push(usize_to_i64(j));
                c.data.push(v);
            }
        }
        c.seal_row(i);
    }
}
