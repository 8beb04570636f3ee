//! Row-wise kernels writing into a pre-shaped CSR target.
//!
//! Every kernel expects `c` to be an empty `rows x cols` skeleton (as left by
//! [`Csr::reuse_as`](sparith_core::Csr::reuse_as) or a pooled workspace),
//! walks rows in increasing order, appends the row's entries and seals the
//! row. No kernel emits an entry whose value is exactly zero.

pub mod add;
pub mod mul;

pub use add::{add_csr_csr, add_csr_mat, add_mat_mat};
pub use mul::{mul_csr_csr, mul_csr_mat, mul_dia_csr, mul_dia_mat, mul_mat_csr, mul_mat_mat};

use crate::operand::{Matrix, RawDense};
use crate::util::usize_to_i64;
use sparith_core::Csr;

/// Appends the non-zero entries of a dense row slice; position `k` becomes column `k`.
#[inline]
pub(crate) fn push_nonzero(c: &mut Csr<f64, i64>, vals: &[f64]) {
    for (k, &v) in vals.iter().enumerate() {
        if v != 0.0 {
            c.indices.push(usize_to_i64(k));
            c.data.push(v);
        }
    }
}

/// Element lookup that goes through the raw buffer when one is exposed.
#[inline]
pub(crate) fn element(m: &dyn Matrix, raw: Option<&RawDense<'_>>, i: usize, j: usize) -> f64 {
    match raw {
        Some(r) => r.data[i * r.stride + j],
        None => m.at(i, j),
    }
}
