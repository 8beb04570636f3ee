//! Matrix product kernels: `C = A @ B`.
//!
//! - **CSR @ CSR**: Gustavson's row-wise algorithm over a sparse accumulator
//! - **CSR @ any**: per-cell dot products against the dense operand
//! - **DIA @ CSR / CSR @ DIA**: row or column scaling of the sparse pattern
//! - **DIA @ any / any @ DIA**: the same over dense rows, SIMD when a raw buffer exists
//! - **any @ CSR**: `(B^T @ A^T)^T` through the CSR @ any kernel
//! - **any @ any**: dense fallback with the left row materialised in a scratch buffer

#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k/p for indices"
)]

use super::{element, push_nonzero};
use crate::convert::transpose_csr;
use crate::operand::{Matrix, Transposed};
use crate::pool::WorkspacePool;
use crate::spa::Spa;
use crate::util::{i64_to_usize, usize_to_i64};
use sparith_core::{Csr, Dia};
use wide::f64x4;

/// `out = src * alpha`, four lanes at a time.
#[inline]
fn scale_into(src: &[f64], alpha: f64, out: &mut [f64]) {
    debug_assert_eq!(src.len(), out.len());
    let av = f64x4::splat(alpha);
    let mut s = src.chunks_exact(4);
    let mut o = out.chunks_exact_mut(4);
    for (x, y) in (&mut s).zip(&mut o) {
        let r = f64x4::from([x[0], x[1], x[2], x[3]]) * av;
        y.copy_from_slice(&r.to_array());
    }
    for (x, y) in s.remainder().iter().zip(o.into_remainder()) {
        *y = x * alpha;
    }
}

/// `out = a * b` elementwise, four lanes at a time.
#[inline]
fn mul_into(a: &[f64], b: &[f64], out: &mut [f64]) {
    debug_assert!(a.len() == b.len() && a.len() == out.len());
    let mut sa = a.chunks_exact(4);
    let mut sb = b.chunks_exact(4);
    let mut o = out.chunks_exact_mut(4);
    for ((x, w), y) in (&mut sa).zip(&mut sb).zip(&mut o) {
        let r = f64x4::from([x[0], x[1], x[2], x[3]]) * f64x4::from([w[0], w[1], w[2], w[3]]);
        y.copy_from_slice(&r.to_array());
    }
    for ((x, w), y) in sa.remainder().iter().zip(sb.remainder()).zip(o.into_remainder()) {
        *y = x * w;
    }
}

/// CSR @ CSR with Gustavson's algorithm (ACM 1978).
///
/// Row `i` of the result is the sum of the rows of `rhs` selected by the
/// columns stored in row `i` of `lhs`, each scaled by the stored value. The
/// rows are folded into one [`Spa`], so the cost is proportional to the
/// number of scalar multiply-adds, not to `rows * cols`.
pub fn mul_csr_csr(c: &mut Csr<f64, i64>, lhs: &Csr<f64, i64>, rhs: &Csr<f64, i64>) {
    let mut spa = Spa::new(rhs.ncols);
    for i in 0..lhs.nrows {
        let (cols, vals) = lhs.row(i);
        for (&k, &v) in cols.iter().zip(vals) {
            spa.scatter_vec(rhs.row(i64_to_usize(k)), v, &mut c.indices);
        }
        spa.gather_nonzero_and_zero(&mut c.data, &mut c.indices);
        c.seal_row(i);
    }
}

/// CSR @ any matrix: one sparse-row dot product per output cell.
pub fn mul_csr_mat(c: &mut Csr<f64, i64>, lhs: &Csr<f64, i64>, b: &dyn Matrix) {
    let (_, bc) = b.dims();
    let raw = b.raw_dense();
    for i in 0..lhs.nrows {
        let (cols, vals) = lhs.row(i);
        for j in 0..bc {
            let mut v = 0.0f64;
            for (&k, &a) in cols.iter().zip(vals) {
                v += a * element(b, raw.as_ref(), i64_to_usize(k), j);
            }
            if v != 0.0 {
                c.indices.push(usize_to_i64(j));
                c.data.push(v);
            }
        }
        c.seal_row(i);
    }
}

/// DIA @ CSR, or CSR @ DIA when `trans` is set.
///
/// The result keeps the sparsity pattern of `other`. Without `trans` row `i`
/// is scaled by `diag[i]`; with it, each entry in column `j` is scaled by
/// `diag[j]`. Positions past the stored diagonal count as zero.
pub fn mul_dia_csr(c: &mut Csr<f64, i64>, dia: &Dia<f64>, other: &Csr<f64, i64>, trans: bool) {
    let diagonal = dia.diagonal();
    for i in 0..c.nrows {
        if trans {
            let (cols, vals) = other.row(i);
            for (&j, &a) in cols.iter().zip(vals) {
                let Some(&d) = diagonal.get(i64_to_usize(j)) else {
                    continue;
                };
                let v = a * d;
                if v != 0.0 {
                    c.indices.push(j);
                    c.data.push(v);
                }
            }
        } else if let Some(&d) = diagonal.get(i) {
            let (cols, vals) = other.row(i);
            for (&j, &a) in cols.iter().zip(vals) {
                let v = a * d;
                if v != 0.0 {
                    c.indices.push(j);
                    c.data.push(v);
                }
            }
        }
        c.seal_row(i);
    }
}

/// DIA @ any matrix, or any matrix @ DIA when `trans` is set.
///
/// Operands exposing a raw buffer are scaled a row at a time into a pooled
/// scratch buffer with SIMD; the rest go through element access.
pub fn mul_dia_mat(
    c: &mut Csr<f64, i64>,
    dia: &Dia<f64>,
    other: &dyn Matrix,
    trans: bool,
    pool: &WorkspacePool,
) {
    let (_, cols) = other.dims();
    let diagonal = dia.diagonal();

    if let Some(raw) = other.raw_dense() {
        let mut scaled = pool.acquire_floats(cols, false);
        for i in 0..c.nrows {
            if trans {
                let n = cols.min(diagonal.len());
                mul_into(&raw.row(i)[..n], &diagonal[..n], &mut scaled[..n]);
                push_nonzero(c, &scaled[..n]);
            } else if let Some(&d) = diagonal.get(i) {
                scale_into(raw.row(i), d, &mut scaled);
                push_nonzero(c, &scaled);
            }
            c.seal_row(i);
        }
        pool.release_floats(scaled);
        return;
    }

    for i in 0..c.nrows {
        if trans {
            for (k, &d) in diagonal.iter().enumerate().take(cols) {
                let v = other.at(i, k) * d;
                if v != 0.0 {
                    c.indices.push(usize_to_i64(k));
                    c.data.push(v);
                }
            }
        } else if let Some(&d) = diagonal.get(i) {
            for k in 0..cols {
                let v = other.at(i, k) * d;
                if v != 0.0 {
                    c.indices.push(usize_to_i64(k));
                    c.data.push(v);
                }
            }
        }
        c.seal_row(i);
    }
}

/// Any matrix @ CSR, computed as `(rhs^T @ a^T)^T` so the sparse operand
/// drives the row loop.
pub fn mul_mat_csr(
    c: &mut Csr<f64, i64>,
    a: &dyn Matrix,
    rhs: &Csr<f64, i64>,
    pool: &WorkspacePool,
) {
    let (ar, _) = a.dims();
    let bt = transpose_csr(rhs);
    let at = Transposed(a);
    let mut w = pool.acquire(bt.nrows, ar, bt.nnz(), true);
    mul_csr_mat(&mut w, &bt, &at);
    c.clone_from_csr(&transpose_csr(&w));
    pool.release(w);
}

/// Dense fallback for operands without any sparse capability.
///
/// Row `i` of `a` is materialised once into a scratch buffer and dotted with
/// every column of `b`, skipping its zero entries.
pub fn mul_mat_mat(c: &mut Csr<f64, i64>, a: &dyn Matrix, b: &dyn Matrix, pool: &WorkspacePool) {
    let (ar, ac) = a.dims();
    let (_, bc) = b.dims();
    let raw_a = a.raw_dense();
    let raw_b = b.raw_dense();
    let mut row = pool.acquire_floats(ac, false);
    for i in 0..ar {
        match &raw_a {
            Some(r) => row.copy_from_slice(r.row(i)),
            None => {
                for (k, x) in row.iter_mut().enumerate() {
                    *x = a.at(i, k);
                }
            }
        }
        for j in 0..bc {
            let mut v = 0.0f64;
            for (k, &e) in row.iter().enumerate() {
                if e != 0.0 {
                    v += e * element(b, raw_b.as_ref(), k, j);
                }
            }
            if v != 0.0 {
                c.indices.push(usize_to_i64(j));
                c.data.push(v);
            }
        }
        c.seal_row(i);
    }
    pool.release_floats(row);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparith_core::Dense;

    fn target(rows: usize, cols: usize) -> Csr<f64, i64> {
        Csr::zeros(rows, cols)
    }

    #[test]
    fn simd_helpers_handle_remainders() {
        let src = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = [0.0; 6];
        scale_into(&src, 2.0, &mut out);
        assert_eq!(out, [2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
        mul_into(&src, &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0], &mut out);
        assert_eq!(out, [1.0, 0.0, 3.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn gustavson_cancellation_emits_nothing() {
        // [1 1] @ [[1],[-1]] = [0]
        let a = Csr::from_parts(1, 2, vec![0, 2], vec![0, 1], vec![1.0, 1.0], true).unwrap();
        let b = Csr::from_parts(2, 1, vec![0, 1, 2], vec![0, 0], vec![1.0, -1.0], true).unwrap();
        let mut c = target(1, 1);
        mul_csr_csr(&mut c, &a, &b);
        assert_eq!(c.indptr, vec![0, 0]);
        assert!(c.indices.is_empty());
    }

    #[test]
    fn short_diagonal_zeroes_the_tail() {
        let s = Csr::from_parts(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![1.0, 1.0, 1.0], true)
            .unwrap();
        let d = Dia::new(3, 3, vec![5.0]).unwrap();
        let mut left = target(3, 3);
        mul_dia_csr(&mut left, &d, &s, false);
        assert_eq!(left.indptr, vec![0, 1, 1, 1]);
        let mut right = target(3, 3);
        mul_dia_csr(&mut right, &d, &s, true);
        assert_eq!(right.indptr, vec![0, 1, 1, 1]);
        assert_eq!(right.data, vec![5.0]);
    }

    #[test]
    fn dia_dense_raw_and_generic_paths_agree() {
        let pool = WorkspacePool::new(2);
        let m = Dense::from_rows(&[vec![1.0, 2.0, 0.0], vec![3.0, 4.0, 5.0]]).unwrap();
        let d = Dia::new(3, 3, vec![2.0, 0.0, 1.0]).unwrap();
        let mut raw = target(2, 3);
        mul_dia_mat(&mut raw, &d, &m, true, &pool);
        let mut generic = target(2, 3);
        mul_dia_mat(&mut generic, &d, &Transposed(&Transposed(&m)), true, &pool);
        assert_eq!(raw, generic);
        assert_eq!(raw.to_dense().data, vec![2.0, 0.0, 0.0, 6.0, 0.0, 5.0]);
    }
}
