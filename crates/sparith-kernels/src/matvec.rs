//! Sparse matrix-vector product for CSR: `out += A @ x`.

use crate::config::ArithConfig;
use crate::error::{ArithError, Result};
use crate::util::{i64_to_usize, row_ranges, RANGE_NNZ_TARGET};
use rayon::prelude::*;
use sparith_core::Csr;

/// Dot product of row `i` with `x`, unrolled four ways with FMA.
#[inline]
fn row_dot(a: &Csr<f64, i64>, x: &[f64], i: usize) -> f64 {
    let (cols, vals) = a.row(i);
    let mut acc = 0.0f64;
    let mut ci = cols.chunks_exact(4);
    let mut vi = vals.chunks_exact(4);
    for (c, v) in (&mut ci).zip(&mut vi) {
        acc = v[3].mul_add(
            x[i64_to_usize(c[3])],
            v[2].mul_add(
                x[i64_to_usize(c[2])],
                v[1].mul_add(x[i64_to_usize(c[1])], v[0].mul_add(x[i64_to_usize(c[0])], acc)),
            ),
        );
    }
    for (&c, &v) in ci.remainder().iter().zip(vi.remainder()) {
        acc = v.mul_add(x[i64_to_usize(c)], acc);
    }
    acc
}

/// `out += A @ x` with the default thresholds.
///
/// # Errors
/// [`ArithError::VectorLength`] if `x.len() != ncols` or `out.len() != nrows`.
pub fn mat_vec(a: &Csr<f64, i64>, x: &[f64], out: &mut [f64]) -> Result<()> {
    mat_vec_with(a, x, out, &ArithConfig::default())
}

/// `out += A @ x`.
///
/// Small problems run on the calling thread. Larger ones split the rows into
/// ranges of roughly equal stored entries and process the ranges with rayon.
///
/// # Errors
/// [`ArithError::VectorLength`] if `x.len() != ncols` or `out.len() != nrows`.
pub fn mat_vec_with(
    a: &Csr<f64, i64>,
    x: &[f64],
    out: &mut [f64],
    config: &ArithConfig,
) -> Result<()> {
    if x.len() != a.ncols {
        return Err(ArithError::VectorLength {
            what: "x",
            expected: a.ncols,
            got: x.len(),
        });
    }
    if out.len() != a.nrows {
        return Err(ArithError::VectorLength {
            what: "out",
            expected: a.nrows,
            got: out.len(),
        });
    }

    let small = a.nrows <= config.par_rows_threshold || a.nnz() <= config.par_nnz_threshold;
    if small {
        for (i, yi) in out.iter_mut().enumerate() {
            *yi += row_dot(a, x, i);
        }
        return Ok(());
    }

    let ranges = row_ranges(&a.indptr, RANGE_NNZ_TARGET);
    tracing::trace!(ranges = ranges.len(), "parallel mat_vec");
    let mut parts: Vec<(usize, &mut [f64])> = Vec::with_capacity(ranges.len());
    let mut rest: &mut [f64] = out;
    let mut offset = 0usize;
    for (r0, r1) in ranges {
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(r0 - offset);
        let (mid, tail) = tail.split_at_mut(r1 - r0);
        parts.push((r0, mid));
        rest = tail;
        offset = r1;
    }
    parts.into_par_iter().for_each(|(r0, ys)| {
        for (k, y) in ys.iter_mut().enumerate() {
            *y += row_dot(a, x, r0 + k);
        }
    });
    Ok(())
}
