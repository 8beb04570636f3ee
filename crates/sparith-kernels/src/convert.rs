//! Conversions into CSR, the format every sparse kernel works on.
//!
//! - CSC -> CSR (cursor scatter, parallel sort for large inputs)
//! - COO -> CSR (sort + coalesce, duplicates are summed)
//! - CSR transpose (counting sort)

#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k/p for indices"
)]

use crate::util::{i64_to_usize, usize_to_i64, SMALL_NNZ_LIMIT};
use rayon::prelude::*;
use sparith_core::{Coo, Csc, Csr};

/// Converts CSC (Compressed Sparse Column) to CSR (Compressed Sparse Row) format.
///
/// # Algorithm
/// 1. Count nonzeros per row (from row indices)
/// 2. Prefix-sum into row pointers
/// 3. Place each element at its row's cursor; large inputs sort
///    `(row, col)` pairs in parallel instead
///
/// Either way, columns come out increasing within each row.
#[must_use]
pub fn csc_to_csr_f64_i64(a: &Csc<f64, i64>) -> Csr<f64, i64> {
    let nrows = a.nrows;
    let ncols = a.ncols;
    let nnz = a.data.len();
    let mut indptr = vec![0i64; nrows + 1];
    for &i in &a.indices {
        indptr[i64_to_usize(i) + 1] += 1;
    }
    for r in 0..nrows {
        indptr[r + 1] += indptr[r];
    }

    if nnz <= SMALL_NNZ_LIMIT {
        let mut indices = vec![0i64; nnz];
        let mut data = vec![0.0f64; nnz];
        let mut next: Vec<i64> = indptr[..nrows].to_vec();
        for j in 0..ncols {
            let s = i64_to_usize(a.indptr[j]);
            let e = i64_to_usize(a.indptr[j + 1]);
            for p in s..e {
                let i = i64_to_usize(a.indices[p]);
                let dst = i64_to_usize(next[i]);
                next[i] += 1;
                indices[dst] = usize_to_i64(j);
                data[dst] = a.data[p];
            }
        }
        return Csr::from_parts_unchecked(nrows, ncols, indptr, indices, data);
    }

    // Large inputs: gather (row, col, value) per column in parallel, then a
    // parallel sort puts each row's entries next to each other with columns
    // increasing, the same order the sequential scatter produces.
    let (colptr, rows, vals) = (&a.indptr, &a.indices, &a.data);
    let mut triples: Vec<(i64, i64, f64)> = (0..ncols)
        .into_par_iter()
        .flat_map_iter(move |j| {
            let s = i64_to_usize(colptr[j]);
            let e = i64_to_usize(colptr[j + 1]);
            (s..e).map(move |p| (rows[p], usize_to_i64(j), vals[p]))
        })
        .collect();
    triples.par_sort_unstable_by_key(|&(i, j, _)| (i, j));
    let (indices, data): (Vec<i64>, Vec<f64>) =
        triples.into_par_iter().map(|(_, j, v)| (j, v)).unzip();
    Csr::from_parts_unchecked(nrows, ncols, indptr, indices, data)
}

/// Converts COO (Coordinate) to CSR (Compressed Sparse Row) format.
///
/// Duplicate coordinates are summed; column indices come out strictly
/// increasing within each row.
#[must_use]
pub fn coo_to_csr_f64_i64(a: &Coo<f64, i64>) -> Csr<f64, i64> {
    let nrows = a.nrows;
    let ncols = a.ncols;
    let nnz = a.data.len();
    let mut triples: Vec<(i64, i64, f64)> =
        (0..nnz).map(|k| (a.row[k], a.col[k], a.data[k])).collect();
    triples.sort_unstable_by(|x, y| x.0.cmp(&y.0).then(x.1.cmp(&y.1)));

    let mut out = Csr::with_capacity(nrows, ncols, nnz);
    let mut sealed = 0usize;
    let mut last: Option<(i64, i64)> = None;
    for (r, c, v) in triples {
        if last == Some((r, c)) {
            if let Some(acc) = out.data.last_mut() {
                *acc += v;
            }
            continue;
        }
        let ru = i64_to_usize(r);
        while sealed < ru {
            out.seal_row(sealed);
            sealed += 1;
        }
        out.indices.push(c);
        out.data.push(v);
        last = Some((r, c));
    }
    while sealed < nrows {
        out.seal_row(sealed);
        sealed += 1;
    }
    out
}

/// Transposes a CSR matrix: A (nrows x ncols) -> A^T (ncols x nrows).
///
/// Rows of the result list their columns in increasing order.
#[must_use]
pub fn transpose_csr(a: &Csr<f64, i64>) -> Csr<f64, i64> {
    let nrows_t = a.ncols;
    let ncols_t = a.nrows;
    let nnz = a.data.len();
    let mut indptr = vec![0i64; nrows_t + 1];
    for &j in &a.indices {
        indptr[i64_to_usize(j) + 1] += 1;
    }
    for j in 0..nrows_t {
        indptr[j + 1] += indptr[j];
    }
    let mut next: Vec<i64> = indptr[..nrows_t].to_vec();
    let mut indices = vec![0i64; nnz];
    let mut data = vec![0.0f64; nnz];
    for i in 0..a.nrows {
        let s = i64_to_usize(a.indptr[i]);
        let e = i64_to_usize(a.indptr[i + 1]);
        for p in s..e {
            let j = i64_to_usize(a.indices[p]);
            let dst = i64_to_usize(next[j]);
            next[j] += 1;
            indices[dst] = usize_to_i64(i);
            data[dst] = a.data[p];
        }
    }
    Csr::from_parts_unchecked(nrows_t, ncols_t, indptr, indices, data)
}
