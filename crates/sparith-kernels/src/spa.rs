//! Sparse accumulator (SPA) for building one output row at a time.
//!
//! The accumulator keeps a dense value array over the full index domain plus a
//! generation stamp per slot. A slot is live for the current row only while its
//! stamp equals `generation + 1`; finishing a row bumps `generation`, which
//! empties every slot at once without rewriting either array. Building a row
//! therefore costs time proportional to the contributions scattered into it,
//! not to the width of the domain.

use crate::util::{i64_to_usize, usize_to_i64};

/// Generation-stamped scratch row, reused across all rows of one kernel call.
#[derive(Debug, Clone)]
pub struct Spa {
    // flags[k] == generation + 1 iff slot k is live in the current row
    flags: Vec<usize>,
    // accumulated values; stale outside live slots
    dense: Vec<f64>,
    // entries of the caller's index vector already gathered by earlier rows
    sealed: usize,
    generation: usize,
}

impl Spa {
    /// Accumulator over the index domain `[0, n)`, all slots empty.
    ///
    /// For CSR results `n` is the number of result columns.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            flags: vec![0; n],
            dense: vec![0.0; n],
            sealed: 0,
            generation: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn generation(&self) -> usize {
        self.generation
    }

    /// True when `index` holds a value for the row being built.
    #[inline]
    #[must_use]
    pub fn is_live(&self, index: usize) -> bool {
        self.flags[index] == self.generation + 1
    }

    /// `SPA[index] += alpha * val`.
    ///
    /// The first touch of a slot in the current row appends `index` to `ind`,
    /// even when the contribution is exactly zero.
    ///
    /// # Panics
    /// If `index >= self.len()`.
    #[inline]
    pub fn scatter_value(&mut self, val: f64, index: usize, alpha: f64, ind: &mut Vec<i64>) {
        if self.flags[index] < self.generation + 1 {
            self.flags[index] = self.generation + 1;
            ind.push(usize_to_i64(index));
            self.dense[index] = alpha * val;
        } else {
            self.dense[index] += alpha * val;
        }
    }

    /// `SPA += alpha * x` for the sparse vector given by `(x, indx)`.
    #[inline]
    pub fn scatter(&mut self, x: &[f64], indx: &[i64], alpha: f64, ind: &mut Vec<i64>) {
        debug_assert_eq!(x.len(), indx.len());
        for (&v, &index) in x.iter().zip(indx) {
            self.scatter_value(v, i64_to_usize(index), alpha, ind);
        }
    }

    /// `SPA += alpha * x` for a sparse vector stored as `(indices, values)`,
    /// the pair [`Csr::row`](sparith_core::Csr::row) returns.
    #[inline]
    pub fn scatter_vec(&mut self, x: (&[i64], &[f64]), alpha: f64, ind: &mut Vec<i64>) {
        let (indx, vals) = x;
        self.scatter(vals, indx, alpha, ind);
    }

    /// `SPA += alpha * x` for a dense vector; zero entries of `x` are skipped
    /// and do not occupy a slot.
    #[inline]
    pub fn accumulate_dense(&mut self, x: &[f64], alpha: f64, ind: &mut Vec<i64>) {
        for (i, &v) in x.iter().enumerate() {
            if v != 0.0 {
                self.scatter_value(v, i, alpha, ind);
            }
        }
    }

    /// Appends the value of every slot touched since the last gather to
    /// `data`, in first-touch order. Zero values are kept.
    pub fn gather(&self, data: &mut Vec<f64>, ind: &[i64]) {
        debug_assert!(self.sealed <= ind.len());
        data.extend(ind[self.sealed..].iter().map(|&k| self.dense[i64_to_usize(k)]));
    }

    /// [`gather`](Self::gather), then start a new row by advancing the generation.
    pub fn gather_and_zero(&mut self, data: &mut Vec<f64>, ind: &[i64]) {
        self.gather(data, ind);
        self.sealed = ind.len();
        self.generation += 1;
    }

    /// Like [`gather_and_zero`](Self::gather_and_zero) but drops slots whose
    /// accumulated value is exactly zero from both `ind` and `data`.
    pub fn gather_nonzero_and_zero(&mut self, data: &mut Vec<f64>, ind: &mut Vec<i64>) {
        debug_assert!(self.sealed <= ind.len());
        let mut w = self.sealed;
        for r in self.sealed..ind.len() {
            let k = ind[r];
            let v = self.dense[i64_to_usize(k)];
            if v != 0.0 {
                ind[w] = k;
                data.push(v);
                w += 1;
            }
        }
        ind.truncate(w);
        self.sealed = w;
        self.generation += 1;
    }
}
