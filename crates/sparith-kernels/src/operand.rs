//! Operand capabilities and the closed set of operand kinds the dispatcher
//! understands.
//!
//! Kernel selection matches on [`MatRef`] first (row-compressed, diagonal,
//! anything else) and then queries the optional capabilities of the
//! [`Matrix`] trait: a raw dense buffer, a stored-entry count, and conversion
//! to CSR.

use crate::convert::{coo_to_csr_f64_i64, csc_to_csr_f64_i64};
use sparith_core::{Coo, Csc, Csr, Dense, Dia};

/// Borrowed row-major buffer: row `i` is `data[i * stride..i * stride + cols]`.
#[derive(Debug, Clone, Copy)]
pub struct RawDense<'a> {
    pub data: &'a [f64],
    pub stride: usize,
    pub cols: usize,
}

impl<'a> RawDense<'a> {
    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &'a [f64] {
        let base = i * self.stride;
        &self.data[base..base + self.cols]
    }
}

/// Element access plus optional fast-path capabilities.
pub trait Matrix {
    fn dims(&self) -> (usize, usize);

    /// Value at `(i, j)`; zero where nothing is stored.
    fn at(&self, i: usize, j: usize) -> f64;

    /// Direct access to a row-major backing buffer, if there is one.
    fn raw_dense(&self) -> Option<RawDense<'_>> {
        None
    }

    /// Number of explicitly stored entries, if the format tracks them.
    fn nnz(&self) -> Option<usize> {
        None
    }

    /// Row-compressed copy of this matrix, if the format can produce one.
    fn to_csr(&self) -> Option<Csr<f64, i64>> {
        None
    }
}

impl Matrix for Csr<f64, i64> {
    fn dims(&self) -> (usize, usize) {
        self.shape()
    }
    fn at(&self, i: usize, j: usize) -> f64 {
        self.get(i, j)
    }
    fn nnz(&self) -> Option<usize> {
        Some(Csr::nnz(self))
    }
    fn to_csr(&self) -> Option<Csr<f64, i64>> {
        Some(self.clone())
    }
}

impl Matrix for Csc<f64, i64> {
    fn dims(&self) -> (usize, usize) {
        self.shape()
    }
    fn at(&self, i: usize, j: usize) -> f64 {
        self.get(i, j)
    }
    fn nnz(&self) -> Option<usize> {
        Some(Csc::nnz(self))
    }
    fn to_csr(&self) -> Option<Csr<f64, i64>> {
        Some(csc_to_csr_f64_i64(self))
    }
}

impl Matrix for Coo<f64, i64> {
    fn dims(&self) -> (usize, usize) {
        self.shape()
    }
    fn at(&self, i: usize, j: usize) -> f64 {
        self.get(i, j)
    }
    fn nnz(&self) -> Option<usize> {
        Some(Coo::nnz(self))
    }
    fn to_csr(&self) -> Option<Csr<f64, i64>> {
        Some(coo_to_csr_f64_i64(self))
    }
}

impl Matrix for Dia<f64> {
    fn dims(&self) -> (usize, usize) {
        self.shape()
    }
    fn at(&self, i: usize, j: usize) -> f64 {
        self.get(i, j)
    }
    fn nnz(&self) -> Option<usize> {
        Some(Dia::nnz(self))
    }
}

impl Matrix for Dense<f64> {
    fn dims(&self) -> (usize, usize) {
        self.shape()
    }
    fn at(&self, i: usize, j: usize) -> f64 {
        self.get(i, j)
    }
    fn raw_dense(&self) -> Option<RawDense<'_>> {
        Some(RawDense {
            data: &self.data,
            stride: self.stride,
            cols: self.ncols,
        })
    }
}

/// Transposed view over any matrix; element access only.
#[derive(Clone, Copy)]
pub struct Transposed<'a>(pub &'a dyn Matrix);

impl Matrix for Transposed<'_> {
    fn dims(&self) -> (usize, usize) {
        let (r, c) = self.0.dims();
        (c, r)
    }
    fn at(&self, i: usize, j: usize) -> f64 {
        self.0.at(j, i)
    }
    fn nnz(&self) -> Option<usize> {
        self.0.nnz()
    }
}

/// Operand as passed to the arithmetic entry points.
///
/// `Dst` stands for the destination matrix itself, so `C = C * B` is written
/// `multiply(&mut c, MatRef::Dst, MatRef::Csr(&b))`. Such calls are computed
/// into a temporary and copied back.
#[derive(Clone, Copy)]
pub enum MatRef<'a> {
    Dst,
    Csr(&'a Csr<f64, i64>),
    Dia(&'a Dia<f64>),
    Other(&'a dyn Matrix),
}

impl<'a> MatRef<'a> {
    #[inline]
    #[must_use]
    pub const fn is_dst(&self) -> bool {
        matches!(self, Self::Dst)
    }

    /// Resolves `Dst` to the given matrix; other kinds pass through.
    #[must_use]
    pub fn bind(self, dst: &'a Csr<f64, i64>) -> Operand<'a> {
        match self {
            Self::Dst => Operand::Csr(dst),
            Self::Csr(m) => Operand::Csr(m),
            Self::Dia(m) => Operand::Dia(m),
            Self::Other(m) => Operand::Other(m),
        }
    }

    /// Converts an operand known not to be `Dst`.
    ///
    /// # Panics
    /// On `Dst`; the aliasing resolver routes those through [`bind`](Self::bind).
    #[must_use]
    pub fn detached(self) -> Operand<'a> {
        match self {
            Self::Dst => unreachable!("destination operands are always bound to a workspace"),
            Self::Csr(m) => Operand::Csr(m),
            Self::Dia(m) => Operand::Dia(m),
            Self::Other(m) => Operand::Other(m),
        }
    }
}

impl<'a> From<&'a Csr<f64, i64>> for MatRef<'a> {
    fn from(m: &'a Csr<f64, i64>) -> Self {
        Self::Csr(m)
    }
}

impl<'a> From<&'a Dia<f64>> for MatRef<'a> {
    fn from(m: &'a Dia<f64>) -> Self {
        Self::Dia(m)
    }
}

impl<'a> From<&'a Dense<f64>> for MatRef<'a> {
    fn from(m: &'a Dense<f64>) -> Self {
        Self::Other(m)
    }
}

impl<'a> From<&'a Csc<f64, i64>> for MatRef<'a> {
    fn from(m: &'a Csc<f64, i64>) -> Self {
        Self::Other(m)
    }
}

impl<'a> From<&'a Coo<f64, i64>> for MatRef<'a> {
    fn from(m: &'a Coo<f64, i64>) -> Self {
        Self::Other(m)
    }
}

/// Operand with the destination already resolved; what the kernels consume.
#[derive(Clone, Copy)]
pub enum Operand<'a> {
    Csr(&'a Csr<f64, i64>),
    Dia(&'a Dia<f64>),
    Other(&'a dyn Matrix),
}

impl<'a> Operand<'a> {
    #[must_use]
    pub fn as_matrix(&self) -> &'a dyn Matrix {
        match *self {
            Self::Csr(m) => m,
            Self::Dia(m) => m,
            Self::Other(m) => m,
        }
    }

    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        self.as_matrix().dims()
    }

    #[must_use]
    pub fn nnz(&self) -> Option<usize> {
        self.as_matrix().nnz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_exposes_raw_buffer() {
        let d = Dense::with_stride(2, 2, 3, vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.0]).unwrap();
        let raw = d.raw_dense().unwrap();
        assert_eq!(raw.row(1), &[3.0, 4.0]);
        assert!(d.to_csr().is_none());
    }

    #[test]
    fn transposed_view_swaps_indices() {
        let d = Dense::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
        let t = Transposed(&d);
        assert_eq!(t.dims(), (3, 1));
        assert_eq!(t.at(2, 0), 3.0);
        assert!(t.raw_dense().is_none());
    }

    #[test]
    fn bind_resolves_destination() {
        let c = Csr::zeros(2, 3);
        let op = MatRef::Dst.bind(&c);
        assert!(matches!(op, Operand::Csr(m) if std::ptr::eq(m, &c)));
        assert_eq!(op.dims(), (2, 3));
        assert_eq!(op.nnz(), Some(0));
    }

    #[test]
    fn convertible_formats_report_csr() {
        let coo = Coo::from_parts(2, 2, vec![0, 1], vec![1, 0], vec![3.0, 4.0], true).unwrap();
        let csr = coo.to_csr().unwrap();
        assert_eq!(csr.get(0, 1), 3.0);
        assert_eq!(csr.get(1, 0), 4.0);
    }
}
