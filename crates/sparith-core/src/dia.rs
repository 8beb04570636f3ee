//! Diagonal matrices

use crate::error::FormatError;

/// Matrix whose only non-zero entries sit on the main diagonal.
///
/// The stored diagonal may be shorter than `min(nrows, ncols)`; the missing
/// tail is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Dia<T> {
    pub nrows: usize,
    pub ncols: usize,
    diag: Vec<T>,
}

impl<T> Dia<T> {
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline]
    #[must_use]
    pub fn diagonal(&self) -> &[T] {
        &self.diag
    }
}

impl Dia<f64> {
    /// # Errors
    /// [`FormatError::DiagonalLength`] if `diag` is longer than `min(nrows, ncols)`.
    pub fn new(nrows: usize, ncols: usize, diag: Vec<f64>) -> Result<Self, FormatError> {
        if diag.len() > nrows.min(ncols) {
            return Err(FormatError::DiagonalLength {
                len: diag.len(),
                nrows,
                ncols,
            });
        }
        Ok(Self { nrows, ncols, diag })
    }

    /// Square `n x n` matrix with the given diagonal.
    #[must_use]
    pub fn square(diag: Vec<f64>) -> Self {
        let n = diag.len();
        Self {
            nrows: n,
            ncols: n,
            diag,
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            self.diag.get(i).copied().unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// Number of stored diagonal entries that are non-zero.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.diag.iter().filter(|&&v| v != 0.0).count()
    }
}
