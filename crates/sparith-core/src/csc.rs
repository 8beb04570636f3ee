//! CSC format definitions and constructors

use crate::csr::validate_compressed;
use crate::error::FormatError;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Csc<T, I> {
    pub data: Vec<T>,
    pub indices: Vec<I>, // row indices per column
    pub indptr: Vec<I>,  // column pointer, length ncols + 1
    pub ncols: usize,
    pub nrows: usize,
}

impl<T, I> Csc<T, I> {
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl Csc<f64, i64> {
    /// Builds a CSC matrix from raw parts; see [`crate::Csr::from_parts`].
    ///
    /// # Errors
    /// Returns a [`FormatError`] describing the first violated invariant.
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self, FormatError> {
        validate_compressed(ncols, nrows, &indptr, &indices, data.len(), check, "row")?;
        Ok(Self {
            data,
            indices,
            indptr,
            ncols,
            nrows,
        })
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            data,
            indices,
            indptr,
            ncols,
            nrows,
        }
    }

    /// Value at `(i, j)`, zero when nothing is stored there.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (Ok(s), Ok(e)) = (usize::try_from(self.indptr[j]), usize::try_from(self.indptr[j + 1]))
        else {
            return 0.0;
        };
        self.indices[s..e]
            .iter()
            .position(|&r| usize::try_from(r).is_ok_and(|r| r == i))
            .map_or(0.0, |p| self.data[s + p])
    }
}
