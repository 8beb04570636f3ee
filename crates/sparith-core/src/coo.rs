//! COO format definitions and constructors

use crate::error::FormatError;

/// Coordinate-list matrix. Duplicate coordinates are allowed and sum on conversion.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Coo<T, I> {
    pub data: Vec<T>,
    pub row: Vec<I>, // length nnz
    pub col: Vec<I>, // length nnz
    pub ncols: usize,
    pub nrows: usize,
}

impl<T, I> Coo<T, I> {
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

impl Coo<f64, i64> {
    /// # Errors
    /// Returns a [`FormatError`] if the coordinate arrays disagree in length or,
    /// with `check`, if any coordinate falls outside the shape.
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        row: Vec<i64>,
        col: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self, FormatError> {
        if row.len() != data.len() || col.len() != data.len() {
            return Err(FormatError::LengthMismatch {
                what: "row/col/data",
                left: row.len().max(col.len()),
                right: data.len(),
            });
        }
        if check {
            for (&i, &j) in row.iter().zip(&col) {
                if !usize::try_from(i).is_ok_and(|ii| ii < nrows) {
                    return Err(FormatError::IndexOutOfBounds {
                        axis: "row",
                        index: i,
                        bound: nrows,
                    });
                }
                if !usize::try_from(j).is_ok_and(|jj| jj < ncols) {
                    return Err(FormatError::IndexOutOfBounds {
                        axis: "column",
                        index: j,
                        bound: ncols,
                    });
                }
            }
        }
        Ok(Self {
            data,
            row,
            col,
            ncols,
            nrows,
        })
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        row: Vec<i64>,
        col: Vec<i64>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            data,
            row,
            col,
            ncols,
            nrows,
        }
    }

    /// Sum of all entries stored at `(i, j)`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.row
            .iter()
            .zip(&self.col)
            .zip(&self.data)
            .filter(|((&r, &c), _)| {
                usize::try_from(r).is_ok_and(|r| r == i) && usize::try_from(c).is_ok_and(|c| c == j)
            })
            .map(|(_, &v)| v)
            .sum()
    }
}
