//! Row-major dense matrices

use crate::error::FormatError;

/// Row-major dense matrix; row `i` starts at `data[i * stride]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense<T> {
    pub nrows: usize,
    pub ncols: usize,
    pub stride: usize,
    pub data: Vec<T>,
}

impl<T> Dense<T> {
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl Dense<f64> {
    /// # Errors
    /// [`FormatError::DenseBuffer`] if `data.len() != nrows * ncols`.
    pub fn new(nrows: usize, ncols: usize, data: Vec<f64>) -> Result<Self, FormatError> {
        if data.len() != nrows * ncols {
            return Err(FormatError::DenseBuffer {
                nrows,
                ncols,
                stride: ncols,
                got: data.len(),
            });
        }
        Ok(Self {
            nrows,
            ncols,
            stride: ncols,
            data,
        })
    }

    /// Wraps a buffer whose rows are `stride` apart (`stride >= ncols`).
    ///
    /// # Errors
    /// [`FormatError::DenseBuffer`] if the buffer cannot hold the last row.
    pub fn with_stride(
        nrows: usize,
        ncols: usize,
        stride: usize,
        data: Vec<f64>,
    ) -> Result<Self, FormatError> {
        let needed = if nrows == 0 { 0 } else { (nrows - 1) * stride + ncols };
        if stride < ncols || data.len() < needed {
            return Err(FormatError::DenseBuffer {
                nrows,
                ncols,
                stride,
                got: data.len(),
            });
        }
        Ok(Self {
            nrows,
            ncols,
            stride,
            data,
        })
    }

    #[must_use]
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            stride: ncols,
            data: vec![0.0; nrows * ncols],
        }
    }

    /// Builds a matrix from equally sized rows.
    ///
    /// # Errors
    /// [`FormatError::LengthMismatch`] if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, FormatError> {
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * ncols);
        for r in rows {
            if r.len() != ncols {
                return Err(FormatError::LengthMismatch {
                    what: "dense rows",
                    left: r.len(),
                    right: ncols,
                });
            }
            data.extend_from_slice(r);
        }
        Self::new(rows.len(), ncols, data)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(j < self.ncols);
        self.data[i * self.stride + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        debug_assert!(j < self.ncols);
        self.data[i * self.stride + j] = v;
    }

    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        let base = i * self.stride;
        &self.data[base..base + self.ncols]
    }
}
