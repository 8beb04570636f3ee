//! CSR format definitions and constructors

use crate::dense::Dense;
use crate::error::FormatError;

/// Compressed sparse row matrix.
///
/// `indptr` has `nrows + 1` entries; row `i` owns `indices[indptr[i]..indptr[i+1]]`
/// and the matching slice of `data`. Column indices inside a row are unique but
/// not necessarily sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct Csr<T, I> {
    pub nrows: usize,
    pub ncols: usize,
    pub indptr: Vec<I>,
    pub indices: Vec<I>,
    pub data: Vec<T>,
}

impl<T, I> Csr<T, I> {
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// True for the 0x0 matrix, i.e. one that has never been sized.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nrows == 0 && self.ncols == 0
    }
}

impl Default for Csr<f64, i64> {
    fn default() -> Self {
        Self::zeros(0, 0)
    }
}

impl Csr<f64, i64> {
    /// Builds a CSR matrix from raw parts.
    ///
    /// With `check` set, every pointer and index is validated, including
    /// per-row uniqueness of column indices.
    ///
    /// # Errors
    /// Returns a [`FormatError`] describing the first violated invariant.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self, FormatError> {
        validate_compressed(nrows, ncols, &indptr, &indices, data.len(), check, "column")?;
        Ok(Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
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
            nrows,
            ncols,
            indptr,
            indices,
            data,
        }
    }

    /// An all-zero `nrows x ncols` matrix with no stored entries.
    #[must_use]
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::with_capacity(nrows, ncols, 0)
    }

    /// An all-zero matrix with room for `nnz` entries before reallocating.
    #[must_use]
    pub fn with_capacity(nrows: usize, ncols: usize, nnz: usize) -> Self {
        Self {
            nrows,
            ncols,
            indptr: vec![0; nrows + 1],
            indices: Vec::with_capacity(nnz),
            data: Vec::with_capacity(nnz),
        }
    }

    /// Reshapes the matrix into an empty `nrows x ncols` skeleton, keeping the
    /// existing allocations and reserving room for `nnz` entries.
    ///
    /// When `clear` is false the row pointers past the first are left stale;
    /// callers must then seal every row themselves.
    pub fn reuse_as(&mut self, nrows: usize, ncols: usize, nnz: usize, clear: bool) {
        self.nrows = nrows;
        self.ncols = ncols;
        if clear {
            self.indptr.clear();
        }
        self.indptr.resize(nrows + 1, 0);
        self.indptr[0] = 0;
        self.indices.clear();
        self.data.clear();
        self.indices.reserve(nnz);
        self.data.reserve(nnz);
    }

    /// Closes row `i` at the current end of the entry arrays.
    #[inline]
    pub fn seal_row(&mut self, i: usize) {
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        {
            self.indptr[i + 1] = self.indices.len() as i64;
        }
    }

    /// Column indices and values stored in row `i`.
    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> (&[i64], &[f64]) {
        let (s, e) = self.row_range(i);
        (&self.indices[s..e], &self.data[s..e])
    }

    #[inline]
    #[must_use]
    pub fn row_range(&self, i: usize) -> (usize, usize) {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        {
            (self.indptr[i] as usize, self.indptr[i + 1] as usize)
        }
    }

    /// Value at `(i, j)`, zero when nothing is stored there.
    ///
    /// # Panics
    /// If `i >= nrows` or `j >= ncols`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.nrows && j < self.ncols, "index ({i}, {j}) out of bounds");
        let (cols, vals) = self.row(i);
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let j = j as i64;
        cols.iter()
            .position(|&c| c == j)
            .map_or(0.0, |p| vals[p])
    }

    /// Overwrites `self` with a copy of `src`, reusing `self`'s buffers.
    pub fn clone_from_csr(&mut self, src: &Self) {
        self.nrows = src.nrows;
        self.ncols = src.ncols;
        self.indptr.clear();
        self.indptr.extend_from_slice(&src.indptr);
        self.indices.clear();
        self.indices.extend_from_slice(&src.indices);
        self.data.clear();
        self.data.extend_from_slice(&src.data);
    }

    #[must_use]
    pub fn to_dense(&self) -> Dense<f64> {
        let mut out = Dense::zeros(self.nrows, self.ncols);
        for i in 0..self.nrows {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals) {
                #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
                let j = j as usize;
                out.set(i, j, v);
            }
        }
        out
    }
}

/// Shared pointer/index validation for the compressed formats.
///
/// `outer` is the number of compressed slices (rows for CSR, columns for CSC)
/// and `inner` the bound for the stored indices.
pub(crate) fn validate_compressed(
    outer: usize,
    inner: usize,
    indptr: &[i64],
    indices: &[i64],
    nvals: usize,
    check: bool,
    inner_axis: &'static str,
) -> Result<(), FormatError> {
    if indptr.len() != outer + 1 {
        return Err(FormatError::IndptrLength {
            expected: outer + 1,
            got: indptr.len(),
        });
    }
    if indices.len() != nvals {
        return Err(FormatError::LengthMismatch {
            what: "indices and data",
            left: indices.len(),
            right: nvals,
        });
    }
    let nnz = indices.len();
    let first = indptr.first().copied().unwrap_or(0);
    if first != 0 {
        return Err(FormatError::IndptrStart(first));
    }
    let last = indptr.last().copied().unwrap_or(0);
    if usize::try_from(last).ok() != Some(nnz) {
        return Err(FormatError::IndptrEnd { nnz, got: last });
    }
    if !check {
        return Ok(());
    }
    for (pos, w) in indptr.windows(2).enumerate() {
        if w[0] > w[1] || w[0] < 0 {
            return Err(FormatError::IndptrOrder(pos));
        }
    }
    // Generation-stamped marker: slot j holds o+1 when index j was seen in slice o.
    let mut seen = vec![0usize; inner];
    for o in 0..outer {
        let (Ok(start), Ok(end)) = (usize::try_from(indptr[o]), usize::try_from(indptr[o + 1]))
        else {
            return Err(FormatError::IndptrOrder(o));
        };
        for &j in &indices[start..end] {
            let Some(ju) = usize::try_from(j).ok().filter(|&ju| ju < inner) else {
                return Err(FormatError::IndexOutOfBounds {
                    axis: inner_axis,
                    index: j,
                    bound: inner,
                });
            };
            if seen[ju] == o + 1 {
                return Err(FormatError::DuplicateIndex {
                    axis: inner_axis,
                    outer: o,
                    index: j,
                });
            }
            seen[ju] = o + 1;
        }
    }
    Ok(())
}
