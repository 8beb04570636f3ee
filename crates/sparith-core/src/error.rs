//! Construction errors shared by every storage format.

/// Structural problems detected while assembling a matrix from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Pointer array does not have `outer + 1` entries.
    #[error("indptr length must be {expected}, got {got}")]
    IndptrLength { expected: usize, got: usize },

    /// Two parallel arrays disagree in length.
    #[error("{what} must have equal length ({left} != {right})")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("indptr first element must be 0, got {0}")]
    IndptrStart(i64),

    #[error("indptr last element must equal nnz ({nnz}), got {got}")]
    IndptrEnd { nnz: usize, got: i64 },

    /// Pointer array decreases or goes negative somewhere.
    #[error("indptr must be non-decreasing and non-negative (at position {0})")]
    IndptrOrder(usize),

    #[error("{axis} index {index} out of bounds for dimension {bound}")]
    IndexOutOfBounds {
        axis: &'static str,
        index: i64,
        bound: usize,
    },

    /// A column appears twice in one row (or a row twice in one column).
    #[error("duplicate {axis} index {index} in outer slice {outer}")]
    DuplicateIndex {
        axis: &'static str,
        outer: usize,
        index: i64,
    },

    /// Dense buffer too short for the declared shape and stride.
    #[error("dense buffer of length {got} cannot hold {nrows}x{ncols} with stride {stride}")]
    DenseBuffer {
        nrows: usize,
        ncols: usize,
        stride: usize,
        got: usize,
    },

    #[error("diagonal of length {len} does not fit a {nrows}x{ncols} matrix")]
    DiagonalLength { len: usize, nrows: usize, ncols: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indptr_end_display() {
        let err = FormatError::IndptrEnd { nnz: 3, got: 2 };
        let msg = format!("{err}");
        assert!(msg.contains("last element"));
        assert!(msg.contains("(3)"));
    }

    #[test]
    fn test_duplicate_display() {
        let err = FormatError::DuplicateIndex {
            axis: "column",
            outer: 4,
            index: 1,
        };
        let msg = format!("{err}");
        assert!(msg.contains("duplicate column index 1"));
        assert!(msg.contains("slice 4"));
    }
}
