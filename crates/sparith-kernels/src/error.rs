//! Arithmetic error types.

/// Result type alias for the arithmetic entry points.
pub type Result<T> = std::result::Result<T, ArithError>;

/// Precondition failures detected before any destination is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithError {
    /// Operand shapes are not conformant for the operation.
    #[error("shape mismatch in {op}: {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// Destination aliases an operand but already has a different, non-empty shape.
    #[error("destination has shape {got:?}, result needs {expected:?}")]
    DestinationShape {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// Vector argument length does not match the matrix.
    #[error("{what} has length {got}, expected {expected}")]
    VectorLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}
