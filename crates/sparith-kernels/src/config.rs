//! Tunables for the arithmetic entry points.

use crate::util::{DENSITY_DIVISOR, POOL_BUCKET_LIMIT, SMALL_DIM_LIMIT, SMALL_NNZ_LIMIT};

/// Knobs read by the dispatcher, the pools and the matrix-vector kernel.
///
/// Thread count for the parallel paths comes from rayon (`RAYON_NUM_THREADS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithConfig {
    /// Capacity hint is `rows * cols / density_divisor` when an operand has no nnz.
    pub density_divisor: usize,
    /// Maximum pooled matrices or buffers kept per size class and thread.
    pub pool_bucket_limit: usize,
    /// `mat_vec` stays sequential below this many rows...
    pub par_rows_threshold: usize,
    /// ...or below this many stored entries.
    pub par_nnz_threshold: usize,
}

impl Default for ArithConfig {
    fn default() -> Self {
        Self {
            density_divisor: DENSITY_DIVISOR,
            pool_bucket_limit: POOL_BUCKET_LIMIT,
            par_rows_threshold: SMALL_DIM_LIMIT,
            par_nnz_threshold: SMALL_NNZ_LIMIT,
        }
    }
}

impl ArithConfig {
    #[must_use]
    pub const fn with_density_divisor(mut self, divisor: usize) -> Self {
        self.density_divisor = divisor;
        self
    }

    #[must_use]
    pub const fn with_pool_bucket_limit(mut self, limit: usize) -> Self {
        self.pool_bucket_limit = limit;
        self
    }

    #[must_use]
    pub const fn with_parallel_thresholds(mut self, rows: usize, nnz: usize) -> Self {
        self.par_rows_threshold = rows;
        self.par_nnz_threshold = nnz;
        self
    }

    /// Capacity estimate for an `rows x cols` result.
    #[must_use]
    pub fn capacity_hint(&self, rows: usize, cols: usize, nnz: Option<(usize, usize)>) -> usize {
        match nnz {
            Some((a, b)) => a + b,
            None => rows.saturating_mul(cols) / self.density_divisor.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_prefers_operand_nnz() {
        let cfg = ArithConfig::default();
        assert_eq!(cfg.capacity_hint(100, 100, Some((3, 4))), 7);
        assert_eq!(cfg.capacity_hint(100, 100, None), 1000);
        assert_eq!(cfg.with_density_divisor(0).capacity_hint(2, 3, None), 6);
    }
}
