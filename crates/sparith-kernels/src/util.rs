//! Utility constants and index conversions shared by the kernels.

/// Below this many rows, row-parallel loops run sequentially.
pub const SMALL_DIM_LIMIT: usize = 2048;
/// Below this many stored entries, row-parallel loops run sequentially.
pub const SMALL_NNZ_LIMIT: usize = 32 * 1024;
/// Target stored entries per parallel row range.
pub const RANGE_NNZ_TARGET: usize = 128 * 1024;
/// Output density guess (`rows * cols / DENSITY_DIVISOR`) when operands carry no nnz.
pub const DENSITY_DIVISOR: usize = 10;
/// Pooled objects kept per size class and thread.
pub const POOL_BUCKET_LIMIT: usize = 8;

/// Convert i64 to usize, asserting non-negativity.
#[inline]
#[must_use]
pub fn i64_to_usize(x: i64) -> usize {
    debug_assert!(x >= 0);
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    {
        x as usize
    }
}

/// Convert usize to i64, asserting it fits.
#[inline]
#[must_use]
pub fn usize_to_i64(x: usize) -> i64 {
    debug_assert!(i64::try_from(x).is_ok());
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    {
        x as i64
    }
}

/// Partition rows into contiguous ranges holding roughly `target` entries each.
#[must_use]
pub fn row_ranges(indptr: &[i64], target: usize) -> Vec<(usize, usize)> {
    let nrows = indptr.len().saturating_sub(1);
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut acc = 0usize;
    let mut r0 = 0usize;
    for i in 0..nrows {
        let row_nnz = i64_to_usize(indptr[i + 1] - indptr[i]);
        if acc == 0 {
            r0 = i;
        }
        acc += row_nnz;
        if acc >= target {
            ranges.push((r0, i + 1));
            acc = 0;
        }
    }
    if acc > 0 {
        ranges.push((r0, nrows));
    }
    ranges
}
