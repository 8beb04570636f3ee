//! Destination allocation with aliasing protection.
//!
//! When an operand is the destination itself ([`MatRef::Dst`]), writing the
//! result row by row would clobber rows still to be read. The resolver then
//! hands the kernel a pooled temporary and copies it into the destination
//! once the kernel has finished.

use crate::config::ArithConfig;
use crate::error::{ArithError, Result};
use crate::operand::{MatRef, Operand};
use crate::pool::WorkspacePool;
use sparith_core::Csr;
use tracing::debug;

/// Pooled stand-in for a destination that aliases an operand.
///
/// [`finish`](Self::finish) copies the result back and returns the temporary
/// to the pool. Dropping an unfinished guard (e.g. while unwinding) releases
/// the temporary and leaves the destination as it was.
pub struct TempWorkspace<'d, 'p> {
    dst: &'d mut Csr<f64, i64>,
    work: Csr<f64, i64>,
    pool: &'p WorkspacePool,
    done: bool,
}

impl<'d, 'p> TempWorkspace<'d, 'p> {
    /// Takes a `rows x cols` workspace from `pool` standing in for `dst`.
    pub fn new(
        dst: &'d mut Csr<f64, i64>,
        rows: usize,
        cols: usize,
        nnz: usize,
        clear: bool,
        pool: &'p WorkspacePool,
    ) -> Self {
        let work = pool.acquire(rows, cols, nnz, clear);
        Self {
            dst,
            work,
            pool,
            done: false,
        }
    }

    /// The untouched destination (readable as an operand) and the workspace
    /// the kernel writes into.
    pub fn split(&mut self) -> (&Csr<f64, i64>, &mut Csr<f64, i64>) {
        (&*self.dst, &mut self.work)
    }

    /// Copies the workspace into the destination and releases it.
    pub fn finish(mut self) {
        let work = std::mem::take(&mut self.work);
        self.dst.clone_from_csr(&work);
        self.pool.release(work);
        self.done = true;
    }
}

impl Drop for TempWorkspace<'_, '_> {
    fn drop(&mut self) {
        if !self.done {
            self.pool.release(std::mem::take(&mut self.work));
        }
    }
}

/// Working target chosen by [`spalloc`].
pub enum Alloc<'d, 'p> {
    /// No aliasing: the destination was resized in place.
    Direct(&'d mut Csr<f64, i64>),
    /// The destination is an operand: write into the temporary instead.
    Temp(TempWorkspace<'d, 'p>),
}

impl Alloc<'_, '_> {
    #[must_use]
    pub const fn is_temp(&self) -> bool {
        matches!(self, Self::Temp(_))
    }
}

/// Prepares storage for a `rows x cols` result.
///
/// The capacity hint is the sum of the operands' stored entries when both
/// report one, otherwise the configured density guess.
///
/// # Errors
/// [`ArithError::DestinationShape`] when the destination aliases an operand,
/// is already sized, and that size differs from the result's. Nothing is
/// modified in that case.
pub fn spalloc<'d, 'p>(
    dst: &'d mut Csr<f64, i64>,
    a: MatRef<'_>,
    b: MatRef<'_>,
    rows: usize,
    cols: usize,
    pool: &'p WorkspacePool,
    config: &ArithConfig,
) -> Result<Alloc<'d, 'p>> {
    let nnz_of = |m: MatRef<'_>| match m {
        MatRef::Dst => Some(dst.nnz()),
        other => other.detached().nnz(),
    };
    let nnz = nnz_of(a).zip(nnz_of(b));
    let hint = config.capacity_hint(rows, cols, nnz);

    if a.is_dst() || b.is_dst() {
        if !dst.is_empty() && dst.shape() != (rows, cols) {
            return Err(ArithError::DestinationShape {
                expected: (rows, cols),
                got: dst.shape(),
            });
        }
        debug!(rows, cols, hint, "destination aliases an operand, using pooled workspace");
        return Ok(Alloc::Temp(TempWorkspace::new(dst, rows, cols, hint, true, pool)));
    }
    dst.reuse_as(rows, cols, hint, true);
    Ok(Alloc::Direct(dst))
}

/// Runs `kernel` against the target chosen by [`spalloc`], binding any
/// [`MatRef::Dst`] operand to the pre-call destination, and copies back
/// afterwards when a temporary was used.
///
/// # Errors
/// See [`spalloc`].
#[allow(clippy::too_many_arguments)]
pub fn compute_into(
    dst: &mut Csr<f64, i64>,
    a: MatRef<'_>,
    b: MatRef<'_>,
    rows: usize,
    cols: usize,
    pool: &WorkspacePool,
    config: &ArithConfig,
    kernel: impl FnOnce(&mut Csr<f64, i64>, Operand<'_>, Operand<'_>),
) -> Result<()> {
    match spalloc(dst, a, b, rows, cols, pool, config)? {
        Alloc::Direct(c) => kernel(c, a.detached(), b.detached()),
        Alloc::Temp(mut temp) => {
            let (this, work) = temp.split();
            kernel(work, a.bind(this), b.bind(this));
            temp.finish();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparith_core::Dense;

    fn eye2() -> Csr<f64, i64> {
        Csr::from_parts(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 1.0], true).unwrap()
    }

    #[test]
    fn no_overlap_resizes_in_place() {
        let pool = WorkspacePool::new(2);
        let a = eye2();
        let mut dst = Csr::from_parts(1, 1, vec![0, 1], vec![0], vec![9.0], true).unwrap();
        let alloc =
            spalloc(&mut dst, (&a).into(), (&a).into(), 2, 2, &pool, &ArithConfig::default())
                .unwrap();
        assert!(!alloc.is_temp());
        drop(alloc);
        assert_eq!(dst.shape(), (2, 2));
        assert_eq!(dst.nnz(), 0);
        assert!(dst.indices.capacity() >= 4);
    }

    #[test]
    fn overlap_uses_temporary_and_copies_back() {
        let pool = WorkspacePool::new(2);
        let b = eye2();
        let mut dst = eye2();
        {
            let alloc =
                spalloc(&mut dst, MatRef::Dst, (&b).into(), 2, 2, &pool, &ArithConfig::default())
                    .unwrap();
            let Alloc::Temp(mut temp) = alloc else {
                panic!("expected a temporary workspace");
            };
            {
                let (this, work) = temp.split();
                // the destination is still readable while the workspace is filled
                assert_eq!(this.get(1, 1), 1.0);
                work.indices.push(1);
                work.data.push(4.0);
                work.seal_row(0);
                work.seal_row(1);
            }
            temp.finish();
        }
        assert_eq!(dst.indptr, vec![0, 1, 1]);
        assert_eq!(dst.get(0, 1), 4.0);
        assert_eq!(pool.pooled_matrices(), 1);
    }

    #[test]
    fn unfinished_temporary_leaves_destination_alone() {
        let pool = WorkspacePool::new(2);
        let mut dst = eye2();
        {
            let alloc =
                spalloc(&mut dst, MatRef::Dst, MatRef::Dst, 2, 2, &pool, &ArithConfig::default())
                    .unwrap();
            let Alloc::Temp(mut temp) = alloc else {
                panic!("expected a temporary workspace");
            };
            temp.split().1.data.push(3.0);
        }
        assert_eq!(dst, eye2());
        assert_eq!(pool.pooled_matrices(), 1);
    }

    #[test]
    fn overlap_with_wrong_shape_is_rejected() {
        let pool = WorkspacePool::new(2);
        let dense = Dense::zeros(2, 3);
        let mut dst = eye2();
        let err = spalloc(
            &mut dst,
            MatRef::Dst,
            (&dense).into(),
            2,
            3,
            &pool,
            &ArithConfig::default(),
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            ArithError::DestinationShape {
                expected: (2, 3),
                got: (2, 2)
            }
        );
        assert_eq!(dst, eye2());
    }

    #[test]
    fn hint_falls_back_to_density_guess() {
        let pool = WorkspacePool::new(2);
        let dense = Dense::zeros(10, 10);
        let mut dst = Csr::default();
        let cfg = ArithConfig::default();
        let _ = spalloc(&mut dst, (&dense).into(), (&dense).into(), 10, 10, &pool, &cfg).unwrap();
        assert!(dst.data.capacity() >= 10);
    }
}
