//! Public arithmetic entry points: `multiply`, `add`, `subtract`.
//!
//! Each call validates shapes, lets the aliasing resolver pick the working
//! target, selects a kernel from the operand kinds and capabilities, and
//! copies back when a temporary was used.

use crate::alias::compute_into;
use crate::config::ArithConfig;
use crate::error::{ArithError, Result};
use crate::kernels::{
    add_csr_csr, add_csr_mat, add_mat_mat, mul_csr_csr, mul_csr_mat, mul_dia_csr, mul_dia_mat,
    mul_mat_csr, mul_mat_mat,
};
use crate::matvec::mat_vec_with;
use crate::operand::{MatRef, Matrix, Operand};
use crate::pool::WorkspacePool;
use sparith_core::Csr;
use tracing::trace;

/// Shape of an operand, reading the destination for [`MatRef::Dst`].
fn dims_of(m: MatRef<'_>, dst: &Csr<f64, i64>) -> (usize, usize) {
    match m {
        MatRef::Dst => dst.shape(),
        other => other.detached().dims(),
    }
}

/// Arithmetic bound to a workspace pool and a configuration.
#[derive(Debug, Clone, Copy)]
pub struct Arith<'p> {
    pool: &'p WorkspacePool,
    config: ArithConfig,
}

impl Default for Arith<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Arith<'static> {
    /// Process-wide pool, default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_pool(WorkspacePool::global(), ArithConfig::default())
    }
}

impl<'p> Arith<'p> {
    #[must_use]
    pub const fn with_pool(pool: &'p WorkspacePool, config: ArithConfig) -> Self {
        Self { pool, config }
    }

    #[must_use]
    pub const fn config(&self) -> &ArithConfig {
        &self.config
    }

    #[must_use]
    pub const fn pool(&self) -> &'p WorkspacePool {
        self.pool
    }

    /// `dst = a @ b`.
    ///
    /// CSR @ CSR runs Gustavson's algorithm; diagonal operands scale rows or
    /// columns; operands convertible to CSR are converted first; anything else
    /// takes the dense fallback.
    ///
    /// # Errors
    /// [`ArithError::ShapeMismatch`] if `a.cols != b.rows`, and
    /// [`ArithError::DestinationShape`] if `dst` is an operand with an
    /// incompatible non-empty shape. `dst` is untouched on error.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(lhs = tracing::field::Empty, rhs = tracing::field::Empty)
    )]
    pub fn multiply(&self, dst: &mut Csr<f64, i64>, a: MatRef<'_>, b: MatRef<'_>) -> Result<()> {
        let (ar, ac) = dims_of(a, dst);
        let (br, bc) = dims_of(b, dst);
        let span = tracing::Span::current();
        span.record("lhs", tracing::field::debug((ar, ac)));
        span.record("rhs", tracing::field::debug((br, bc)));
        if ac != br {
            return Err(ArithError::ShapeMismatch {
                op: "multiply",
                lhs: (ar, ac),
                rhs: (br, bc),
            });
        }
        compute_into(dst, a, b, ar, bc, self.pool, &self.config, |c, a, b| {
            self.mul_kernel(c, a, b);
        })
    }

    fn mul_kernel(&self, c: &mut Csr<f64, i64>, a: Operand<'_>, b: Operand<'_>) {
        match (a, b) {
            (Operand::Csr(l), Operand::Csr(r)) => {
                trace!("csr @ csr");
                mul_csr_csr(c, l, r);
            }
            (Operand::Dia(d), Operand::Csr(r)) => {
                trace!("dia @ csr");
                mul_dia_csr(c, d, r, false);
            }
            (Operand::Dia(d), other) => {
                trace!("dia @ dense");
                mul_dia_mat(c, d, other.as_matrix(), false, self.pool);
            }
            (Operand::Csr(l), Operand::Dia(d)) => {
                trace!("csr @ dia");
                mul_dia_csr(c, d, l, true);
            }
            (other, Operand::Dia(d)) => {
                trace!("dense @ dia");
                mul_dia_mat(c, d, other.as_matrix(), true, self.pool);
            }
            (Operand::Csr(l), Operand::Other(r)) => match r.to_csr() {
                Some(rc) => {
                    trace!("csr @ converted csr");
                    mul_csr_csr(c, l, &rc);
                }
                None => {
                    trace!("csr @ dense");
                    mul_csr_mat(c, l, r);
                }
            },
            (Operand::Other(l), Operand::Csr(r)) => match l.to_csr() {
                Some(lc) => {
                    trace!("converted csr @ csr");
                    mul_csr_csr(c, &lc, r);
                }
                None => {
                    trace!("dense @ csr");
                    mul_mat_csr(c, l, r, self.pool);
                }
            },
            (Operand::Other(l), Operand::Other(r)) => self.mul_other(c, l, r),
        }
    }

    fn mul_other(&self, c: &mut Csr<f64, i64>, l: &dyn Matrix, r: &dyn Matrix) {
        if let Some(lc) = l.to_csr() {
            match r.to_csr() {
                Some(rc) => {
                    trace!("converted csr @ converted csr");
                    mul_csr_csr(c, &lc, &rc);
                }
                None => {
                    trace!("converted csr @ dense");
                    mul_csr_mat(c, &lc, r);
                }
            }
        } else if let Some(rc) = r.to_csr() {
            trace!("dense @ converted csr");
            mul_mat_csr(c, l, &rc, self.pool);
        } else {
            trace!("dense @ dense");
            mul_mat_mat(c, l, r, self.pool);
        }
    }

    /// `dst = a + b`.
    ///
    /// # Errors
    /// [`ArithError::ShapeMismatch`] if the shapes differ; see also
    /// [`multiply`](Self::multiply).
    pub fn add(&self, dst: &mut Csr<f64, i64>, a: MatRef<'_>, b: MatRef<'_>) -> Result<()> {
        self.combine(dst, a, b, 1.0, 1.0, "add")
    }

    /// `dst = a - b`.
    ///
    /// # Errors
    /// [`ArithError::ShapeMismatch`] if the shapes differ; see also
    /// [`multiply`](Self::multiply).
    pub fn subtract(&self, dst: &mut Csr<f64, i64>, a: MatRef<'_>, b: MatRef<'_>) -> Result<()> {
        self.combine(dst, a, b, 1.0, -1.0, "subtract")
    }

    /// `dst = alpha * a + beta * b`.
    ///
    /// # Errors
    /// [`ArithError::ShapeMismatch`] if the shapes differ; see also
    /// [`multiply`](Self::multiply).
    pub fn add_scaled(
        &self,
        dst: &mut Csr<f64, i64>,
        a: MatRef<'_>,
        b: MatRef<'_>,
        alpha: f64,
        beta: f64,
    ) -> Result<()> {
        self.combine(dst, a, b, alpha, beta, "add_scaled")
    }

    #[tracing::instrument(level = "debug", skip(self, dst, a, b))]
    fn combine(
        &self,
        dst: &mut Csr<f64, i64>,
        a: MatRef<'_>,
        b: MatRef<'_>,
        alpha: f64,
        beta: f64,
        op: &'static str,
    ) -> Result<()> {
        let (ar, ac) = dims_of(a, dst);
        let (br, bc) = dims_of(b, dst);
        if (ar, ac) != (br, bc) {
            return Err(ArithError::ShapeMismatch {
                op,
                lhs: (ar, ac),
                rhs: (br, bc),
            });
        }
        compute_into(dst, a, b, ar, ac, self.pool, &self.config, |c, a, b| {
            Self::add_kernel(c, a, b, alpha, beta);
        })
    }

    fn add_kernel(c: &mut Csr<f64, i64>, a: Operand<'_>, b: Operand<'_>, alpha: f64, beta: f64) {
        match (a, b) {
            (Operand::Csr(l), Operand::Csr(r)) => {
                trace!("csr + csr");
                add_csr_csr(c, l, r, alpha, beta);
            }
            (Operand::Csr(l), other) => Self::add_csr_other(c, l, other.as_matrix(), alpha, beta),
            (other, Operand::Csr(r)) => Self::add_csr_other(c, r, other.as_matrix(), beta, alpha),
            (l, r) => {
                let (l, r) = (l.as_matrix(), r.as_matrix());
                if let Some(lc) = l.to_csr() {
                    Self::add_csr_other(c, &lc, r, alpha, beta);
                } else if let Some(rc) = r.to_csr() {
                    Self::add_csr_other(c, &rc, l, beta, alpha);
                } else {
                    trace!("dense + dense");
                    add_mat_mat(c, l, r, alpha, beta);
                }
            }
        }
    }

    /// `alpha * csr + beta * other`, converting `other` when it can be.
    fn add_csr_other(
        c: &mut Csr<f64, i64>,
        csr: &Csr<f64, i64>,
        other: &dyn Matrix,
        alpha: f64,
        beta: f64,
    ) {
        match other.to_csr() {
            Some(oc) => {
                trace!("csr + converted csr");
                add_csr_csr(c, csr, &oc, alpha, beta);
            }
            None => {
                trace!("csr + dense");
                add_csr_mat(c, csr, other, alpha, beta);
            }
        }
    }

    /// `out += a @ x`; see [`mat_vec`](crate::mat_vec).
    ///
    /// # Errors
    /// [`ArithError::VectorLength`] on a length mismatch.
    pub fn mat_vec(&self, a: &Csr<f64, i64>, x: &[f64], out: &mut [f64]) -> Result<()> {
        mat_vec_with(a, x, out, &self.config)
    }
}

/// `dst = a @ b` using the process-wide pool.
///
/// # Errors
/// See [`Arith::multiply`].
pub fn multiply(dst: &mut Csr<f64, i64>, a: MatRef<'_>, b: MatRef<'_>) -> Result<()> {
    Arith::new().multiply(dst, a, b)
}

/// `dst = a + b` using the process-wide pool.
///
/// # Errors
/// See [`Arith::add`].
pub fn add(dst: &mut Csr<f64, i64>, a: MatRef<'_>, b: MatRef<'_>) -> Result<()> {
    Arith::new().add(dst, a, b)
}

/// `dst = a - b` using the process-wide pool.
///
/// # Errors
/// See [`Arith::subtract`].
pub fn subtract(dst: &mut Csr<f64, i64>, a: MatRef<'_>, b: MatRef<'_>) -> Result<()> {
    Arith::new().subtract(dst, a, b)
}
