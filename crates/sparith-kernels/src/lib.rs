//! Row-wise sparse arithmetic for sparith (pure Rust, SIMD/parallel where it pays)
//!
//! `multiply`, `add` and `subtract` write into a CSR destination that may also
//! appear as an operand ([`MatRef::Dst`]); `mat_vec` accumulates `A @ x`.

pub mod alias;
pub mod config;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod kernels;
pub mod matvec;
pub mod operand;
pub mod pool;
pub mod spa;
pub mod util;

#[cfg(test)]
mod proptests;

pub use alias::{compute_into, spalloc, Alloc, TempWorkspace};
pub use config::ArithConfig;
pub use convert::{coo_to_csr_f64_i64, csc_to_csr_f64_i64, transpose_csr};
pub use dispatch::{add, multiply, subtract, Arith};
pub use error::{ArithError, Result};
pub use matvec::{mat_vec, mat_vec_with};
pub use operand::{MatRef, Matrix, Operand, RawDense, Transposed};
pub use pool::WorkspacePool;
pub use spa::Spa;
