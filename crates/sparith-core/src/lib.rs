//! Core storage formats for sparith (pure Rust)
//!
//! Every format here is a plain owned container. Arithmetic lives in
//! `sparith-kernels`; this crate only knows how to build and validate.

pub mod coo;
pub mod csc;
pub mod csr;
pub mod dense;
pub mod dia;
pub mod error;

pub use coo::Coo;
pub use csc::Csc;
pub use csr::Csr;
pub use dense::Dense;
pub use dia::Dia;
pub use error::FormatError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
