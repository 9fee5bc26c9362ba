//! Linear algebra used by the KKT solvers.
//!
//! Dense column major matrices with native Cholesky and LDLᵀ
//! factorizations, compressed sparse column matrices with block
//! concatenation, and elementwise math on slices.  Everything is
//! generic over [`FloatT`].

mod csc;
mod dense;
mod error_types;
mod floats;
mod math_traits;
mod matrix_types;
mod vecmath;

pub use csc::*;
pub use dense::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
pub use matrix_types::*;
