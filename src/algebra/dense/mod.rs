#![allow(non_snake_case)]

mod cholesky;
pub use cholesky::*;
mod core;
pub use self::core::*;
mod ldl;
pub use ldl::*;
mod matrix_math;
pub(crate) use matrix_math::_scale_or_zero;
