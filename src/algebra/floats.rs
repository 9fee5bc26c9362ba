#![allow(non_snake_case)]
use num_traits::{Float, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Scalar type of every matrix, vector and factorization in the crate.
///
/// Blanket implemented for anything meeting the bounds, so `f32` and
/// `f64` both qualify.  `LowerExp` is needed for the `{:e}` formatting
/// of the verbose factorization summaries.
pub trait FloatT:
    'static + Send + Sync + Float + NumAssign + Default + FromPrimitive + Display + LowerExp + Debug
{
}

impl<T> FloatT for T where
    T: 'static
        + Send
        + Sync
        + Float
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
{
}

/// Conversion of primitive constants into a [`FloatT`], so that
/// code can write `(2.0).as_T()`.  Also used by the
/// [settings](crate::solver::KKTSettings) builder defaults.
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $from:ident) => {
        impl<T: FromPrimitive> AsFloatT<T> for $ty {
            #[inline]
            fn as_T(&self) -> T {
                // every FloatT represents these primitives, possibly rounded
                T::$from(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
