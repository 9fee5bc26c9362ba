use super::FloatT;

/// Elementwise and reduction operations on slices of
/// [`FloatT`](crate::algebra::FloatT).  Mutating methods return
/// `&mut Self` so that calls can be chained.
pub trait VectorMath {
    type T;

    /// `self = src`
    fn copy_from(&mut self, src: &Self) -> &mut Self;

    /// `self[i] = op(self[i])`
    fn scalarop(&mut self, op: impl Fn(Self::T) -> Self::T) -> &mut Self;

    /// `self[i] = c`
    fn set(&mut self, c: Self::T) -> &mut Self;

    /// `self[i] = c * self[i]`
    fn scale(&mut self, c: Self::T) -> &mut Self;

    /// `self[i] = 1 / self[i]`
    fn recip(&mut self) -> &mut Self;

    /// `self[i] = -self[i]`
    fn negate(&mut self) -> &mut Self;

    /// `self[i] = self[i] * y[i]`
    fn hadamard(&mut self, y: &Self) -> &mut Self;

    fn dot(&self, y: &Self) -> Self::T;

    /// Euclidean distance `‖self - y‖`
    fn dist(&self, y: &Self) -> Self::T;

    fn norm(&self) -> Self::T;

    /// Infinity norm, or NaN if any entry is NaN
    fn norm_inf(&self) -> Self::T;

    /// `‖self - y‖∞`
    fn norm_inf_diff(&self, y: &Self) -> Self::T;

    /// True if no entry is infinite or NaN
    fn is_finite(&self) -> bool;

    /// `self = a*x + b*self`
    fn axpby(&mut self, a: Self::T, x: &Self, b: Self::T) -> &mut Self;

    /// `self = a*x + b*y`
    fn waxpby(&mut self, a: Self::T, x: &Self, b: Self::T, y: &Self) -> &mut Self;
}

/// Matrix-vector products
pub trait MatrixVectorMultiply {
    type T: FloatT;

    /// `y = a*self*x + b*y`
    fn gemv(&self, y: &mut [Self::T], x: &[Self::T], a: Self::T, b: Self::T);
}

/// Operations on a factored matrix.
pub trait FactoredSolve {
    type T: FloatT;

    /// Solve `A x = b` in place, with `b` replaced by `x`.
    fn solve(&self, b: &mut [Self::T]);
}
