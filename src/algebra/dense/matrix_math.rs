#![allow(non_snake_case)]
use crate::algebra::{Adjoint, FloatT, Matrix, MatrixVectorMultiply, VectorMath};

impl<T: FloatT> MatrixVectorMultiply for Matrix<T> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);

        _scale_or_zero(y, b);
        if a == T::zero() {
            return;
        }

        // column oriented since storage is column major
        for (j, &xj) in x.iter().enumerate() {
            let axj = a * xj;
            for (yi, &Aij) in y.iter_mut().zip(self.col_slice(j)) {
                *yi += Aij * axj;
            }
        }
    }
}

impl<T: FloatT> MatrixVectorMultiply for Adjoint<'_, Matrix<T>> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let A = self.src;
        assert_eq!(x.len(), A.m);
        assert_eq!(y.len(), A.n);

        _scale_or_zero(y, b);
        if a == T::zero() {
            return;
        }

        for (j, yj) in y.iter_mut().enumerate() {
            *yj += a * A.col_slice(j).dot(x);
        }
    }
}

// y = b*y, but with b == 0 treated as an overwrite so that
// uninitialized (e.g. NaN) values in y are discarded
pub(crate) fn _scale_or_zero<T: FloatT>(y: &mut [T], b: T) {
    if b == T::zero() {
        y.fill(T::zero());
    } else if b != T::one() {
        y.scale(b);
    }
}

#[test]
fn test_dense_gemv() {
    #[rustfmt::skip]
    let A = Matrix::from(
        &[[1., 2., 3.],
          [4., 5., 6.]]);

    let x = vec![1., 1., 1.];
    let mut y = vec![1., 1.];
    A.gemv(&mut y, &x, 2., -1.);
    assert_eq!(y, vec![11., 29.]);

    let x = vec![1., -1.];
    let mut y = vec![1., 0., 0.];
    A.t().gemv(&mut y, &x, 1., 1.);
    assert_eq!(y, vec![-2., -3., -3.]);
}
