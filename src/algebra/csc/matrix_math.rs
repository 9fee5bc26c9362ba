#![allow(non_snake_case)]

use crate::algebra::dense::_scale_or_zero;
use crate::algebra::{Adjoint, CscMatrix, FloatT, MatrixVectorMultiply};

impl<T: FloatT> MatrixVectorMultiply for CscMatrix<T> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_N(self, y, x, a, b);
    }
}

impl<T: FloatT> MatrixVectorMultiply for Adjoint<'_, CscMatrix<T>> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_T(self.src, y, x, a, b);
    }
}

// sparse matrix-vector multiply, no transpose
fn _csc_axpby_N<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    assert_eq!(x.len(), A.n);
    assert_eq!(y.len(), A.m);

    _scale_or_zero(y, b);
    if a == T::zero() {
        return;
    }

    //y += a*A*x
    for (j, &xj) in x.iter().enumerate() {
        let axj = a * xj;
        for i in A.colptr[j]..A.colptr[j + 1] {
            y[A.rowval[i]] += A.nzval[i] * axj;
        }
    }
}

// sparse matrix-vector multiply, transposed
fn _csc_axpby_T<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    assert_eq!(x.len(), A.m);
    assert_eq!(y.len(), A.n);

    _scale_or_zero(y, b);
    if a == T::zero() {
        return;
    }

    //y += a*A'*x
    for (j, yj) in y.iter_mut().enumerate() {
        let mut acc = T::zero();
        for i in A.colptr[j]..A.colptr[j + 1] {
            acc += A.nzval[i] * x[A.rowval[i]];
        }
        *yj += a * acc;
    }
}

#[test]
fn test_csc_gemv() {
    use crate::algebra::Matrix;

    #[rustfmt::skip]
    let D = Matrix::from(
        &[[1., 0., 3.],
          [0., 5., 0.]]);
    let A = CscMatrix::from(&D);

    let x = vec![1., 2., 3.];
    let mut y = vec![f64::NAN, 1.];
    A.gemv(&mut y, &x, 1., 0.);
    assert_eq!(y, vec![10., 10.]);

    let mut y = vec![1., 1.];
    A.gemv(&mut y, &x, -1., 2.);
    assert_eq!(y, vec![-8., -8.]);

    let x = vec![1., -1.];
    let mut y = vec![0., 0., 1.];
    A.t().gemv(&mut y, &x, 2., 1.);
    assert_eq!(y, vec![2., -10., 7.]);
}
