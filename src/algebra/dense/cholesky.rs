#![allow(non_snake_case)]

use crate::algebra::{
    DenseFactorizationError, FactoredSolve, FloatT, Matrix, ShapedMatrix, VectorMath,
};

/// Dense Cholesky factorization `A = LLᵀ` of a symmetric positive
/// definite matrix.
#[derive(Debug, Clone)]
pub struct CholeskyEngine<T> {
    /// lower triangular factor (stored as square dense)
    pub L: Matrix<T>,
}

impl<T> CholeskyEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        let L = Matrix::<T>::zeros((n, n));
        Self { L }
    }

    pub fn dim(&self) -> usize {
        self.L.nrows()
    }

    /// Factor `A`, referencing only its lower triangle.
    ///
    /// Pivot `j` is rejected unless it exceeds `pivot_tol` times the
    /// magnitude of `A[j, j]`, i.e. unless elimination has left it
    /// enough significant digits.  NaN pivots are always rejected.
    pub fn factor(&mut self, A: &Matrix<T>, pivot_tol: T) -> Result<(), DenseFactorizationError> {
        if A.size() != self.L.size() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        let n = self.L.nrows();
        let L = &mut self.L;
        L.data_mut().set(T::zero());

        for j in 0..n {
            let mut pivot = A[(j, j)];
            for k in 0..j {
                pivot -= L[(j, k)] * L[(j, k)];
            }
            if !(pivot > pivot_tol * T::abs(A[(j, j)])) || !pivot.is_finite() {
                return Err(DenseFactorizationError::Cholesky(j));
            }
            let Ljj = T::sqrt(pivot);
            L[(j, j)] = Ljj;

            for i in (j + 1)..n {
                let mut v = A[(i, j)];
                for k in 0..j {
                    v -= L[(i, k)] * L[(j, k)];
                }
                L[(i, j)] = v / Ljj;
            }
        }

        Ok(())
    }

    /// Writes `A⁻¹` into `out`, one column at a time.
    pub fn inverse(&self, out: &mut Matrix<T>) {
        assert_eq!(out.size(), self.L.size());
        out.set_identity();
        for j in 0..out.ncols() {
            self.solve(out.col_slice_mut(j));
        }
    }

    pub fn logdet(&self) -> T {
        let mut ld = T::zero();
        for i in 0..self.L.nrows() {
            ld += T::ln(self.L[(i, i)]);
        }
        ld + ld
    }
}

impl<T> FactoredSolve for CholeskyEngine<T>
where
    T: FloatT,
{
    type T = T;

    fn solve(&self, b: &mut [T]) {
        let L = &self.L;
        let n = L.nrows();
        assert_eq!(b.len(), n);

        // L y = b
        for j in 0..n {
            let yj = b[j] / L[(j, j)];
            b[j] = yj;
            for (bi, &Lij) in b[(j + 1)..].iter_mut().zip(&L.col_slice(j)[(j + 1)..]) {
                *bi -= Lij * yj;
            }
        }

        // Lᵀ x = y
        for j in (0..n).rev() {
            let dot = L.col_slice(j)[(j + 1)..].dot(&b[(j + 1)..]);
            b[j] = (b[j] - dot) / L[(j, j)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::MatrixVectorMultiply;

    #[test]
    fn test_cholesky() {
        #[rustfmt::skip]
        let S = Matrix::from(
            &[[ 8., -2., 4.],
              [-2., 12., 2.],
              [ 4.,  2., 6.]]);

        let mut eng = CholeskyEngine::<f64>::new(3);
        assert!(eng.factor(&S, 1e-14).is_ok());

        // L is lower triangular and LLᵀ = S
        let L = &eng.L;
        let mut M = Matrix::<f64>::zeros((3, 3));
        for j in 0..3 {
            assert!(L.col_slice(j)[..j].iter().all(|&v| v == 0.));
            for i in 0..3 {
                M[(i, j)] = (0..3).map(|k| L[(i, k)] * L[(j, k)]).sum();
            }
        }
        assert!(M.data().norm_inf_diff(S.data()) < 1e-12);

        // solve against a known solution
        let x = vec![1., 2., 3.];
        let mut b = vec![0.; 3];
        S.gemv(&mut b, &x, 1., 0.);
        eng.solve(&mut b);
        assert!(b.norm_inf_diff(&x) < 1e-12);

        assert!((eng.logdet() - f64::ln(296.)).abs() < 1e-12);
    }

    #[test]
    fn test_cholesky_inverse() {
        #[rustfmt::skip]
        let S = Matrix::from(
            &[[4., 1.],
              [1., 3.]]);

        let mut eng = CholeskyEngine::<f64>::new(2);
        eng.factor(&S, 1e-14).unwrap();
        let mut Sinv = Matrix::zeros((2, 2));
        eng.inverse(&mut Sinv);

        #[rustfmt::skip]
        let expected = Matrix::from(
            &[[ 3. / 11., -1. / 11.],
              [-1. / 11.,  4. / 11.]]);
        assert!(Sinv.data().norm_inf_diff(expected.data()) < 1e-14);
    }

    #[test]
    fn test_cholesky_indefinite() {
        #[rustfmt::skip]
        let S = Matrix::from(
            &[[1., 2.],
              [2., 1.]]);

        let mut eng = CholeskyEngine::<f64>::new(2);
        assert_eq!(eng.factor(&S, 1e-14), Err(DenseFactorizationError::Cholesky(1)));

        let Z = Matrix::<f64>::zeros((2, 2));
        assert_eq!(eng.factor(&Z, 1e-14), Err(DenseFactorizationError::Cholesky(0)));

        let mut N = Matrix::<f64>::identity(2);
        N[(1, 1)] = f64::NAN;
        assert_eq!(eng.factor(&N, 1e-14), Err(DenseFactorizationError::Cholesky(1)));

        // a tiny but well separated diagonal entry is accepted
        #[rustfmt::skip]
        let D = Matrix::from(
            &[[1e16, 0.   ],
              [0.,   1e-16]]);
        assert!(eng.factor(&D, 1e-14).is_ok());

        let W = Matrix::<f64>::identity(3);
        assert_eq!(eng.factor(&W, 1e-14), Err(DenseFactorizationError::IncompatibleDimension));
    }
}
