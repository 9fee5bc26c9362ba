#![allow(non_snake_case)]

use crate::algebra::{DenseFactorizationError, FactoredSolve, FloatT, Matrix, ShapedMatrix};

/// Dense `LDLᵀ` factorization of a symmetric quasidefinite matrix,
/// computed without pivoting.
///
/// The sign of each pivot is checked against a caller supplied
/// vector of expected signs, so a factorization that succeeds is
/// guaranteed to have the inertia the caller asked for.
#[derive(Debug, Clone)]
pub struct LDLEngine<T> {
    /// unit lower triangular factor
    pub L: Matrix<T>,
    /// diagonal factor
    pub D: Vec<T>,
}

impl<T> LDLEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        Self {
            L: Matrix::identity(n),
            D: vec![T::zero(); n],
        }
    }

    pub fn dim(&self) -> usize {
        self.D.len()
    }

    /// Factor `A`, referencing only its lower triangle.  `dsigns[j]`
    /// is the expected sign (+1 or -1) of the `j`th pivot.
    ///
    /// Pivot `j` is rejected unless its signed value exceeds `pivot_tol`
    /// times the sum of the magnitudes of the terms it is computed from,
    /// so the test is invariant to a symmetric diagonal scaling of `A`.
    pub fn factor(
        &mut self,
        A: &Matrix<T>,
        dsigns: &[i8],
        pivot_tol: T,
    ) -> Result<(), DenseFactorizationError> {
        let n = self.dim();
        if A.size() != (n, n) || dsigns.len() != n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        self.L.set_identity();
        let (L, D) = (&mut self.L, &mut self.D);

        for j in 0..n {
            // `scale` bounds the magnitude of the terms cancelling in dj
            let mut dj = A[(j, j)];
            let mut scale = T::abs(dj);
            for k in 0..j {
                let term = L[(j, k)] * L[(j, k)] * D[k];
                dj -= term;
                scale += T::abs(term);
            }
            let signed = if dsigns[j] < 0 { -dj } else { dj };
            if !(signed > pivot_tol * scale) || !dj.is_finite() {
                return Err(DenseFactorizationError::LDL(j));
            }
            D[j] = dj;

            for i in (j + 1)..n {
                let mut v = A[(i, j)];
                for k in 0..j {
                    v -= L[(i, k)] * L[(j, k)] * D[k];
                }
                L[(i, j)] = v / dj;
            }
        }
        Ok(())
    }
}

impl<T> FactoredSolve for LDLEngine<T>
where
    T: FloatT,
{
    type T = T;

    fn solve(&self, b: &mut [T]) {
        let (L, D) = (&self.L, &self.D);
        let n = D.len();
        assert_eq!(b.len(), n);

        for j in 0..n {
            let bj = b[j];
            for (bi, &Lij) in b[(j + 1)..].iter_mut().zip(&L.col_slice(j)[(j + 1)..]) {
                *bi -= Lij * bj;
            }
        }
        for (bi, &di) in b.iter_mut().zip(D.iter()) {
            *bi /= di;
        }
        for j in (0..n).rev() {
            let mut v = b[j];
            for (&bi, &Lij) in b[(j + 1)..].iter().zip(&L.col_slice(j)[(j + 1)..]) {
                v -= Lij * bi;
            }
            b[j] = v;
        }
    }
}
