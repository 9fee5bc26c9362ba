#![allow(non_snake_case)]

use crate::algebra::{Adjoint, FloatT, Matrix, MatrixShape, ShapedMatrix, SparseFormatError};

/// Compressed sparse column matrix.
///
/// Column `j` holds the entries `colptr[j]..colptr[j+1]` of `rowval`
/// and `nzval`, with row indices strictly increasing.  The coupling
/// matrix `G` of a Gram-block problem is stored this way:
///
/// ```no_run
/// use blockkkt::algebra::CscMatrix;
///
/// // [ 1  0 ]
/// // [-1  2 ]
/// let G = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1., -1., 2.]);
/// assert!(G.check_format().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<T = f64> {
    /// row count
    pub m: usize,
    /// column count
    pub n: usize,
    /// column offsets into `rowval` / `nzval`, length `n + 1`
    pub colptr: Vec<usize>,
    /// row index of each stored entry
    pub rowval: Vec<usize>,
    /// stored entries
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// Builds a matrix from raw CSC arrays.
    ///
    /// # Panics
    /// Panics if the array lengths disagree with each other or with `n`.
    /// Row ordering and bounds are only checked by
    /// [`check_format`](CscMatrix::check_format).
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(colptr.len(), n + 1, "colptr must have n + 1 entries");
        assert_eq!(rowval.len(), nzval.len(), "rowval and nzval lengths differ");
        assert_eq!(colptr[n], nzval.len(), "colptr[n] must equal nnz");
        Self {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// Matrix of the given size with storage for `nnz` entries, all
    /// placed in the last column until filled.
    pub fn spalloc((m, n): (usize, usize), nnz: usize) -> Self {
        let mut colptr = vec![0; n + 1];
        colptr[n] = nnz;
        Self::new(m, n, colptr, vec![0; nnz], vec![T::zero(); nnz])
    }

    /// Matrix with no stored entries
    pub fn zeros(size: (usize, usize)) -> Self {
        Self::spalloc(size, 0)
    }

    pub fn identity(n: usize) -> Self {
        Self::new(n, n, (0..=n).collect(), (0..n).collect(), vec![T::one(); n])
    }

    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// Lazy transpose, used for `Gᵀ` products.
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    fn column_range(&self, col: usize) -> std::ops::Range<usize> {
        self.colptr[col]..self.colptr[col + 1]
    }

    /// Checks lengths, column offsets and row indices.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        let lengths_ok = self.colptr.len() == self.n + 1
            && self.rowval.len() == self.nzval.len()
            && self.colptr.last() == Some(&self.rowval.len());
        if !lengths_ok {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.colptr.windows(2).any(|w| w[1] < w[0]) {
            return Err(SparseFormatError::BadColptr);
        }

        let rows_ok = (0..self.n).all(|col| {
            let rows = &self.rowval[self.column_range(col)];
            rows.windows(2).all(|w| w[0] < w[1]) && rows.iter().all(|&r| r < self.m)
        });
        if rows_ok {
            Ok(())
        } else {
            Err(SparseFormatError::BadRowval)
        }
    }

    /// Entry at `(row, col)`, or `None` when it is not stored.
    ///
    /// # Panics
    /// Panics on an out of bounds index.
    pub fn get_entry(&self, (row, col): (usize, usize)) -> Option<T> {
        assert!(row < self.m && col < self.n, "index out of bounds");
        let range = self.column_range(col);
        let offset = range.start;
        self.rowval[range]
            .binary_search(&row)
            .ok()
            .map(|k| self.nzval[offset + k])
    }

    pub fn to_dense(&self) -> Matrix<T> {
        let mut D = Matrix::zeros((self.m, self.n));
        for col in 0..self.n {
            for k in self.column_range(col) {
                D[(self.rowval[k], col)] += self.nzval[k];
            }
        }
        D
    }
}

impl<T> From<&Matrix<T>> for CscMatrix<T>
where
    T: FloatT,
{
    /// Keeps the nonzero entries of a dense matrix.
    fn from(D: &Matrix<T>) -> Self {
        let (m, n) = D.size();
        let mut colptr = Vec::with_capacity(n + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();

        colptr.push(0);
        for col in 0..n {
            for (row, &v) in D.col_slice(col).iter().enumerate() {
                if v != T::zero() {
                    rowval.push(row);
                    nzval.push(v);
                }
            }
            colptr.push(nzval.len());
        }
        Self::new(m, n, colptr, rowval, nzval)
    }
}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banded() -> CscMatrix<f64> {
        // [ .  2  . ]
        // [ 1  .  5 ]
        // [ .  3  6 ]
        // [ .  4  . ]
        CscMatrix::new(
            4,
            3,
            vec![0, 1, 4, 6],
            vec![1, 0, 2, 3, 1, 2],
            vec![1., 2., 3., 4., 5., 6.],
        )
    }

    #[test]
    fn test_csc_get_entry() {
        let A = banded();
        assert!(A.check_format().is_ok());
        assert_eq!(A.nnz(), 6);

        assert_eq!(A.get_entry((1, 0)), Some(1.));
        assert_eq!(A.get_entry((3, 1)), Some(4.));
        assert_eq!(A.get_entry((2, 2)), Some(6.));
        assert_eq!(A.get_entry((0, 0)), None);
        assert_eq!(A.get_entry((3, 2)), None);

        let D = A.to_dense();
        assert_eq!(D[(1, 2)], 5.);
        assert_eq!(CscMatrix::from(&D), A);
    }

    #[test]
    fn test_csc_check_format() {
        let mut A = banded();
        A.rowval[3] = 4;
        assert_eq!(A.check_format(), Err(SparseFormatError::BadRowval));

        let mut A = banded();
        A.rowval.swap(1, 2);
        assert_eq!(A.check_format(), Err(SparseFormatError::BadRowval));

        let mut A = banded();
        A.colptr[1] = 5;
        assert_eq!(A.check_format(), Err(SparseFormatError::BadColptr));

        let mut A = banded();
        A.nzval.pop();
        assert_eq!(
            A.check_format(),
            Err(SparseFormatError::IncompatibleDimension)
        );

        assert!(CscMatrix::<f64>::identity(3).check_format().is_ok());
        assert_eq!(CscMatrix::<f64>::zeros((2, 3)).nnz(), 0);
    }
}
