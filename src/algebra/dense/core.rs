use crate::algebra::{Adjoint, FloatT, MatrixShape, ShapedMatrix, VectorMath};
use std::ops::{Index, IndexMut};

/// Column major dense matrix.
///
/// Holds the Gram matrix `K`, the shifted blocks `K + diag(s)` and the
/// small coupling matrix of the structured solver.
///
/// ```no_run
/// use blockkkt::algebra::Matrix;
///
/// // rows are given in the usual reading order
/// let K = Matrix::from(&[[4., 1.], [1., 3.]]);
/// assert_eq!(K.data(), &[4., 1., 1., 3.]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T = f64> {
    pub m: usize,
    pub n: usize,
    /// entries, column after column
    pub data: Vec<T>,
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn set_identity(&mut self) {
        assert!(self.m == self.n);
        self.data.set(T::zero());
        for i in 0..self.n {
            self[(i, i)] = T::one();
        }
    }

    /// Build a matrix from row major data.
    ///
    /// # Panics
    /// Panics if `src` does not have `m*n` entries.
    pub fn new_from_row_major(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert!(m * n == src.len());
        let mut mat = Self::zeros(size);
        for i in 0..m {
            for j in 0..n {
                mat[(i, j)] = src[i * n + j];
            }
        }
        mat
    }

    /// Matrix entries flattened in row major order.
    pub fn to_row_major(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.m * self.n);
        for i in 0..self.m {
            for j in 0..self.n {
                out.push(self[(i, j)]);
            }
        }
        out
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// Adds `d` to the diagonal of a square matrix
    pub fn add_diag(&mut self, d: &[T]) -> &mut Self {
        assert!(self.m == self.n);
        assert_eq!(d.len(), self.n);
        for (i, &di) in d.iter().enumerate() {
            self[(i, i)] += di;
        }
        self
    }

    /// Writes `src` into the block with upper left corner at `(row, col)`
    pub fn set_block(&mut self, row: usize, col: usize, src: &Matrix<T>) -> &mut Self {
        assert!(row + src.m <= self.m && col + src.n <= self.n);
        for j in 0..src.n {
            for i in 0..src.m {
                self[(row + i, col + j)] = src[(i, j)];
            }
        }
        self
    }

    /// True if the matrix is square and each pair of reflected entries
    /// agree to within `tol` times the largest entry magnitude (or
    /// within `tol` absolutely for matrices with entries smaller than 1)
    pub fn is_symmetric(&self, tol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        let scale = T::max(T::one(), self.data.norm_inf());
        for c in 0..self.n {
            for r in (c + 1)..self.m {
                let (a, b) = (self[(r, c)], self[(c, r)]);
                if !(T::abs(a - b) <= tol * scale) {
                    return false;
                }
            }
        }
        true
    }

    pub fn is_finite(&self) -> bool {
        self.data.is_finite()
    }
}

impl<T, const R: usize, const C: usize> From<&[[T; C]; R]> for Matrix<T>
where
    T: FloatT,
{
    /// Build a matrix from an array of rows
    fn from(rows: &[[T; C]; R]) -> Matrix<T> {
        let mut mat = Matrix::zeros((R, C));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                mat[(i, j)] = v;
            }
        }
        mat
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    #[inline]
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data[idx.0 + self.m * idx.1]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        &mut self.data[idx.0 + self.m * idx.1]
    }
}

impl<T> Index<(usize, usize)> for Adjoint<'_, Matrix<T>> {
    type Output = T;
    #[inline]
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.src[(idx.1, idx.0)]
    }
}

impl<T> ShapedMatrix for Matrix<T> {
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

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f)?;
        for i in 0..self.m {
            write!(f, "[ ")?;
            for j in 0..self.n {
                write!(f, " {:?}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        writeln!(f)?;
        Ok(())
    }
}
