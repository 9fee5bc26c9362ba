use thiserror::Error;

/// Failure of [`BlockConcatenate`](crate::algebra::BlockConcatenate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixConcatenationError {
    /// Blocks do not line up along a block row or column, or no
    /// blocks were given.
    #[error("Incompatible dimensions")]
    IncompatibleDimension,
}

/// Defect found by [`CscMatrix::check_format`](crate::algebra::CscMatrix::check_format).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparseFormatError {
    #[error("CSC array lengths disagree with the matrix dimensions")]
    IncompatibleDimension,
    /// Row index out of bounds or not strictly increasing in its column
    #[error("Bad row index")]
    BadRowval,
    #[error("Column pointers are not monotone")]
    BadColptr,
}

/// Error type returned by the dense factorization engines.
///
/// Pivot indices are zero based positions on the diagonal of the
/// matrix being factored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenseFactorizationError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    #[error("Cholesky error: non-positive pivot at {0}")]
    Cholesky(usize),
    #[error("LDL error: pivot at {0} is zero or has the wrong sign")]
    LDL(usize),
}
