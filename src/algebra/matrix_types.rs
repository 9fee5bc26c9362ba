use crate::algebra::MatrixConcatenationError;

/// Whether a matrix is used as stored or through its transpose
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum MatrixShape {
    N,
    T,
}

/// Borrowed transpose, produced by `.t()`
#[derive(Debug, Clone, Copy)]
pub struct Adjoint<'a, M> {
    pub src: &'a M,
}

/// Dimensions of anything matrix-like.
pub trait ShapedMatrix {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn shape(&self) -> MatrixShape;
    fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
}

impl<M> ShapedMatrix for Adjoint<'_, M>
where
    M: ShapedMatrix,
{
    fn nrows(&self) -> usize {
        self.src.ncols()
    }
    fn ncols(&self) -> usize {
        self.src.nrows()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::T
    }
}

/// Assembly of a matrix from blocks of the same type.
pub trait BlockConcatenate: Sized {
    /// `mats[i][j]` is the block in block row `i`, block column `j`.
    /// Blocks in a block row must share a row count, blocks in a
    /// block column a column count.
    fn hvcat(mats: &[&[&Self]]) -> Result<Self, MatrixConcatenationError>;

    /// Blocks placed along the diagonal, zeros elsewhere.  At least one
    /// block is required.
    fn blockdiag(mats: &[&Self]) -> Result<Self, MatrixConcatenationError>;
}

pub(crate) fn hvcat_dim_check<MAT: ShapedMatrix>(
    mats: &[&[&MAT]],
) -> Result<(), MatrixConcatenationError> {
    if mats.is_empty() || mats[0].is_empty() {
        return Err(MatrixConcatenationError::IncompatibleDimension);
    };

    // every block row has the same number of blocks
    let len0 = mats[0].len();
    if mats.iter().any(|blockrow| blockrow.len() != len0) {
        return Err(MatrixConcatenationError::IncompatibleDimension);
    }

    // rows agree along each block row
    for blockrow in mats {
        let rows = blockrow[0].nrows();
        if blockrow.iter().any(|mat| mat.nrows() != rows) {
            return Err(MatrixConcatenationError::IncompatibleDimension);
        }
    }

    // columns agree along each block column
    for (blockcol, topblock) in mats[0].iter().enumerate() {
        let cols = topblock.ncols();
        if mats.iter().any(|blockrow| blockrow[blockcol].ncols() != cols) {
            return Err(MatrixConcatenationError::IncompatibleDimension);
        }
    }

    Ok(())
}
