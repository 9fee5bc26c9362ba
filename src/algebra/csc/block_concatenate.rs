#![allow(non_snake_case)]

use crate::algebra::{
    hvcat_dim_check, BlockConcatenate, CscMatrix, FloatT, MatrixConcatenationError, ShapedMatrix,
};

// One block column of the output: its width and the blocks stacked in
// it, each with the row offset of its first row.  Offsets must increase.
struct BlockColumn<'a, T> {
    ncols: usize,
    blocks: Vec<(&'a CscMatrix<T>, usize)>,
}

// Copies the block columns side by side.  Row indices stay sorted
// within each output column because the blocks are visited top to
// bottom.
fn assemble<T: FloatT>(nrows: usize, blockcols: &[BlockColumn<'_, T>]) -> CscMatrix<T> {
    let ncols = blockcols.iter().map(|bc| bc.ncols).sum();
    let nnz = blockcols
        .iter()
        .flat_map(|bc| bc.blocks.iter())
        .map(|(B, _)| B.nnz())
        .sum();

    let mut colptr = Vec::with_capacity(ncols + 1);
    let mut rowval = Vec::with_capacity(nnz);
    let mut nzval = Vec::with_capacity(nnz);
    colptr.push(0);

    for bc in blockcols {
        for j in 0..bc.ncols {
            for &(B, offset) in &bc.blocks {
                let range = B.colptr[j]..B.colptr[j + 1];
                rowval.extend(B.rowval[range.clone()].iter().map(|&r| r + offset));
                nzval.extend_from_slice(&B.nzval[range]);
            }
            colptr.push(rowval.len());
        }
    }
    CscMatrix::new(nrows, ncols, colptr, rowval, nzval)
}

impl<T> BlockConcatenate for CscMatrix<T>
where
    T: FloatT,
{
    fn hvcat(mats: &[&[&Self]]) -> Result<Self, MatrixConcatenationError> {
        hvcat_dim_check(mats)?;

        let blockcols: Vec<_> = (0..mats[0].len())
            .map(|j| {
                let mut offset = 0;
                let blocks = mats
                    .iter()
                    .map(|blockrow| {
                        let placed = (blockrow[j], offset);
                        offset += blockrow[j].nrows();
                        placed
                    })
                    .collect();
                BlockColumn {
                    ncols: mats[0][j].ncols(),
                    blocks,
                }
            })
            .collect();
        let nrows = mats.iter().map(|blockrow| blockrow[0].nrows()).sum();

        Ok(assemble(nrows, &blockcols))
    }

    fn blockdiag(mats: &[&Self]) -> Result<Self, MatrixConcatenationError> {
        if mats.is_empty() {
            return Err(MatrixConcatenationError::IncompatibleDimension);
        }

        let mut offset = 0;
        let blockcols: Vec<_> = mats
            .iter()
            .map(|&B| {
                let bc = BlockColumn {
                    ncols: B.ncols(),
                    blocks: vec![(B, offset)],
                };
                offset += B.nrows();
                bc
            })
            .collect();

        Ok(assemble(offset, &blockcols))
    }
}
