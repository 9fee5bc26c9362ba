#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::core::{KKTError, KKTSettings, SupportedConeT};
use std::sync::Arc;

/// Block diagonal quadratic form `P = blockdiag(K, …, K, 0)`.
///
/// The `r` leading blocks all refer to one shared Gram matrix `K`.  The
/// trailing `n×n` block is identically zero and is not stored.
#[derive(Debug, Clone)]
pub struct BlockGramMatrix<T> {
    gram: Arc<Matrix<T>>,
    r: usize,
}

impl<T> BlockGramMatrix<T>
where
    T: FloatT,
{
    /// # Panics
    /// Panics if `gram` is not square.
    pub fn new(gram: Arc<Matrix<T>>, r: usize) -> Self {
        assert!(gram.is_square());
        Self { gram, r }
    }

    /// dimension of each block
    pub fn n(&self) -> usize {
        self.gram.nrows()
    }

    /// number of Gram blocks
    pub fn r(&self) -> usize {
        self.r
    }

    /// the shared Gram matrix
    pub fn gram(&self) -> &Arc<Matrix<T>> {
        &self.gram
    }

    /// The `i`th diagonal block, for `i < r`
    pub fn block(&self, i: usize) -> &Matrix<T> {
        assert!(i < self.r);
        &self.gram
    }

    pub fn to_dense(&self) -> Matrix<T> {
        let n = self.n();
        let mut P = Matrix::zeros(self.size());
        for i in 0..self.r {
            P.set_block(i * n, i * n, &self.gram);
        }
        P
    }

    pub fn to_csc(&self) -> Result<CscMatrix<T>, MatrixConcatenationError> {
        let K = CscMatrix::from(self.gram.as_ref());
        let Z = CscMatrix::zeros((self.n(), self.n()));
        let mut blocks = vec![&K; self.r];
        blocks.push(&Z);
        CscMatrix::blockdiag(&blocks)
    }
}

impl<T> ShapedMatrix for BlockGramMatrix<T> {
    fn nrows(&self) -> usize {
        self.gram.m * (self.r + 1)
    }
    fn ncols(&self) -> usize {
        self.nrows()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

impl<T: FloatT> MatrixVectorMultiply for BlockGramMatrix<T> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let n = self.n();
        let nr = n * self.r;
        assert_eq!(x.len(), self.ncols());
        assert_eq!(y.len(), self.nrows());

        for (yi, xi) in y[..nr].chunks_exact_mut(n).zip(x[..nr].chunks_exact(n)) {
            self.gram.gemv(yi, xi, a, b);
        }
        _scale_or_zero(&mut y[nr..], b);
    }
}

/// Cone QP data for the Gram block problem
///
/// ```text
/// minimize    ½ Σᵢ aᵢᵀ K aᵢ  -  Σᵢ (K āᵢ)ᵀ aᵢ  +  Λ/2 · 1ᵀ b
/// subject to  -aᵢ - b ≤ 0,   aᵢ - b ≤ 0        (i = 1..r)
/// ```
///
/// in the variable `x = (a₁, …, aᵣ, b)`, expressed in the standard form
/// `min ½xᵀPx + qᵀx  s.t.  Gx + s = h, s ≥ 0`.
#[derive(Debug, Clone)]
pub struct GramProblem<T> {
    /// dimension of each block
    pub n: usize,
    /// number of blocks
    pub r: usize,
    /// quadratic cost
    pub P: BlockGramMatrix<T>,
    /// linear cost
    pub q: Vec<T>,
    /// inequality constraint matrix, `2nr × (nr + n)`
    pub G: CscMatrix<T>,
    /// inequality right hand side (all zero)
    pub h: Vec<T>,
    /// cone partition of the constraints
    pub cones: Vec<SupportedConeT>,
    /// target coefficients `ā`
    pub target: Vec<T>,
    /// regularization weight `Λ`
    pub regularization: T,
}

impl<T> GramProblem<T>
where
    T: FloatT,
{
    pub fn new(
        n: usize,
        r: usize,
        gram: impl Into<Arc<Matrix<T>>>,
        target: &[T],
        regularization: T,
        settings: &KKTSettings<T>,
    ) -> Result<Self, KKTError> {
        let gram = gram.into();

        if r < 1 || n < r {
            return Err(KKTError::Dimension(format!(
                "require n ≥ r ≥ 1, got n = {n}, r = {r}"
            )));
        }
        if gram.size() != (n, n) {
            let (m, k) = gram.size();
            return Err(KKTError::Shape(format!(
                "Gram matrix is {m}×{k}, expected {n}×{n}"
            )));
        }
        if !gram.is_symmetric(settings.symmetry_tol) {
            return Err(KKTError::Shape("Gram matrix is not symmetric".to_string()));
        }
        if target.len() != n * r {
            return Err(KKTError::dimension("target", n * r, target.len()));
        }
        if !(regularization > T::zero() && regularization.is_finite()) {
            return Err(KKTError::BadParameter(format!(
                "regularization must be positive and finite, got {regularization}"
            )));
        }

        let nr = n * r;

        // q = [-K ā₁; …; -K āᵣ; Λ/2]
        let mut q = vec![T::zero(); nr + n];
        for (qi, ai) in q[..nr].chunks_exact_mut(n).zip(target.chunks_exact(n)) {
            gram.gemv(qi, ai, -T::one(), T::zero());
        }
        q[nr..].set(regularization / (2.0).as_T());

        // G = [-I E; I E], with E = r stacked copies of -I
        let I = CscMatrix::<T>::identity(nr);
        let mut negI = I.clone();
        negI.nzval.negate();
        let E = stacked_negative_identity(n, r);
        let G = CscMatrix::hvcat(&[&[&negI, &E], &[&I, &E]])?;

        Ok(Self {
            n,
            r,
            P: BlockGramMatrix::new(gram, r),
            q,
            G,
            h: vec![T::zero(); 2 * nr],
            cones: vec![SupportedConeT::NonnegativeConeT(2 * nr)],
            target: target.to_vec(),
            regularization,
        })
    }

    /// number of primal variables, `nr + n`
    pub fn nvars(&self) -> usize {
        self.n * (self.r + 1)
    }

    /// number of inequality constraints, `2nr`
    pub fn ncons(&self) -> usize {
        2 * self.n * self.r
    }

    /// Objective value `½xᵀPx + qᵀx`
    pub fn objective(&self, x: &[T]) -> Result<T, KKTError> {
        if x.len() != self.nvars() {
            return Err(KKTError::dimension("x", self.nvars(), x.len()));
        }
        let mut Px = vec![T::zero(); x.len()];
        self.P.gemv(&mut Px, x, T::one(), T::zero());
        Ok(x.dot(&Px) / (2.0).as_T() + self.q.dot(x))
    }

    /// Constraint residual `Gx + s - h`
    pub fn constraint_residual(&self, x: &[T], s: &[T]) -> Result<Vec<T>, KKTError> {
        if x.len() != self.nvars() {
            return Err(KKTError::dimension("x", self.nvars(), x.len()));
        }
        if s.len() != self.ncons() {
            return Err(KKTError::dimension("s", self.ncons(), s.len()));
        }
        let mut res = s.to_vec();
        res.axpby(-T::one(), &self.h, T::one());
        self.G.gemv(&mut res, x, T::one(), T::one());
        Ok(res)
    }
}

// nr × n matrix [-I; -I; …; -I]
fn stacked_negative_identity<T: FloatT>(n: usize, r: usize) -> CscMatrix<T> {
    let colptr = (0..=n).map(|j| j * r).collect();
    let rowval = (0..n)
        .flat_map(|j| (0..r).map(move |i| i * n + j))
        .collect();
    let nzval = vec![-T::one(); n * r];
    CscMatrix::new(n * r, n, colptr, rowval, nzval)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_problem() -> GramProblem<f64> {
        let K = Matrix::from(&[[2., 1.], [1., 3.]]);
        let target = vec![1., 0., 0., -1.];
        GramProblem::new(2, 2, K, &target, 0.5, &KKTSettings::default()).unwrap()
    }

    #[test]
    fn test_problem_data() {
        let prob = simple_problem();
        assert_eq!(prob.nvars(), 6);
        assert_eq!(prob.ncons(), 8);

        // q = [-K ā₁; -K ā₂; Λ/2]
        assert_eq!(prob.q, vec![-2., -1., 1., 3., 0.25, 0.25]);
        assert_eq!(prob.h, vec![0.; 8]);
        assert_eq!(prob.cones, vec![SupportedConeT::NonnegativeConeT(8)]);

        assert!(prob.G.check_format().is_ok());
        assert_eq!(prob.G.size(), (8, 6));
        #[rustfmt::skip]
        let G = Matrix::from(
            &[[-1.,  0.,  0.,  0., -1.,  0.],
              [ 0., -1.,  0.,  0.,  0., -1.],
              [ 0.,  0., -1.,  0., -1.,  0.],
              [ 0.,  0.,  0., -1.,  0., -1.],
              [ 1.,  0.,  0.,  0., -1.,  0.],
              [ 0.,  1.,  0.,  0.,  0., -1.],
              [ 0.,  0.,  1.,  0., -1.,  0.],
              [ 0.,  0.,  0.,  1.,  0., -1.]]);
        assert_eq!(prob.G.to_dense(), G);
    }

    #[test]
    fn test_shared_blocks() {
        let prob = simple_problem();
        let P = &prob.P;
        assert!(std::ptr::eq(P.block(0), P.block(1)));
        assert_eq!(Arc::strong_count(P.gram()), 1);

        let P2 = P.clone();
        assert!(Arc::ptr_eq(P.gram(), P2.gram()));

        let D = P.to_dense();
        assert_eq!(D.size(), (6, 6));
        assert_eq!(D[(3, 2)], 1.);
        assert_eq!(D[(5, 5)], 0.);
        assert_eq!(P.to_csc().unwrap().to_dense(), D);

        // gemv against the dense equivalent
        let x = vec![1., 2., 3., 4., 5., 6.];
        let mut y1 = vec![1.; 6];
        let mut y2 = vec![1.; 6];
        P.gemv(&mut y1, &x, 2., -1.);
        D.gemv(&mut y2, &x, 2., -1.);
        assert_eq!(y1, y2);
    }

    #[test]
    fn test_objective_and_residual() {
        let prob = simple_problem();
        let x = vec![1., 0., 0., -1., 1., 1.];

        // ½ (2 + 3) + (-2 - 3 + 0.5)
        assert_eq!(prob.objective(&x).unwrap(), 2.5 - 4.5);

        let s = vec![1.; 8];
        let res = prob.constraint_residual(&x, &s).unwrap();
        assert_eq!(res, vec![-1., 0., 0., 1., 1., 0., 0., -1.]);

        assert!(prob.objective(&[0.; 5]).is_err());
        assert!(prob.constraint_residual(&x, &[0.; 7]).is_err());
    }

    #[test]
    fn test_problem_errors() {
        let settings = KKTSettings::<f64>::default();
        let K = Matrix::<f64>::identity(2);

        let err = GramProblem::new(2, 3, K.clone(), &[0.; 6], 1., &settings).unwrap_err();
        assert!(matches!(err, KKTError::Dimension(_)));
        let err = GramProblem::new(2, 0, K.clone(), &[], 1., &settings).unwrap_err();
        assert!(matches!(err, KKTError::Dimension(_)));

        let err = GramProblem::new(3, 1, K.clone(), &[0.; 3], 1., &settings).unwrap_err();
        assert!(matches!(err, KKTError::Shape(_)));

        let A = Matrix::from(&[[1., 2.], [0., 1.]]);
        let err = GramProblem::new(2, 1, A, &[0.; 2], 1., &settings).unwrap_err();
        assert!(matches!(err, KKTError::Shape(_)));

        let err = GramProblem::new(2, 1, K.clone(), &[0.; 3], 1., &settings).unwrap_err();
        assert!(matches!(err, KKTError::Dimension(_)));

        for bad in [0., -1., f64::NAN, f64::INFINITY] {
            let err = GramProblem::new(2, 1, K.clone(), &[0.; 2], bad, &settings).unwrap_err();
            assert!(matches!(err, KKTError::BadParameter(_)));
        }
    }
}
