#![allow(non_snake_case)]

use super::*;
use crate::io::forward_print_target;
use crate::solver::core::{total_dim, FactorStage, SupportedConeT};
use itertools::izip;
use std::io::Write;

// -------------------------------------
// Dense reference KKT solver
// -------------------------------------

/// KKT solver for a general `(P, G)` pair with nonnegative cones.
///
/// Each factorization assembles the full quasidefinite matrix
///
/// ```text
/// [ -W²  G ]
/// [ Gᵀ   P ]
/// ```
///
/// with the dual block ordered first, so that a dense `LDLᵀ` without
/// pivoting succeeds for any positive semidefinite `P` and any `G` of
/// full column rank.  Cost is cubic in the full system dimension.
#[derive(Debug)]
pub struct DenseKKTSolver<T: FloatT> {
    P: Matrix<T>,
    G: CscMatrix<T>,
    settings: KKTSettings<T>,
    pub(crate) output: PrintTarget,
}

impl<T> DenseKKTSolver<T>
where
    T: FloatT,
{
    pub fn new(problem: &GramProblem<T>, settings: &KKTSettings<T>) -> Result<Self, KKTError> {
        Self::new_from_data(&problem.P.to_dense(), &problem.G, &problem.cones, settings)
    }

    /// Dense solver for the quadratic cost `P` and constraints `G`,
    /// where `cones` must cover the rows of `G`.
    pub fn new_from_data(
        P: &Matrix<T>,
        G: &CscMatrix<T>,
        cones: &[SupportedConeT],
        settings: &KKTSettings<T>,
    ) -> Result<Self, KKTError> {
        if !P.is_square() {
            return Err(KKTError::Shape("P must be square".to_string()));
        }
        if G.ncols() != P.ncols() {
            return Err(KKTError::dimension("G columns", P.ncols(), G.ncols()));
        }
        let m = total_dim(cones);
        if m != G.nrows() {
            return Err(KKTError::dimension("cones", G.nrows(), m));
        }

        Ok(Self {
            P: P.clone(),
            G: G.clone(),
            settings: settings.clone(),
            output: PrintTarget::default(),
        })
    }

    fn print_factor_summary(&mut self, F: &DenseFactor<T>) -> std::io::Result<()> {
        if !self.settings.verbose {
            return Ok(());
        }
        let npos = F.ldl.D.iter().filter(|&&d| d > T::zero()).count();
        writeln!(
            self.output,
            "dense KKT factor: dim = {}, inertia = ({}, {})",
            F.ldl.dim(),
            npos,
            F.ldl.dim() - npos
        )
    }
}

impl<T> KKTSolver<T> for DenseKKTSolver<T>
where
    T: FloatT,
{
    fn nvars(&self) -> usize {
        self.P.ncols()
    }

    fn ncons(&self) -> usize {
        self.G.nrows()
    }

    fn factor(&mut self, W: &NonnegativeScaling<T>) -> Result<KKTFactorization<T>, KKTError> {
        let (n, m) = (self.nvars(), self.ncons());
        if W.dim() != m {
            return Err(KKTError::dimension("scaling", m, W.dim()));
        }

        // KKT = [-W² G; Gᵀ P]
        let mut KKT = Matrix::zeros((m + n, m + n));
        for (i, &di) in W.d().iter().enumerate() {
            KKT[(i, i)] = -(di * di);
        }
        let G = &self.G;
        for col in 0..G.n {
            for ptr in G.colptr[col]..G.colptr[col + 1] {
                let (row, v) = (G.rowval[ptr], G.nzval[ptr]);
                KKT[(row, m + col)] = v;
                KKT[(m + col, row)] = v;
            }
        }
        KKT.set_block(m, m, &self.P);

        let mut dsigns = vec![-1i8; m + n];
        dsigns[m..].fill(1);

        let mut ldl = LDLEngine::new(m + n);
        ldl.factor(&KKT, &dsigns, self.settings.factorization_pivot_tol)
            .map_err(|e| KKTError::from_factorization(e, FactorStage::Dense))?;

        let F = DenseFactor {
            n,
            m,
            KKT,
            ldl,
            d: W.d().to_vec(),
            di: W.di().to_vec(),
        };
        let _ = self.print_factor_summary(&F);
        Ok(F.into())
    }
}

impl<T> ConfigurablePrintTarget for DenseKKTSolver<T>
where
    T: FloatT,
{
    forward_print_target!(output);
}

/// Factorization handle produced by [`DenseKKTSolver`]
#[derive(Debug, Clone)]
pub struct DenseFactor<T> {
    n: usize,
    m: usize,
    KKT: Matrix<T>,
    ldl: LDLEngine<T>,
    d: Vec<T>,
    di: Vec<T>,
}

impl<T> KKTFactor<T> for DenseFactor<T>
where
    T: FloatT,
{
    fn nvars(&self) -> usize {
        self.n
    }

    fn ncons(&self) -> usize {
        self.m
    }

    fn solve_unrefined(&self, b: &mut [T]) {
        let (n, m) = (self.n, self.m);
        assert_eq!(b.len(), n + m);

        // reorder [bx; bz] to the factored ordering [bz; bx]
        let mut v = Vec::with_capacity(n + m);
        v.extend_from_slice(&b[n..]);
        v.extend_from_slice(&b[..n]);
        self.ldl.solve(&mut v);

        let (uz, ux) = v.split_at(m);
        b[..n].copy_from(ux);
        for (zi, &uzi, &di) in izip!(&mut b[n..], uz, &self.d) {
            *zi = di * uzi;
        }
    }

    fn kkt_mul(&self, y: &mut [T], v: &[T]) {
        let (n, m) = (self.n, self.m);
        assert_eq!(y.len(), n + m);
        assert_eq!(v.len(), n + m);

        // [uz; ux] with uz = W⁻¹ zs
        let mut u = Vec::with_capacity(n + m);
        u.extend(izip!(&v[n..], &self.di).map(|(&zi, &dii)| zi * dii));
        u.extend_from_slice(&v[..n]);

        let mut w = vec![T::zero(); n + m];
        self.KKT.gemv(&mut w, &u, T::one(), T::zero());
        y[..n].copy_from(&w[m..]);
        y[n..].copy_from(&w[..m]);
    }

    fn kkt_mul_abs(&self, y: &mut [T], v: &[T]) {
        let (n, m) = (self.n, self.m);
        assert_eq!(y.len(), n + m);
        assert_eq!(v.len(), n + m);

        let mut u = Vec::with_capacity(n + m);
        u.extend(izip!(&v[n..], &self.di).map(|(&zi, &dii)| T::abs(zi * dii)));
        u.extend(v[..n].iter().map(|&xi| T::abs(xi)));

        let mut w = vec![T::zero(); n + m];
        for (j, &uj) in u.iter().enumerate() {
            for (wi, &Kij) in w.iter_mut().zip(self.KKT.col_slice(j)) {
                *wi += T::abs(Kij) * uj;
            }
        }
        y[..n].copy_from(&w[m..]);
        y[n..].copy_from(&w[..m]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_small_qp() {
        // one variable, x ≥ 0 and x ≤ 1
        let P = Matrix::from(&[[2.]]);
        let G = CscMatrix::from(&Matrix::from(&[[-1.], [1.]]));
        let cones = [SupportedConeT::NonnegativeConeT(2)];
        let settings = KKTSettings::default();

        let mut solver = DenseKKTSolver::new_from_data(&P, &G, &cones, &settings).unwrap();
        let W = NonnegativeScaling::from_diagonal(&[1., 0.5]).unwrap();
        let F = solver.factor(&W).unwrap();

        // 2 ux - uz₁ + uz₂ = 1, -ux - uz₁ = 0, ux - ¼ uz₂ = 0
        // so ux = 1/7, uz = (-1/7, 4/7) and z = W uz = (-1/7, 2/7)
        let mut x = vec![1.0f64];
        let mut z = vec![0.0f64, 0.0];
        F.solve(&mut x, &mut [], &mut z, &settings).unwrap();

        assert!((x[0] - 1. / 7.).abs() < 1e-14);
        assert!((z[0] + 1. / 7.).abs() < 1e-14);
        assert!((z[1] - 2. / 7.).abs() < 1e-14);
    }

    #[test]
    fn test_dense_bad_inputs() {
        let P = Matrix::from(&[[2.]]);
        let G = CscMatrix::from(&Matrix::from(&[[-1.], [1.]]));
        let settings = KKTSettings::<f64>::default();

        let err = DenseKKTSolver::new_from_data(&P, &G, &[], &settings).unwrap_err();
        assert!(matches!(err, KKTError::Dimension(_)));

        let cones = [SupportedConeT::NonnegativeConeT(3)];
        let err = DenseKKTSolver::new_from_data(&P, &G, &cones, &settings).unwrap_err();
        assert!(matches!(err, KKTError::Dimension(_)));

        // P not positive semidefinite makes the reduced matrix indefinite
        let P = Matrix::from(&[[-10.]]);
        let cones = [SupportedConeT::NonnegativeConeT(2)];
        let mut solver = DenseKKTSolver::new_from_data(&P, &G, &cones, &settings).unwrap();
        let err = solver.factor(&NonnegativeScaling::new(2)).unwrap_err();
        assert_eq!(
            err,
            KKTError::Factorization {
                stage: FactorStage::Dense,
                pivot: 2
            }
        );
    }
}
