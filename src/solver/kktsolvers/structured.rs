#![allow(non_snake_case)]

use super::*;
use crate::io::forward_print_target;
use crate::solver::core::FactorStage;
use crate::solver::BlockGramMatrix;
use itertools::izip;
use std::io::Write;
use std::sync::Arc;

// -------------------------------------
// Structured KKT solver
// -------------------------------------

/// KKT solver exploiting the block structure of [`GramProblem`].
///
/// Eliminating the dual variables leaves the reduced system
///
/// ```text
/// [ K + S₁            T₁ ] [ua₁]   [f₁]
/// [        ⋱          ⋮  ] [ ⋮ ] = [⋮ ]
/// [           K + Sᵣ  Tᵣ ] [uaᵣ]   [fᵣ]
/// [ T₁   …    Tᵣ      Σ  ] [ub ]   [g ]
/// ```
///
/// with diagonal `Sᵢ = diag(mCᵢ + mDᵢ)`, `Tᵢ = diag(mCᵢ - mDᵢ)` and
/// `Σ = Σᵢ Sᵢ`, where `mC` and `mD` are the squared inverse scalings of
/// the two constraint groups.  Each block `Mᵢ = K + Sᵢ` is factored
/// by Cholesky, and `ub` is recovered from the `n×n` coupling matrix
/// `A = Σ - Σᵢ Tᵢ Mᵢ⁻¹ Tᵢ`.  Blocks with identical weights share one
/// factorization, so a constant scaling needs just two `n×n`
/// factorizations in total.
///
/// Forming `A` as written cancels catastrophically once the two
/// scalings of a block differ by many orders of magnitude.  Since
/// `Sᵢ⁻¹ - Mᵢ⁻¹ = Sᵢ⁻¹ K Mᵢ⁻¹`, each block contributes instead
///
/// ```text
/// Sᵢ - Tᵢ Mᵢ⁻¹ Tᵢ = diag(4 mCᵢ mDᵢ / (mCᵢ + mDᵢ)) + Tᵢ Sᵢ⁻¹ K Mᵢ⁻¹ Tᵢ
/// ```
///
/// in which no large terms cancel.
#[derive(Debug)]
pub struct StructuredKKTSolver<T: FloatT> {
    P: BlockGramMatrix<T>,
    settings: KKTSettings<T>,
    pub(crate) output: PrintTarget,
}

impl<T> StructuredKKTSolver<T>
where
    T: FloatT,
{
    pub fn new(problem: &GramProblem<T>, settings: &KKTSettings<T>) -> Self {
        Self {
            P: problem.P.clone(),
            settings: settings.clone(),
            output: PrintTarget::default(),
        }
    }

    fn print_factor_summary(&mut self, F: &StructuredFactor<T>) -> std::io::Result<()> {
        if !self.settings.verbose {
            return Ok(());
        }
        writeln!(
            self.output,
            "structured KKT factor: n = {}, r = {}, block factorizations = {}, coupling logdet = {:.6e}",
            F.n,
            F.r,
            F.factors.len(),
            F.coupling.logdet()
        )
    }
}

impl<T> KKTSolver<T> for StructuredKKTSolver<T>
where
    T: FloatT,
{
    fn nvars(&self) -> usize {
        self.P.nrows()
    }

    fn ncons(&self) -> usize {
        2 * self.P.n() * self.P.r()
    }

    fn factor(&mut self, W: &NonnegativeScaling<T>) -> Result<KKTFactorization<T>, KKTError> {
        let F = StructuredFactor::new(&self.P, W, &self.settings)?;
        let _ = self.print_factor_summary(&F);
        Ok(F.into())
    }
}

impl<T> ConfigurablePrintTarget for StructuredKKTSolver<T>
where
    T: FloatT,
{
    forward_print_target!(output);
}

/// Factorization handle produced by [`StructuredKKTSolver`]
#[derive(Debug, Clone)]
pub struct StructuredFactor<T> {
    n: usize,
    r: usize,
    gram: Arc<Matrix<T>>,
    mC: Vec<T>,
    mD: Vec<T>,
    t: Vec<T>,
    d: Vec<T>,
    di: Vec<T>,
    // index into `factors` for each of the r blocks
    blockmap: Vec<usize>,
    factors: Vec<CholeskyEngine<T>>,
    coupling: CholeskyEngine<T>,
}

impl<T> StructuredFactor<T>
where
    T: FloatT,
{
    pub fn new(
        P: &BlockGramMatrix<T>,
        W: &NonnegativeScaling<T>,
        settings: &KKTSettings<T>,
    ) -> Result<Self, KKTError> {
        let (n, r) = (P.n(), P.r());
        let nr = n * r;
        if W.dim() != 2 * nr {
            return Err(KKTError::dimension("scaling", 2 * nr, W.dim()));
        }
        let tol = settings.factorization_pivot_tol;

        let di = W.di();
        let mut mC = di[..nr].to_vec();
        let mut mD = di[nr..].to_vec();
        mC.hadamard(&di[..nr]);
        mD.hadamard(&di[nr..]);

        let mut s = vec![T::zero(); nr];
        let mut t = vec![T::zero(); nr];
        s.waxpby(T::one(), &mC, T::one(), &mD);
        t.waxpby(T::one(), &mC, -T::one(), &mD);

        // factor Mᵢ = K + Sᵢ, once per distinct set of block weights
        let mut blockmap = Vec::with_capacity(r);
        let mut factors: Vec<CholeskyEngine<T>> = Vec::new();
        let mut firstblock: Vec<usize> = Vec::new();
        let mut M = Matrix::zeros((n, n));

        for (i, si) in s.chunks_exact(n).enumerate() {
            let same = firstblock
                .iter()
                .position(|&j| &s[j * n..(j + 1) * n] == si);

            if let Some(k) = same {
                blockmap.push(k);
                continue;
            }
            M.data_mut().copy_from(P.block(i).data());
            M.add_diag(si);
            let mut chol = CholeskyEngine::new(n);
            chol.factor(&M, tol)
                .map_err(|e| KKTError::from_factorization(e, FactorStage::Block(i)))?;

            blockmap.push(factors.len());
            factors.push(chol);
            firstblock.push(i);
        }

        // coupling matrix A = Σᵢ diag(4 mCᵢ mDᵢ / sᵢ) + diag(tᵢ/sᵢ) K Mᵢ⁻¹ diag(tᵢ)
        let K = P.gram();
        let mut A = Matrix::zeros((n, n));
        for (mCi, mDi, si) in izip!(mC.chunks_exact(n), mD.chunks_exact(n), s.chunks_exact(n)) {
            for (p, (&mCp, &mDp, &sp)) in izip!(mCi, mDi, si).enumerate() {
                A[(p, p)] += mCp * mDp / sp * (4.0).as_T();
            }
        }
        let mut Minv = Matrix::zeros((n, n));
        let mut KMinv = Matrix::zeros((n, n));
        for (k, chol) in factors.iter().enumerate() {
            chol.inverse(&mut Minv);
            for q in 0..n {
                K.gemv(KMinv.col_slice_mut(q), Minv.col_slice(q), T::one(), T::zero());
            }
            for i in (0..r).filter(|&i| blockmap[i] == k) {
                let ti = &t[i * n..(i + 1) * n];
                let si = &s[i * n..(i + 1) * n];
                for (q, &tq) in ti.iter().enumerate() {
                    for (p, (&tp, &sp)) in ti.iter().zip(si).enumerate() {
                        A[(p, q)] += tp / sp * KMinv[(p, q)] * tq;
                    }
                }
            }
        }
        // symmetric in exact arithmetic
        for q in 0..n {
            for p in (q + 1)..n {
                let v = (A[(p, q)] + A[(q, p)]) / (2.0).as_T();
                A[(p, q)] = v;
                A[(q, p)] = v;
            }
        }

        let mut coupling = CholeskyEngine::new(n);
        coupling
            .factor(&A, tol)
            .map_err(|e| KKTError::from_factorization(e, FactorStage::Coupling))?;

        Ok(Self {
            n,
            r,
            gram: Arc::clone(P.gram()),
            mC,
            mD,
            t,
            d: W.d().to_vec(),
            di: di.to_vec(),
            blockmap,
            factors,
            coupling,
        })
    }

    /// Number of distinct block factorizations held by the handle
    pub fn nfactors(&self) -> usize {
        self.factors.len()
    }

    fn block_factor(&self, i: usize) -> &CholeskyEngine<T> {
        &self.factors[self.blockmap[i]]
    }
}

impl<T> KKTFactor<T> for StructuredFactor<T>
where
    T: FloatT,
{
    fn nvars(&self) -> usize {
        self.n * (self.r + 1)
    }

    fn ncons(&self) -> usize {
        2 * self.n * self.r
    }

    fn solve_unrefined(&self, b: &mut [T]) {
        let (n, nr) = (self.n, self.n * self.r);
        assert_eq!(b.len(), 3 * nr + n);

        let (bx, bz) = b.split_at_mut(nr + n);
        let (a, ub) = bx.split_at_mut(nr);
        let (c, d_) = bz.split_at_mut(nr);

        // f = a - mC⊙c + mD⊙d_, overwriting a
        // g = b - Σᵢ (mCᵢ⊙cᵢ + mDᵢ⊙d_ᵢ), overwriting b
        for (k, (ak, &ck, &dk, &mCk, &mDk)) in izip!(a.iter_mut(), &*c, &*d_, &self.mC, &self.mD)
            .enumerate()
        {
            *ak = *ak - mCk * ck + mDk * dk;
            ub[k % n] -= mCk * ck + mDk * dk;
        }

        // wᵢ = Mᵢ⁻¹ fᵢ
        for (i, wi) in a.chunks_exact_mut(n).enumerate() {
            self.block_factor(i).solve(wi);
        }

        // ub = A⁻¹ (g - Σᵢ tᵢ⊙wᵢ)
        for (wi, ti) in a.chunks_exact(n).zip(self.t.chunks_exact(n)) {
            for (ubk, &wk, &tk) in izip!(ub.iter_mut(), wi, ti) {
                *ubk -= tk * wk;
            }
        }
        self.coupling.solve(ub);

        // uaᵢ = wᵢ - Mᵢ⁻¹ (tᵢ⊙ub)
        let mut work = vec![T::zero(); n];
        for (i, (wi, ti)) in a.chunks_exact_mut(n).zip(self.t.chunks_exact(n)).enumerate() {
            work.copy_from(ti).hadamard(ub);
            self.block_factor(i).solve(&mut work);
            wi.axpby(-T::one(), &work, T::one());
        }

        // z₁ = W₁⁻¹ (-ua - E ub - c) and z₂ = W₂⁻¹ (ua - E ub - d_)
        let (di1, di2) = self.di.split_at(nr);
        for (k, (ck, dk, &uak, &di1k, &di2k)) in izip!(c.iter_mut(), d_.iter_mut(), &*a, di1, di2)
            .enumerate()
        {
            let ubk = ub[k % n];
            *ck = di1k * (-uak - ubk - *ck);
            *dk = di2k * (uak - ubk - *dk);
        }
    }

    fn kkt_mul(&self, y: &mut [T], v: &[T]) {
        let (n, nr) = (self.n, self.n * self.r);
        assert_eq!(y.len(), 3 * nr + n);
        assert_eq!(v.len(), 3 * nr + n);

        let (vx, vz) = v.split_at(nr + n);
        let (ua, ub) = vx.split_at(nr);
        let (z1, z2) = vz.split_at(nr);
        let (yx, yz) = y.split_at_mut(nr + n);
        let (ya, yb) = yx.split_at_mut(nr);
        let (y1, y2) = yz.split_at_mut(nr);
        let (d1, d2) = self.d.split_at(nr);
        let (di1, di2) = self.di.split_at(nr);

        // ya = K uaᵢ - W₁⁻¹ z₁ + W₂⁻¹ z₂
        for (yai, uai) in ya.chunks_exact_mut(n).zip(ua.chunks_exact(n)) {
            self.gram.gemv(yai, uai, T::one(), T::zero());
        }
        yb.set(T::zero());
        for (k, (yak, &z1k, &z2k, &di1k, &di2k)) in
            izip!(ya.iter_mut(), z1, z2, di1, di2).enumerate()
        {
            *yak += di2k * z2k - di1k * z1k;
            yb[k % n] -= di1k * z1k + di2k * z2k;
        }

        // yz = G [ua; ub] - W zs
        for (k, (y1k, y2k, &uak, &z1k, &z2k, &d1k, &d2k)) in
            izip!(y1.iter_mut(), y2.iter_mut(), ua, z1, z2, d1, d2).enumerate()
        {
            let ubk = ub[k % n];
            *y1k = -uak - ubk - d1k * z1k;
            *y2k = uak - ubk - d2k * z2k;
        }
    }

    fn kkt_mul_abs(&self, y: &mut [T], v: &[T]) {
        let (n, nr) = (self.n, self.n * self.r);
        assert_eq!(y.len(), 3 * nr + n);
        assert_eq!(v.len(), 3 * nr + n);

        let (vx, vz) = v.split_at(nr + n);
        let (ua, ub) = vx.split_at(nr);
        let (z1, z2) = vz.split_at(nr);
        let (yx, yz) = y.split_at_mut(nr + n);
        let (ya, yb) = yx.split_at_mut(nr);
        let (y1, y2) = yz.split_at_mut(nr);
        let (d1, d2) = self.d.split_at(nr);
        let (di1, di2) = self.di.split_at(nr);

        let mut absK = (*self.gram).clone();
        absK.data_mut().scalarop(T::abs);
        let mut absu = vec![T::zero(); n];
        for (yai, uai) in ya.chunks_exact_mut(n).zip(ua.chunks_exact(n)) {
            absu.copy_from(uai).scalarop(T::abs);
            absK.gemv(yai, &absu, T::one(), T::zero());
        }
        yb.set(T::zero());
        for (k, (yak, &z1k, &z2k, &di1k, &di2k)) in
            izip!(ya.iter_mut(), z1, z2, di1, di2).enumerate()
        {
            let w = T::abs(di1k * z1k) + T::abs(di2k * z2k);
            *yak += w;
            yb[k % n] += w;
        }

        for (k, (y1k, y2k, &uak, &z1k, &z2k, &d1k, &d2k)) in
            izip!(y1.iter_mut(), y2.iter_mut(), ua, z1, z2, d1, d2).enumerate()
        {
            let u = T::abs(uak) + T::abs(ub[k % n]);
            *y1k = u + T::abs(d1k * z1k);
            *y2k = u + T::abs(d2k * z2k);
        }
    }
}
