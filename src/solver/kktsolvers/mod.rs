//! KKT solve providers.
//!
//! A provider is built once per problem.  At each interior point
//! iteration its [`factor`](KKTSolver::factor) method turns the current
//! scaling into an immutable factorization handle, which can then
//! be applied to any number of right hand sides via
//! [`solve`](KKTFactor::solve).
//!
//! Two providers are available:
//! - [`StructuredKKTSolver`] exploits the shared Gram blocks of
//!   [`GramProblem`](crate::solver::GramProblem) and only ever factors
//!   `n×n` matrices.
//! - [`DenseKKTSolver`] factors the full quasidefinite KKT matrix and
//!   serves as a reference.

#![allow(non_snake_case)]

use crate::algebra::*;
use crate::io::{forward_print_target, ConfigurablePrintTarget, PrintTarget};
use crate::solver::core::{KKTError, KKTSettings, NonnegativeScaling};
use crate::solver::GramProblem;
use enum_dispatch::*;
use itertools::izip;

mod dense;
mod structured;
pub use dense::*;
pub use structured::*;

/// Capability of a KKT solve provider.
#[enum_dispatch]
pub trait KKTSolver<T>
where
    T: FloatT,
{
    /// number of primal variables
    fn nvars(&self) -> usize;

    /// number of conic constraints
    fn ncons(&self) -> usize;

    /// Factor the KKT system for the scaling `W`
    fn factor(&mut self, W: &NonnegativeScaling<T>) -> Result<KKTFactorization<T>, KKTError>;
}

/// A factored KKT system
///
/// ```text
/// [ P   Gᵀ  ] [ux]   [bx]
/// [ G  -WᵀW ] [uz] = [bz]
/// ```
///
/// Handles are immutable, so one handle may serve any number of solves.
#[enum_dispatch]
pub trait KKTFactor<T>
where
    T: FloatT,
{
    /// number of primal variables
    fn nvars(&self) -> usize;

    /// number of conic constraints
    fn ncons(&self) -> usize;

    /// Solve the KKT system in place on the stacked vector `b = [x; z]`,
    /// without refinement.  On return `b = [ux; W uz]`.
    fn solve_unrefined(&self, b: &mut [T]);

    /// Multiply by the KKT matrix in scaled variables, i.e. the operator
    /// inverted by [`solve_unrefined`](KKTFactor::solve_unrefined):
    ///
    /// ```text
    /// y = [ P x + Gᵀ W⁻¹ zs ]
    ///     [ G x -  W zs     ]
    /// ```
    /// for the stacked input `v = [x; zs]`.
    fn kkt_mul(&self, y: &mut [T], v: &[T]);

    /// Same as [`kkt_mul`](KKTFactor::kkt_mul) with every entry of the
    /// operator and of `v` replaced by its magnitude, i.e. `y = |K| |v|`.
    fn kkt_mul_abs(&self, y: &mut [T], v: &[T]);

    /// Solve the KKT system in place.
    ///
    /// On entry `(x, z)` hold the right hand side `(bx, bz)`; on return
    /// they hold `(ux, W uz)`.  `y` is accepted for compatibility with
    /// equality constrained drivers and is left untouched.
    ///
    /// The solve fails with [`KKTError::Accuracy`] if the componentwise
    /// backward error of the (refined) solution exceeds
    /// `settings.backward_error_tol`, in which case `x` and `z` are
    /// left unchanged.
    fn solve(
        &self,
        x: &mut [T],
        _y: &mut [T],
        z: &mut [T],
        settings: &KKTSettings<T>,
    ) -> Result<(), KKTError> {
        let (nvars, ncons) = (self.nvars(), self.ncons());
        if x.len() != nvars {
            return Err(KKTError::dimension("x", nvars, x.len()));
        }
        if z.len() != ncons {
            return Err(KKTError::dimension("z", ncons, z.len()));
        }

        let mut b = Vec::with_capacity(nvars + ncons);
        b.extend_from_slice(x);
        b.extend_from_slice(z);

        let mut sol = b.clone();
        self.solve_unrefined(&mut sol);

        if settings.iterative_refinement_enable {
            iterative_refinement(self, &mut sol, &b, settings);
        }

        let berr = _get_backward_error(self, &b, &sol);
        if !(berr <= settings.backward_error_tol) {
            return Err(KKTError::accuracy(berr, settings.backward_error_tol));
        }

        let (solx, solz) = sol.split_at(nvars);
        x.copy_from(solx);
        z.copy_from(solz);
        Ok(())
    }
}

/// Solvers available for the Gram block problem, selected by
/// [`KKTSettings::kkt_solve_method`](crate::solver::KKTSettings::kkt_solve_method).
#[enum_dispatch(KKTSolver<T>)]
#[derive(Debug)]
pub enum SupportedKKTSolver<T>
where
    T: FloatT,
{
    StructuredKKTSolver(StructuredKKTSolver<T>),
    DenseKKTSolver(DenseKKTSolver<T>),
}

/// Factorization handles produced by the members of [`SupportedKKTSolver`]
#[enum_dispatch(KKTFactor<T>)]
#[derive(Debug, Clone)]
pub enum KKTFactorization<T>
where
    T: FloatT,
{
    StructuredFactor(StructuredFactor<T>),
    DenseFactor(DenseFactor<T>),
}

impl<T> SupportedKKTSolver<T>
where
    T: FloatT,
{
    /// Provider for `problem` as named by `settings.kkt_solve_method`.
    /// "auto" selects the structured solver.
    pub fn new(problem: &GramProblem<T>, settings: &KKTSettings<T>) -> Result<Self, KKTError> {
        settings.validate()?;

        let solver = match settings.kkt_solve_method.as_str() {
            "auto" | "structured" => StructuredKKTSolver::new(problem, settings).into(),
            "dense" => DenseKKTSolver::new(problem, settings)?.into(),
            other => {
                return Err(KKTError::BadParameter(format!(
                    "unknown kkt_solve_method \"{other}\""
                )))
            }
        };
        Ok(solver)
    }

    fn output(&mut self) -> &mut PrintTarget {
        match self {
            SupportedKKTSolver::StructuredKKTSolver(s) => &mut s.output,
            SupportedKKTSolver::DenseKKTSolver(s) => &mut s.output,
        }
    }
}

impl<T> ConfigurablePrintTarget for SupportedKKTSolver<T>
where
    T: FloatT,
{
    forward_print_target!(output());
}

// Iterative refinement of `x` against the KKT operator of `factor`,
// stopping on tolerance, stalling or the iteration limit.  `x` is
// only ever replaced by a candidate with a smaller residual.
fn iterative_refinement<T, F>(factor: &F, x: &mut Vec<T>, b: &[T], settings: &KKTSettings<T>)
where
    T: FloatT,
    F: KKTFactor<T> + ?Sized,
{
    // iterative refinement params
    let reltol = settings.iterative_refinement_reltol;
    let abstol = settings.iterative_refinement_abstol;
    let maxiter = settings.iterative_refinement_max_iter;
    let stopratio = settings.iterative_refinement_stop_ratio;

    let mut e = vec![T::zero(); b.len()];
    let mut dx = vec![T::zero(); b.len()];
    let normb = b.norm_inf();

    //compute the initial error
    let mut norme = _get_refine_error(factor, &mut e, b, x);

    for _ in 0..maxiter {
        // bail on numerical error
        if !norme.is_finite() {
            return;
        }

        if norme <= (abstol + reltol * normb) {
            //within tolerance.  Exit
            return;
        }

        let lastnorme = norme;

        //make a refinement
        dx.copy_from(&e);
        factor.solve_unrefined(&mut dx);

        //prospective solution is x + dx.  Use dx space to
        // hold it for a check before applying to x
        dx.axpby(T::one(), x, T::one());
        norme = _get_refine_error(factor, &mut e, b, &dx);

        let improved_ratio = lastnorme / norme;
        if improved_ratio < stopratio {
            //insufficient improvement.  Exit
            if improved_ratio > T::one() {
                std::mem::swap(x, &mut dx);
            }
            return;
        }
        std::mem::swap(x, &mut dx);
    }
}

//  computes e = b - Kξ, overwriting the first argument
//  and returning its norm
fn _get_refine_error<T, F>(factor: &F, e: &mut [T], b: &[T], ξ: &[T]) -> T
where
    T: FloatT,
    F: KKTFactor<T> + ?Sized,
{
    factor.kkt_mul(e, ξ);
    e.axpby(T::one(), b, -T::one());
    e.norm_inf()
}

//  componentwise backward error max |b - Kξ|ᵢ / (|b|ᵢ + (|K||ξ|)ᵢ),
//  with 0/0 taken as zero.  NaN if anything is not finite.
fn _get_backward_error<T, F>(factor: &F, b: &[T], ξ: &[T]) -> T
where
    T: FloatT,
    F: KKTFactor<T> + ?Sized,
{
    let mut r = vec![T::zero(); b.len()];
    let mut s = vec![T::zero(); b.len()];
    factor.kkt_mul(&mut r, ξ);
    factor.kkt_mul_abs(&mut s, ξ);

    let mut berr = T::zero();
    for (&bi, &ri, &si) in izip!(b, &r, &s) {
        let num = T::abs(bi - ri);
        if !num.is_finite() || !si.is_finite() {
            return T::nan();
        }
        if num > T::zero() {
            berr = T::max(berr, num / (T::abs(bi) + si));
        }
    }
    berr
}
