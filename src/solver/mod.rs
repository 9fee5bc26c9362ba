//! Gram block problem data and KKT solvers.
//!
//! The types here cover one Newton step of an interior point method
//! for the problem described on the top level [API page](crate):
//!
//! - [`GramProblem`] builds the cone QP data `(P, q, G, h, cones)`.
//! - [`NonnegativeScaling`] holds the per-iteration scaling `W`.
//! - [`SupportedKKTSolver`] factors the Newton system for a given `W`,
//!   producing a [`KKTFactorization`] that solves it in place.
//!
//! Solver behavior is configured through [`KKTSettings`].

// internal module structure
pub(crate) mod core;
pub mod kktsolvers;
mod problem;

pub use crate::solver::core::*;
pub use crate::solver::kktsolvers::*;
pub use crate::solver::problem::*;

//allows declaration of cone constraints
pub use crate::solver::core::SupportedConeT::*;
