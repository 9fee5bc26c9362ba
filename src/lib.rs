//! __blockkkt__ is a structure exploiting KKT solver for the Newton step of
//! an interior point method applied to the Gram block cone QP
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}\sum_i a_i^T K a_i - \sum_i (K \bar a_i)^T a_i + \frac{\Lambda}{2} \mathbf{1}^T b\\\\\[2ex\]
//!  \text{subject to} & -a_i - b \le 0, \quad a_i - b \le 0 \quad (i = 1, \dots, r)
//!  \end{array}
//! $$
//!
//! with decision variables $a_i \in \mathbb{R}^n$, $b \in \mathbb{R}^n$,
//! a symmetric positive semidefinite Gram matrix $K \in \mathbb{R}^{n \times n}$
//! shared by all $r$ blocks, target coefficients $\bar a_i$ and a
//! regularization weight $\Lambda > 0$.
//!
//! At every interior point iteration the Newton system
//!
//! $$
//! \begin{bmatrix} P & G^T \\\\ G & -W^T W \end{bmatrix}
//! \begin{bmatrix} u_x \\\\ u_z \end{bmatrix} =
//! \begin{bmatrix} b_x \\\\ b_z \end{bmatrix}
//! $$
//!
//! must be solved for a diagonal scaling $W$.  The
//! [structured solver](crate::solver::StructuredKKTSolver) does this with
//! `n×n` Cholesky factorizations only, never forming the full system.  A
//! [dense solver](crate::solver::DenseKKTSolver) is provided as a reference.
//!
//! ```no_run
//! use blockkkt::{algebra::*, solver::*};
//!
//! let settings = KKTSettings::default();
//! let gram = Matrix::from(&[[2., 1.], [1., 2.]]);
//! let problem = GramProblem::new(2, 2, gram, &[1., 0., 0., 1.], 0.5, &settings).unwrap();
//!
//! let mut solver = SupportedKKTSolver::new(&problem, &settings).unwrap();
//! let W = NonnegativeScaling::new(problem.ncons());
//! let F = solver.factor(&W).unwrap();
//!
//! let mut x = vec![1.; problem.nvars()];
//! let mut z = vec![0.; problem.ncons()];
//! F.solve(&mut x, &mut [], &mut z, &settings).unwrap();
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

pub mod algebra;
pub mod fixtures;
pub mod io;
pub mod solver;
