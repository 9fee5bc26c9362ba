#![allow(non_snake_case)]
use blockkkt::algebra::*;
use blockkkt::solver::*;

fn main() {
    // Newton step for a Gram block problem with n = 3, r = 2

    let K = Matrix::from(&[
        [2., 1., 0.], //
        [1., 2., 1.], //
        [0., 1., 2.], //
    ]);

    let target = vec![1., 0., -1., 0.5, 0.5, 0.];

    let settings = KKTSettingsBuilder::default()
        .verbose(true)
        .build()
        .unwrap();

    let problem = GramProblem::new(3, 2, K, &target, 0.1, &settings).unwrap();

    // scaling for a strictly interior primal / dual pair
    let s = vec![1.; problem.ncons()];
    let z: Vec<f64> = (0..problem.ncons()).map(|i| 0.5 + 0.1 * i as f64).collect();
    let mut W = NonnegativeScaling::new(problem.ncons());
    W.update_scaling(&s, &z).unwrap();

    let mut solver = SupportedKKTSolver::new(&problem, &settings).unwrap();
    let F = solver.factor(&W).unwrap();

    // right hand side (-q, 0)
    let mut x = problem.q.clone();
    x.negate();
    let mut z = vec![0.; problem.ncons()];
    F.solve(&mut x, &mut [], &mut z, &settings).unwrap();

    println!("dx = {:?}", x);
    println!("W dz = {:?}", z);
}
