#![allow(non_snake_case)]

use blockkkt::{algebra::*, solver::*};

// a collection of tests to ensure that data of
// incompatible dimension or shape won't be accepted

fn api_dim_check_data() -> (usize, usize, Matrix<f64>, Vec<f64>) {
    let n = 3;
    let r = 2;
    let K = Matrix::from(&[[2., 1., 0.], [1., 2., 1.], [0., 1., 2.]]);
    let target = vec![0.5; n * r];
    (n, r, K, target)
}

#[test]
fn api_dim_check_working() {
    // This example should work because dimensions are
    // all compatible.  All following checks vary one
    // of these sizes to test dimension checks

    let (n, r, K, target) = api_dim_check_data();
    let settings = KKTSettings::default();
    let problem = GramProblem::new(n, r, K, &target, 1., &settings).unwrap();

    assert_eq!(problem.nvars(), 9);
    assert_eq!(problem.ncons(), 12);
    assert_eq!(problem.cones, [NonnegativeConeT(12)]);

    let mut solver = SupportedKKTSolver::new(&problem, &settings).unwrap();
    assert_eq!(solver.nvars(), 9);
    assert_eq!(solver.ncons(), 12);
    let F = solver.factor(&NonnegativeScaling::new(12)).unwrap();
    assert_eq!((F.nvars(), F.ncons()), (9, 12));
}

#[test]
fn api_dim_check_bad_r() {
    let (n, _r, K, target) = api_dim_check_data();
    let settings = KKTSettings::default();

    for r in [0, n + 1] {
        assert!(matches!(
            GramProblem::new(n, r, K.clone(), &target, 1., &settings),
            Err(KKTError::Dimension(_))
        ));
    }
}

#[test]
fn api_dim_check_bad_gram() {
    let (n, r, _K, target) = api_dim_check_data();
    let settings = KKTSettings::default();

    // wrong size
    let K = Matrix::identity(n + 1);
    assert!(matches!(
        GramProblem::new(n, r, K, &target, 1., &settings),
        Err(KKTError::Shape(_))
    ));

    // asymmetric
    let K = Matrix::from(&[[2., 1., 0.], [0., 2., 1.], [0., 1., 2.]]);
    assert!(matches!(
        GramProblem::new(n, r, K, &target, 1., &settings),
        Err(KKTError::Shape(_))
    ));
}

#[test]
fn api_dim_check_bad_target() {
    let (n, r, K, _target) = api_dim_check_data();
    let settings = KKTSettings::default();
    assert!(matches!(
        GramProblem::new(n, r, K, &[0.; 5], 1., &settings),
        Err(KKTError::Dimension(_))
    ));
}

#[test]
fn api_check_bad_regularization() {
    let (n, r, K, target) = api_dim_check_data();
    let settings = KKTSettings::default();
    for Λ in [0., -1., f64::NAN, f64::INFINITY] {
        assert!(matches!(
            GramProblem::new(n, r, K.clone(), &target, Λ, &settings),
            Err(KKTError::BadParameter(_))
        ));
    }
}

#[test]
fn api_dim_check_bad_scaling() {
    let (n, r, K, target) = api_dim_check_data();
    let settings = KKTSettings::default();
    let problem = GramProblem::new(n, r, K, &target, 1., &settings).unwrap();

    for method in ["structured", "dense"] {
        let settings = KKTSettingsBuilder::default()
            .kkt_solve_method(method.to_string())
            .build()
            .unwrap();
        let mut solver = SupportedKKTSolver::new(&problem, &settings).unwrap();
        assert!(matches!(
            solver.factor(&NonnegativeScaling::new(11)),
            Err(KKTError::Dimension(_))
        ));
    }
}

#[test]
fn api_dim_check_bad_rhs() {
    let (n, r, K, target) = api_dim_check_data();
    let settings = KKTSettings::default();
    let problem = GramProblem::new(n, r, K, &target, 1., &settings).unwrap();
    let mut solver = SupportedKKTSolver::new(&problem, &settings).unwrap();
    let F = solver.factor(&NonnegativeScaling::new(12)).unwrap();

    let (mut x, mut z) = (vec![0.; 8], vec![0.; 12]);
    assert!(matches!(
        F.solve(&mut x, &mut [], &mut z, &settings),
        Err(KKTError::Dimension(_))
    ));

    let (mut x, mut z) = (vec![0.; 9], vec![0.; 13]);
    assert!(matches!(
        F.solve(&mut x, &mut [], &mut z, &settings),
        Err(KKTError::Dimension(_))
    ));

    // inputs are untouched on failure
    assert!(x.iter().chain(z.iter()).all(|&v| v == 0.));
}

#[test]
fn api_check_indefinite_gram() {
    // symmetric but strongly indefinite: K + diag(s) fails for s = 2
    let settings = KKTSettings::default();
    let K = Matrix::from(&[[-10., 0.], [0., 1.]]);
    let problem = GramProblem::new(2, 1, K, &[0.; 2], 1., &settings).unwrap();

    let mut solver = SupportedKKTSolver::new(&problem, &settings).unwrap();
    let err = solver.factor(&NonnegativeScaling::new(4)).unwrap_err();
    assert_eq!(
        err,
        KKTError::Factorization {
            stage: FactorStage::Block(0),
            pivot: 0
        }
    );
    assert!(err.to_string().contains("block 0"));
}

#[test]
fn api_check_bad_settings() {
    let (n, r, K, target) = api_dim_check_data();
    let problem = GramProblem::new(n, r, K, &target, 1., &KKTSettings::default()).unwrap();

    assert!(KKTSettingsBuilder::<f64>::default()
        .kkt_solve_method("sparse_ldl".to_string())
        .build()
        .is_err());

    // settings mutated after construction are checked again
    let mut settings = KKTSettings::default();
    settings.kkt_solve_method = "sparse_ldl".to_string();
    assert!(matches!(
        SupportedKKTSolver::new(&problem, &settings),
        Err(KKTError::BadParameter(_))
    ));

    let mut settings = KKTSettings::default();
    settings.iterative_refinement_reltol = -1.;
    assert!(matches!(
        SupportedKKTSolver::new(&problem, &settings),
        Err(KKTError::BadParameter(_))
    ));
}

#[test]
fn api_check_bad_scaling_values() {
    assert_eq!(
        NonnegativeScaling::from_diagonal(&[1., f64::NAN]).unwrap_err(),
        KKTError::Scaling(1)
    );
    let mut W = NonnegativeScaling::new(2);
    assert_eq!(
        W.update_scaling(&[0., 1.], &[1., 1.]).unwrap_err(),
        KKTError::Scaling(0)
    );
}
