#![allow(non_snake_case)]

use blockkkt::{algebra::*, io::ConfigurablePrintTarget, solver::*};

fn test_print_solver(method: &str) -> (SupportedKKTSolver<f64>, NonnegativeScaling<f64>) {
    let settings = KKTSettingsBuilder::default()
        .verbose(true)
        .kkt_solve_method(method.to_string())
        .build()
        .unwrap();
    let K = Matrix::from(&[[2., 1.], [1., 2.]]);
    let problem = GramProblem::new(2, 2, K, &[1., 0., 0., 1.], 1., &settings).unwrap();
    let solver = SupportedKKTSolver::new(&problem, &settings).unwrap();
    (solver, NonnegativeScaling::new(problem.ncons()))
}

#[test]
fn test_print_to_stdout() {
    let (mut solver, W) = test_print_solver("auto");
    solver.print_to_stdout();
    solver.factor(&W).unwrap();
}

#[test]
fn test_print_to_buffer() {
    let (mut solver, W) = test_print_solver("structured");
    solver.print_to_buffer();
    solver.factor(&W).unwrap();
    let result = solver.get_print_buffer().unwrap();
    assert!(result.contains("structured KKT factor"));

    let (mut solver, W) = test_print_solver("dense");
    solver.print_to_buffer();
    solver.factor(&W).unwrap();
    let result = solver.get_print_buffer().unwrap();
    assert!(result.contains("dense KKT factor: dim = 14, inertia = (6, 8)"));
}

#[test]
fn test_print_to_file() {
    use std::io::{Read, Seek};

    let (mut solver, W) = test_print_solver("auto");
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    solver.print_to_file(file.into_file());
    solver.factor(&W).unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("block factorizations = 1"));
}

#[test]
fn test_print_to_stream() {
    use std::io::{Read, Seek};

    let (mut solver, W) = test_print_solver("dense");
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    solver.print_to_stream(Box::new(file.into_file()));
    solver.factor(&W).unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("dense KKT factor"));
}

#[test]
fn test_print_to_sink() {
    let (mut solver, W) = test_print_solver("auto");
    solver.print_to_sink();
    solver.factor(&W).unwrap();
    assert!(solver.get_print_buffer().is_err());
}
