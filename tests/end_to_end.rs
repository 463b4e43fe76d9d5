//! These tests run the CPLEX interactive optimizer, named by the CPLEX_BINARY
//! environment variable (default `cplex`). Run them with `--ignored`.
#![cfg(feature = "cplex")]

use std::io::Write;

use gpx::lp_format::LpObjective;
use gpx::model::Model;
use gpx::solvers::{Cplex, FileType, SolverBackend, SolverSession, Status};
use gpx::SolverError;

fn solver() -> Cplex {
    let command = std::env::var("CPLEX_BINARY").unwrap_or_else(|_| "cplex".to_string());
    Cplex::with_command(command)
}

const INT_PROBLEM: &str = "PROBLEM_NAME: int_problem
OBJECTIVE_START
0 1
1 -1
ROWS_START
c0 L -5 0
COLUMNS_START
x I -10 10
y I -1e30 16.5
ELEMENTS_START
0 0 1
0 1 -1
END_DATA
";

#[test]
#[ignore]
fn solve_lp_from_structures() {
    let model = Model::from_gpx_reader(
        "PROBLEM_NAME: Test1
OBJECTIVE_START
0 1.0
ROWS_START
c1 L 10.0 0.0
COLUMNS_START
x1 C 0.0 100.0
ELEMENTS_START
0 0 1.0
END_DATA
"
        .as_bytes(),
    )
    .unwrap();
    let mut session = solver().create_prob(&model.name).unwrap();
    session.load_model(&model).unwrap();
    session
        .change_objective_sense(LpObjective::Maximize)
        .unwrap();
    let solution = session.optimize(model.is_mip()).unwrap();
    assert_eq!(solution.status, Status::Optimal);
    assert_eq!(solution.objective_value, 10.);
    assert_eq!(session.x().unwrap(), vec![10.]);
    assert_eq!(session.slack().unwrap(), vec![0.]);

    let dir = tempfile::tempdir().unwrap();
    let sol_path = dir.path().join("test1.sol");
    session.sol_write(&sol_path).unwrap();
    assert!(sol_path.is_file());
    session.close().unwrap();
}

#[test]
#[ignore]
fn solve_mip_and_reread_it() {
    let model = Model::from_gpx_reader(INT_PROBLEM.as_bytes()).unwrap();
    let mut session = solver().create_prob(&model.name).unwrap();
    session.load_model(&model).unwrap();
    session
        .change_objective_sense(LpObjective::Maximize)
        .unwrap();
    assert!(matches!(session.lp_opt(), Err(SolverError::NotForMip)));
    session.mip_opt().unwrap();
    assert!(matches!(session.solution(), Err(SolverError::NotForMip)));
    let solution = session.mip_solution().unwrap();
    assert_eq!(solution.status, Status::Optimal);
    assert_eq!(solution.objective_value, -5.);

    let dir = tempfile::tempdir().unwrap();
    let mps = dir.path().join("int_problem.mps");
    session.write_prob(&mps, FileType::Mps).unwrap();
    session.close().unwrap();

    let mut session = solver().create_prob("from_file").unwrap();
    session.read_copy_prob(&mps, FileType::Mps).unwrap();
    session
        .change_objective_sense(LpObjective::Maximize)
        .unwrap();
    session.mip_opt().unwrap();
    assert_eq!(session.objective_value().unwrap(), -5.);
    assert_eq!(session.num_cols().unwrap(), 2);
}

#[test]
#[ignore]
fn infeasible() {
    let mut f = tempfile::Builder::new().suffix(".lp").tempfile().unwrap();
    write!(
        f,
        "Minimize\n obj: x\nSubject To\n c1: x >= 2\n c2: x <= 1\nEnd\n"
    )
    .unwrap();
    f.flush().unwrap();
    let mut session = solver().create_prob("infeasible").unwrap();
    session.read_copy_prob(f.path(), FileType::Lp).unwrap();
    session.lp_opt().unwrap();
    match session.solution() {
        Err(SolverError::NoSolution(status)) => assert_eq!(status, Status::Infeasible),
        Ok(solution) => assert_eq!(solution.status, Status::Infeasible),
        Err(e) => panic!("unexpected error {}", e),
    }
}
