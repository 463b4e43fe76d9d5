//! This module provides the interface to the solver.
//!
//! A [SolverBackend] opens [SolverSession]s. A session mirrors the small set of
//! callable library operations the gpx layer needs: build a problem row by row
//! and column by column, or read it from a file, optimize it as an LP or a MIP,
//! fetch the solution and write the problem or the solution back to files.
//!
//! The CPLEX backend drives the `cplex` interactive optimizer, which needs to be
//! installed on your system. It is available with the `cplex` feature, enabled
//! by default.

use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::SolverError;
use crate::lp_format::LpObjective;
use crate::model::{Column, Element, Model, ObjectiveCoef, Row};

#[cfg(feature = "cplex")]
pub use self::cplex::*;

#[cfg(feature = "cplex")]
pub mod cplex;

/// Outcome of an optimization
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Status {
    /// Optimal solution found
    Optimal,
    /// A feasible solution was found, but a limit stopped the search
    SubOptimal,
    /// No feasible solution exists
    Infeasible,
    /// The objective is unbounded
    Unbounded,
    /// Nothing useful came out of the solver
    NotSolved,
}

impl Status {
    /// Map a CPLEX solution status code (CPX_STAT_* and CPXMIP_*)
    pub fn from_cplex_code(code: i32) -> Status {
        match code {
            1 | 101 | 102 => Status::Optimal,
            5 | 10 | 11 | 12 | 104 | 105 | 107 | 109 | 111 | 113 => Status::SubOptimal,
            3 | 103 => Status::Infeasible,
            2 | 118 => Status::Unbounded,
            // "infeasible or unbounded" and limits hit before any integer solution
            _ => Status::NotSolved,
        }
    }
}

/// Solution values of a row
#[derive(Debug, Clone, PartialEq)]
pub struct RowSolution {
    /// Row name
    pub name: String,
    /// Dual price, 0 for MIP solutions
    pub dual: f64,
    /// Slack of the constraint
    pub slack: f64,
}

/// Solution values of a column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSolution {
    /// Column name
    pub name: String,
    /// Value of the variable
    pub value: f64,
    /// Reduced cost, 0 for MIP solutions
    pub reduced_cost: f64,
}

/// What the solver returned
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// How the optimization ended
    pub status: Status,
    /// Value of the objective function
    pub objective_value: f64,
    /// One entry per row, in index order
    pub rows: Vec<RowSolution>,
    /// One entry per column, in index order
    pub columns: Vec<ColumnSolution>,
}

impl Solution {
    /// A solution with no rows and no columns
    pub fn new(status: Status, objective_value: f64) -> Solution {
        Solution {
            status,
            objective_value,
            rows: vec![],
            columns: vec![],
        }
    }

    /// Drop the dual information, keeping values and slacks
    pub fn without_duals(mut self) -> Solution {
        for row in self.rows.iter_mut() {
            row.dual = 0.;
        }
        for col in self.columns.iter_mut() {
            col.reduced_cost = 0.;
        }
        self
    }
}

/// Model file formats understood by the solver
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    /// Binary matrix and basis file
    Sav,
    /// MPS format
    Mps,
    /// CPLEX LP format
    Lp,
    /// MPS format with generic names (write only)
    Rew,
    /// LP format with generic names, types and bounds (write only)
    Alp,
}

impl FileType {
    /// Name of the format for the solver
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Sav => "sav",
            FileType::Mps => "mps",
            FileType::Lp => "lp",
            FileType::Rew => "rew",
            FileType::Alp => "alp",
        }
    }

    /// Whether a model can be read from this format
    pub fn is_readable(self) -> bool {
        matches!(self, FileType::Sav | FileType::Mps | FileType::Lp)
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SAV" => Ok(FileType::Sav),
            "MPS" => Ok(FileType::Mps),
            "LP" => Ok(FileType::Lp),
            "REW" => Ok(FileType::Rew),
            "ALP" => Ok(FileType::Alp),
            _ => Err(format!("unknown file type '{}'", s)),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Creates solver sessions
pub trait SolverBackend {
    /// Session type returned by [SolverBackend::create_prob]
    type Session: SolverSession;

    /// Open a session holding an empty problem with the given name
    fn create_prob(&self, name: &str) -> Result<Self::Session, SolverError>;
}

/// A problem living inside the solver
pub trait SolverSession {
    /// Whether the solver should print its own log
    fn output_to_screen(&mut self, echo: bool) -> Result<(), SolverError>;
    /// Rename the problem
    fn change_problem_name(&mut self, name: &str) -> Result<(), SolverError>;
    /// Minimize (the default) or maximize
    fn change_objective_sense(&mut self, sense: LpObjective) -> Result<(), SolverError>;
    /// Append rows
    fn new_rows(&mut self, rows: &[Row]) -> Result<(), SolverError>;
    /// Append columns, with objective coefficients indexed relative to `cols`
    fn new_cols(&mut self, objective: &[ObjectiveCoef], cols: &[Column]) -> Result<(), SolverError>;
    /// Set non-zero coefficients of existing rows and columns
    fn change_coefficients(&mut self, elements: &[Element]) -> Result<(), SolverError>;
    /// Solve as a linear problem; only continuous columns are allowed
    fn lp_opt(&mut self) -> Result<(), SolverError>;
    /// Solve as a mixed integer problem
    fn mip_opt(&mut self) -> Result<(), SolverError>;
    /// Solution of the last LP solve, dual values included
    fn solution(&self) -> Result<Solution, SolverError>;
    /// Solution of the last solve without dual values, valid for LPs and MIPs
    fn mip_solution(&self) -> Result<Solution, SolverError>;
    /// Number of rows in the problem
    fn num_rows(&self) -> Result<usize, SolverError>;
    /// Number of columns in the problem
    fn num_cols(&self) -> Result<usize, SolverError>;
    /// Row names in index order
    fn row_names(&self) -> Result<Vec<String>, SolverError>;
    /// Column names in index order
    fn col_names(&self) -> Result<Vec<String>, SolverError>;
    /// Replace the problem with the content of a model file
    fn read_copy_prob(&mut self, path: &Path, file_type: FileType) -> Result<(), SolverError>;
    /// Write the problem to a file
    fn write_prob(&self, path: &Path, file_type: FileType) -> Result<(), SolverError>;
    /// Write the last solution to a file
    fn sol_write(&self, path: &Path) -> Result<(), SolverError>;
    /// Release the problem; the session cannot be used afterwards
    fn close(&mut self) -> Result<(), SolverError>;

    /// Objective value of the last solve
    fn objective_value(&self) -> Result<f64, SolverError> {
        Ok(self.mip_solution()?.objective_value)
    }

    /// Column values of the last solve
    fn x(&self) -> Result<Vec<f64>, SolverError> {
        Ok(self.mip_solution()?.columns.iter().map(|c| c.value).collect())
    }

    /// Row slacks of the last solve
    fn slack(&self) -> Result<Vec<f64>, SolverError> {
        Ok(self.mip_solution()?.rows.iter().map(|r| r.slack).collect())
    }

    /// Hand a gpx model to the solver: rows, then columns, then coefficients
    fn load_model(&mut self, model: &Model) -> Result<(), SolverError> {
        self.new_rows(&model.rows)?;
        self.new_cols(&model.objective, &model.columns)?;
        if !model.elements.is_empty() {
            self.change_coefficients(&model.elements)?;
        }
        Ok(())
    }

    /// Solve as a MIP or an LP and fetch the matching solution
    fn optimize(&mut self, mip: bool) -> Result<Solution, SolverError> {
        if mip {
            self.mip_opt()?;
            self.mip_solution()
        } else {
            self.lp_opt()?;
            self.solution()
        }
    }
}

/// A solver reached through its command-line program
pub trait SolverProgram {
    /// Name of the executable
    fn command_name(&self) -> &str;
    /// Arguments that make the program solve `lp_file` and write `solution_file`
    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString>;
    /// Status inferred from the program output, when it writes no solution
    fn parse_stdout_status(&self, _stdout: &[u8]) -> Option<Status> {
        None
    }
    /// Extension the program expects on the solution file name
    fn solution_suffix(&self) -> Option<&str> {
        None
    }
}

/// Solvers whose solution files can be parsed
pub trait SolverWithSolutionParsing {
    /// Read the solution file at the given path
    fn read_solution(&self, solution_file: &Path) -> Result<Solution, SolverError> {
        let f = File::open(solution_file)?;
        self.read_specific_solution(f)
    }
    /// Read a solution in the solver's format
    fn read_specific_solution<R: Read>(&self, f: R) -> Result<Solution, SolverError>;
}
