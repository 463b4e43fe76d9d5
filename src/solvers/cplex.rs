//! The IBM CPLEX optimizer.
//! You need to activate the "cplex" feature of this crate to use this solver.
//!
//! Sessions stage the problem in memory. Each optimization writes it to a
//! temporary .lp file and runs the interactive optimizer on it with a command
//! script, then reads the XML solution file it wrote.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use tempfile::NamedTempFile;
use xml::attribute::OwnedAttribute;
use xml::reader::XmlEvent;
use xml::EventReader;

use crate::error::SolverError;
use crate::lp_format::LpObjective;
use crate::model::{Column, Element, ObjectiveCoef, Row};
use crate::problem::Problem;
use crate::solvers::{
    ColumnSolution, FileType, RowSolution, Solution, SolverBackend, SolverProgram, SolverSession,
    SolverWithSolutionParsing, Status,
};
use crate::util::buf_contains;

/// Name used when a problem is created without one
pub const DEFAULT_PROBLEM_NAME: &str = "DefaultName";
/// Name used when a problem is renamed to an empty name
pub const DEFAULT_CHANGED_NAME: &str = "ChangedDefaultName";

/// IBM cplex optimizer
#[derive(Debug, Clone)]
pub struct Cplex {
    command: String,
}

impl Default for Cplex {
    fn default() -> Self {
        Self {
            command: "cplex".into(),
        }
    }
}

impl Cplex {
    /// Create a cplex solver from the given binary
    pub fn with_command(command: String) -> Self {
        Self { command }
    }

    /// Name of the cplex executable
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl SolverBackend for Cplex {
    type Session = CplexSession;

    fn create_prob(&self, name: &str) -> Result<CplexSession, SolverError> {
        let name = if name.is_empty() {
            DEFAULT_PROBLEM_NAME
        } else {
            name
        };
        log::info!("creating problem '{}' for {}", name, self.command);
        Ok(CplexSession {
            solver: self.clone(),
            echo: false,
            problem: Problem::new(name),
            sense_changed: false,
            source: None,
            last: None,
            closed: false,
        })
    }
}

macro_rules! format_osstr {
    ($($parts:expr),*) => {{
        let mut s = OsString::new();
        $(s.push($parts);)*
        s
    }}
}

#[derive(Debug)]
struct LastSolve {
    mip: bool,
    status: Status,
    solution: Option<Solution>,
    solution_file: NamedTempFile,
}

/// A problem handled by the cplex interactive optimizer
#[derive(Debug)]
pub struct CplexSession {
    solver: Cplex,
    echo: bool,
    problem: Problem,
    sense_changed: bool,
    /// Model file given to [SolverSession::read_copy_prob], if any
    source: Option<(PathBuf, FileType)>,
    last: Option<LastSolve>,
    closed: bool,
}

impl CplexSession {
    /// The problem staged in this session
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    fn check_open(&self) -> Result<(), SolverError> {
        if self.closed {
            Err(SolverError::Closed)
        } else {
            Ok(())
        }
    }

    fn check_modifiable(&self) -> Result<(), SolverError> {
        self.check_open()?;
        match &self.source {
            Some((path, _)) => Err(SolverError::ReadOnlyProblem(path.clone())),
            None => Ok(()),
        }
    }

    /// The model file to hand to cplex. The temporary file, if any, must outlive the run.
    fn model_file(&self) -> Result<(PathBuf, FileType, Option<NamedTempFile>), SolverError> {
        match &self.source {
            Some((path, file_type)) => Ok((path.clone(), *file_type, None)),
            None => {
                if self.problem.num_cols() == 0 {
                    return Err(SolverError::NoProblem);
                }
                let f = self.problem.to_tmp_file()?;
                Ok((f.path().to_path_buf(), FileType::Lp, Some(f)))
            }
        }
    }

    fn read_commands(&self, model_file: &Path, file_type: FileType) -> Vec<OsString> {
        let mut args = vec![
            "-c".into(),
            "set read datacheck 1".into(),
            format_osstr!("read \"", model_file, "\" ", file_type.as_str()),
        ];
        // Staged problems carry their sense in the .lp file
        if self.source.is_some() && self.sense_changed {
            let sense = match self.problem.sense {
                LpObjective::Minimize => "min",
                LpObjective::Maximize => "max",
            };
            args.push(format!("change sense obj {}", sense).into());
        }
        args
    }

    fn run(&self, args: Vec<OsString>) -> Result<Vec<u8>, SolverError> {
        let command = self.command_name();
        log::info!("running {} {:?}", command, args);
        let output = Command::new(command)
            .args(args)
            .output()
            .map_err(|source| SolverError::Launch {
                command: command.to_string(),
                source,
            })?;
        if self.echo {
            io::stdout().write_all(&output.stdout)?;
            io::stdout().flush()?;
        } else {
            log::debug!("{}", String::from_utf8_lossy(&output.stdout));
        }
        if !output.status.success() {
            return Err(SolverError::ProgramFailed {
                command: command.to_string(),
                status: output.status.to_string(),
            });
        }
        Ok(output.stdout)
    }

    fn optimize_with(&mut self, mip: bool) -> Result<(), SolverError> {
        self.check_open()?;
        if !mip && self.source.is_none() && self.problem.is_mip() {
            return Err(SolverError::NotForMip);
        }
        let (model_file, file_type, _staged) = self.model_file()?;
        let solution_file = tempfile::Builder::new()
            .prefix("gpx_solution")
            .suffix(self.solution_suffix().unwrap_or(""))
            .tempfile()?;
        self.last = None;

        let stdout = self.run(self.arguments_for(&model_file, file_type, solution_file.path()))?;

        let has_solution = fs::metadata(solution_file.path())?.len() > 0;
        let (status, solution) = if has_solution {
            let solution = self.read_solution(solution_file.path())?;
            (solution.status, Some(solution))
        } else {
            let status = self.parse_stdout_status(&stdout).unwrap_or(Status::NotSolved);
            (status, None)
        };
        log::info!("{} finished with status {:?}", self.command_name(), status);
        self.last = Some(LastSolve {
            mip,
            status,
            solution,
            solution_file,
        });
        Ok(())
    }

    fn arguments_for(&self, model_file: &Path, file_type: FileType, solution_file: &Path) -> Vec<OsString> {
        let mut args = self.read_commands(model_file, file_type);
        args.push("optimize".into());
        args.push(format_osstr!("write \"", solution_file, "\" sol"));
        args
    }

    fn last_solution(&self) -> Result<&LastSolve, SolverError> {
        self.check_open()?;
        self.last
            .as_ref()
            .ok_or(SolverError::NoSolution(Status::NotSolved))
    }
}

impl SolverProgram for CplexSession {
    fn command_name(&self) -> &str {
        &self.solver.command
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString> {
        self.arguments_for(lp_file, FileType::Lp, solution_file)
    }

    fn parse_stdout_status(&self, stdout: &[u8]) -> Option<Status> {
        let stdout = stdout.to_ascii_lowercase();
        if buf_contains(&stdout, "no solution exists") || buf_contains(&stdout, "infeasible") {
            Some(Status::Infeasible)
        } else if buf_contains(&stdout, "unbounded") {
            Some(Status::Unbounded)
        } else {
            None
        }
    }

    fn solution_suffix(&self) -> Option<&str> {
        Some(".sol")
    }
}

impl SolverSession for CplexSession {
    fn output_to_screen(&mut self, echo: bool) -> Result<(), SolverError> {
        self.check_open()?;
        self.echo = echo;
        Ok(())
    }

    fn change_problem_name(&mut self, name: &str) -> Result<(), SolverError> {
        self.check_open()?;
        self.problem.name = if name.is_empty() {
            DEFAULT_CHANGED_NAME.to_string()
        } else {
            name.to_string()
        };
        Ok(())
    }

    fn change_objective_sense(&mut self, sense: LpObjective) -> Result<(), SolverError> {
        self.check_open()?;
        self.problem.sense = sense;
        self.sense_changed = true;
        Ok(())
    }

    fn new_rows(&mut self, rows: &[Row]) -> Result<(), SolverError> {
        self.check_modifiable()?;
        self.problem.new_rows(rows)
    }

    fn new_cols(&mut self, objective: &[ObjectiveCoef], cols: &[Column]) -> Result<(), SolverError> {
        self.check_modifiable()?;
        self.problem.new_cols(objective, cols)
    }

    fn change_coefficients(&mut self, elements: &[Element]) -> Result<(), SolverError> {
        self.check_modifiable()?;
        self.problem.change_coefficients(elements)
    }

    fn lp_opt(&mut self) -> Result<(), SolverError> {
        self.optimize_with(false)
    }

    fn mip_opt(&mut self) -> Result<(), SolverError> {
        self.optimize_with(true)
    }

    fn solution(&self) -> Result<Solution, SolverError> {
        let last = self.last_solution()?;
        if last.mip {
            return Err(SolverError::NotForMip);
        }
        last.solution.clone().ok_or(SolverError::NoSolution(last.status))
    }

    fn mip_solution(&self) -> Result<Solution, SolverError> {
        let last = self.last_solution()?;
        match &last.solution {
            Some(solution) => Ok(solution.clone().without_duals()),
            None => Err(SolverError::NoSolution(last.status)),
        }
    }

    fn num_rows(&self) -> Result<usize, SolverError> {
        Ok(self.row_names()?.len())
    }

    fn num_cols(&self) -> Result<usize, SolverError> {
        Ok(self.col_names()?.len())
    }

    fn row_names(&self) -> Result<Vec<String>, SolverError> {
        self.check_open()?;
        if self.source.is_none() {
            return Ok(self.problem.rows().iter().map(|r| r.name.clone()).collect());
        }
        // Only the solver knows what the file contained
        Ok(self
            .last
            .as_ref()
            .and_then(|l| l.solution.as_ref())
            .map(|s| s.rows.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default())
    }

    fn col_names(&self) -> Result<Vec<String>, SolverError> {
        self.check_open()?;
        if self.source.is_none() {
            return Ok(self.problem.columns().iter().map(|c| c.name.clone()).collect());
        }
        Ok(self
            .last
            .as_ref()
            .and_then(|l| l.solution.as_ref())
            .map(|s| s.columns.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default())
    }

    fn read_copy_prob(&mut self, path: &Path, file_type: FileType) -> Result<(), SolverError> {
        self.check_open()?;
        if !file_type.is_readable() {
            return Err(SolverError::UnsupportedFileType(file_type.to_string(), "reading"));
        }
        if !path.is_file() {
            return Err(SolverError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("model file {} not found", path.display()),
            )));
        }
        let name = std::mem::take(&mut self.problem.name);
        self.problem = Problem::new(&name);
        self.sense_changed = false;
        self.source = Some((path.to_path_buf(), file_type));
        self.last = None;
        Ok(())
    }

    fn write_prob(&self, path: &Path, file_type: FileType) -> Result<(), SolverError> {
        self.check_open()?;
        let (model_file, model_type, _staged) = self.model_file()?;
        // success is judged by the file appearing, so a stale one must go
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
        let mut args = self.read_commands(&model_file, model_type);
        args.push(format_osstr!("write \"", path, "\" ", file_type.as_str()));
        let stdout = self.run(args)?;
        if !path.exists() {
            return Err(SolverError::ProgramFailed {
                command: self.command_name().to_string(),
                status: String::from_utf8_lossy(&stdout).trim().to_string(),
            });
        }
        Ok(())
    }

    fn sol_write(&self, path: &Path) -> Result<(), SolverError> {
        let last = self.last_solution()?;
        if last.solution.is_none() {
            return Err(SolverError::NoSolution(last.status));
        }
        fs::copy(last.solution_file.path(), path)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SolverError> {
        self.check_open()?;
        log::info!("closing problem '{}'", self.problem.name);
        self.last = None;
        self.closed = true;
        Ok(())
    }
}

impl SolverWithSolutionParsing for CplexSession {
    fn read_specific_solution<R: Read>(&self, f: R) -> Result<Solution, SolverError> {
        read_cplex_solution(f)
    }
}

/// Parse a CPLEX XML solution file.
///
/// Only the first solution is read. Dual values and reduced costs are absent from
/// MIP solutions and read as 0.
pub fn read_cplex_solution<R: Read>(f: R) -> Result<Solution, SolverError> {
    let parser = EventReader::new(f);
    let mut solution = Solution::new(Status::NotSolved, 0.);
    let mut seen_header = false;
    for e in parser {
        match e {
            Ok(XmlEvent::StartElement {
                name, attributes, ..
            }) => match name.local_name.as_str() {
                "header" => {
                    seen_header = true;
                    for attr in &attributes {
                        match attr.name.local_name.as_str() {
                            "objectiveValue" => solution.objective_value = parse_attr(attr)?,
                            "solutionStatusValue" => {
                                solution.status = Status::from_cplex_code(parse_attr(attr)?)
                            }
                            _ => {}
                        }
                    }
                }
                "constraint" => {
                    let mut row = RowSolution {
                        name: String::new(),
                        dual: 0.,
                        slack: 0.,
                    };
                    for attr in &attributes {
                        match attr.name.local_name.as_str() {
                            "name" => row.name = attr.value.clone(),
                            "slack" => row.slack = parse_attr(attr)?,
                            "dual" => row.dual = parse_attr(attr)?,
                            _ => {}
                        }
                    }
                    solution.rows.push(row);
                }
                "variable" => {
                    let mut col = ColumnSolution {
                        name: String::new(),
                        value: 0.,
                        reduced_cost: 0.,
                    };
                    for attr in &attributes {
                        match attr.name.local_name.as_str() {
                            "name" => col.name = attr.value.clone(),
                            "value" => col.value = parse_attr(attr)?,
                            "reducedCost" => col.reduced_cost = parse_attr(attr)?,
                            _ => {}
                        }
                    }
                    solution.columns.push(col);
                }
                _ => {}
            },
            Ok(XmlEvent::EndElement { name }) if name.local_name == "CPLEXSolution" => break,
            Err(e) => return Err(SolverError::SolutionFormat(format!("xml error: {}", e))),
            _ => {}
        }
    }
    if !seen_header {
        return Err(SolverError::SolutionFormat("no solution header".to_string()));
    }
    Ok(solution)
}

fn parse_attr<T>(attr: &OwnedAttribute) -> Result<T, SolverError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    attr.value.parse().map_err(|e| {
        SolverError::SolutionFormat(format!(
            "invalid value '{}' for {}: {}",
            attr.value, attr.name.local_name, e
        ))
    })
}
