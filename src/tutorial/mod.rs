//! Interactive tutorial showing how a gpx model reaches the solver.
//!
//! The main menu runs two complete examples: one builds the problem from the
//! gpx data structures, the other reads it from a model file. The function
//! exerciser menu (toggled with `g`) calls every session operation on its
//! own, against the currently loaded gpx model.
//!
//! [Tutorial] works on any [BufRead] input and any [Write] output, so it can be
//! scripted.
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use crate::model::Model;
use crate::solvers::{FileType, Solution, SolverBackend, SolverSession};

pub use self::config::TutorialConfig;

pub mod config;
mod exerciser;

/// State of an interactive tutorial session
pub struct Tutorial<B: SolverBackend, I, O> {
    backend: B,
    config: TutorialConfig,
    input: I,
    output: O,
    model: Model,
    solution: Option<Solution>,
    session: Option<B::Session>,
    exerciser_on: bool,
    custom_env_on: bool,
}

impl<B: SolverBackend, I: BufRead, O: Write> Tutorial<B, I, O> {
    /// Tutorial reading answers from `input` and printing to `output`
    pub fn new(backend: B, config: TutorialConfig, input: I, output: O) -> Self {
        let exerciser_on = config.exerciser;
        let custom_env_on = config.custom_env;
        Tutorial {
            backend,
            config,
            input,
            output,
            model: Model::default(),
            solution: None,
            session: None,
            exerciser_on,
            custom_env_on,
        }
    }

    /// The gpx model currently loaded
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The last solution retrieved
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// The session opened from the exerciser menu, if any
    pub fn session(&self) -> Option<&B::Session> {
        self.session.as_ref()
    }

    /// Give back the output stream
    pub fn into_output(self) -> O {
        self.output
    }

    /// Run the menu loop until the user exits or the input ends
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "\nTUTORIAL AND EXERCISER FOR GPX FUNCTIONS.")?;
        self.print_options()?;
        while let Some(option) = self.prompt("\nEnter a new option: ")? {
            if !self.execute(&option)? {
                return Ok(());
            }
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Handle one menu option. Returns false when the user asked to exit.
    ///
    /// Failures of the option itself are printed and do not stop the menu;
    /// only errors writing to the output are returned.
    pub fn execute(&mut self, option: &str) -> Result<bool> {
        match option {
            "0" => {
                writeln!(self.output, "\n===> NORMAL PROGRAM TERMINATION <===\n")?;
                return Ok(false);
            }
            "g" => {
                self.exerciser_on = !self.exerciser_on;
                if self.exerciser_on {
                    writeln!(self.output, "\nFunction exerciser menu enabled.")?;
                    self.print_options()?;
                } else {
                    writeln!(self.output, "\nFunction exerciser menu disabled.")?;
                }
            }
            "c" => {
                self.custom_env_on = !self.custom_env_on;
                if self.custom_env_on {
                    writeln!(
                        self.output,
                        "\nCustom environment enabled: file names are read from '{}' with extension '{}'.",
                        self.config.custom_dir.display(),
                        self.config.extension
                    )?;
                } else {
                    writeln!(
                        self.output,
                        "\nCustom environment disabled: file names are used as entered."
                    )?;
                }
            }
            "1" => {
                let result = self.solve_from_structures();
                self.report(result, "\nExample of solving a problem from data structures completed.")?;
            }
            "2" => {
                let result = self.solve_from_file();
                self.report(result, "\nExample of solving a problem from a data file completed.")?;
            }
            "3" => {
                self.reset();
                writeln!(self.output, "\nAll data structures have been initialized.")?;
            }
            "4" => {
                self.model.clear();
                let result = self.read_gpx_file();
                self.report(result, "\nData structures successfully populated from file.")?;
            }
            "5" => {
                self.print_input()?;
                writeln!(self.output, "\nDisplay of input data structures completed.")?;
            }
            "6" => {
                self.print_solution(false)?;
                writeln!(self.output, "\nDisplay of solution completed.")?;
            }
            _ => {
                if self.exerciser_on {
                    if let Some(result) = self.run_exerciser(option) {
                        self.report(result, "")?;
                        return Ok(true);
                    }
                }
                writeln!(self.output, "\nUnsupported option '{}'.", option)?;
                self.print_options()?;
            }
        }
        Ok(true)
    }

    fn print_options(&mut self) -> Result<()> {
        writeln!(self.output, "\nAvailable options (0 to exit):\n")?;
        writeln!(
            self.output,
            "  g - toggle function exerciser menu      c - toggle custom environment\n"
        )?;
        writeln!(self.output, "  1 - solve a problem from data structures")?;
        writeln!(self.output, "  2 - solve a problem from a data file")?;
        writeln!(self.output, "  3 - initialize data structures")?;
        writeln!(self.output, "  4 - populate data structures from a gpx file")?;
        writeln!(self.output, "  5 - display input data structures")?;
        writeln!(self.output, "  6 - display solution")?;
        if self.exerciser_on {
            writeln!(self.output, "\nFunction exerciser:\n")?;
            for chunk in exerciser::FUNCTIONS.chunks(3) {
                let line: Vec<String> = chunk
                    .iter()
                    .map(|(option, name)| format!("{:>4} - {:<24}", option, name))
                    .collect();
                writeln!(self.output, "{}", line.concat().trim_end())?;
            }
        }
        Ok(())
    }

    fn report(&mut self, result: Result<()>, success: &str) -> Result<()> {
        match result {
            Ok(()) if success.is_empty() => {}
            Ok(()) => writeln!(self.output, "{}", success)?,
            Err(e) => {
                log::error!("{:#}", e);
                writeln!(self.output, "\nERROR: {:#}", e)?;
            }
        }
        Ok(())
    }

    /// Forget the gpx model and the last solution
    pub fn reset(&mut self) {
        self.model.clear();
        self.solution = None;
    }

    fn solve_from_structures(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "\nThis example builds the problem in the solver from the gpx data structures,\n\
             after populating them from a gpx file.\n"
        )?;
        self.reset();
        self.read_gpx_file()?;
        let echo = self.ask_echo()?;
        let name = self.model.name.clone();
        let mut session = self.create_session(&name, echo)?;

        self.step("new_rows", "create rows in the solver")?;
        session
            .new_rows(&self.model.rows)
            .context("Failed to create new rows")?;
        self.step("new_cols", "create columns in the solver")?;
        session
            .new_cols(&self.model.objective, &self.model.columns)
            .context("Failed to create new columns")?;
        if !self.model.elements.is_empty() {
            self.step("change_coefficients", "set the non-zero coefficients")?;
            session
                .change_coefficients(&self.model.elements)
                .context("Failed to change coefficients")?;
        }

        let is_mip = self.model.is_mip();
        self.finish_solve(session, is_mip, echo)
    }

    fn solve_from_file(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "\nThis example reads the problem from a model file (SAV, MPS or LP)\n\
             and solves it.\n"
        )?;
        self.reset();
        let name = self.ask("Enter the name of the problem: ")?;
        self.model.name = name.clone();
        let is_mip = self.ask_yes_no("Is the problem a mixed integer problem [Y|N]: ")?;
        let echo = self.ask_echo()?;
        let mut session = self.create_session(&name, echo)?;

        let path = self.ask_path("Enter the name of the data file: ")?;
        let file_type = self.ask_file_type("Enter the file type (SAV, MPS, LP): ")?;
        self.step("read_copy_prob", &format!("read the problem from '{}'", path.display()))?;
        session
            .read_copy_prob(&path, file_type)
            .context("Failed to read the problem from the data file")?;

        self.finish_solve(session, is_mip, echo)
    }

    fn create_session(&mut self, name: &str, echo: bool) -> Result<B::Session> {
        self.step(
            "create_prob",
            &format!("initialize the environment for problem '{}'", name),
        )?;
        let mut session = self
            .backend
            .create_prob(name)
            .context("Failed to initialize the environment")?;
        self.step("output_to_screen", &format!("set echo to {}", echo))?;
        session
            .output_to_screen(echo)
            .context("Failed to set the solver display")?;
        Ok(session)
    }

    /// Optimize, show the solution, offer to save it and the model, then close
    fn finish_solve(&mut self, mut session: B::Session, is_mip: bool, echo: bool) -> Result<()> {
        let solution = if is_mip {
            self.step("mip_opt", "solve the mixed integer problem")?;
            session.mip_opt().context("Failed to optimize the MIP")?;
            if echo {
                writeln!(self.output)?;
            }
            self.step("mip_solution", "fetch the solution")?;
            session.mip_solution().context("Failed to get the MIP solution")?
        } else {
            self.step("lp_opt", "solve the linear problem")?;
            session.lp_opt().context("Failed to optimize the LP")?;
            if echo {
                writeln!(self.output)?;
            }
            self.step("solution", "fetch the solution")?;
            session.solution().context("Failed to get the LP solution")?
        };
        self.solution = Some(solution);
        self.print_solution(true)?;

        if self.ask_yes_no("\nSave the solution to a file [Y|N]: ")? {
            let path = self.ask_path("Enter the name of the solution file: ")?;
            self.step("sol_write", &format!("write the solution to '{}'", path.display()))?;
            session
                .sol_write(&path)
                .context("Failed to write the solution file")?;
        }
        if self.ask_yes_no("Save the model to a file [Y|N]: ")? {
            let path = self.ask_path("Enter the name of the model file: ")?;
            let file_type = self.ask_file_type("Enter the file type (SAV, MPS, LP, REW, ALP): ")?;
            self.step("write_prob", &format!("write the model to '{}'", path.display()))?;
            session
                .write_prob(&path, file_type)
                .context("Failed to write the model file")?;
        }

        self.step("close", "release the problem")?;
        session.close().context("Failed to close the solver session")?;
        Ok(())
    }

    fn read_gpx_file(&mut self) -> Result<()> {
        let path = self.ask_path("Enter the name of the gpx file: ")?;
        let summary = self.model.read_gpx_file(&path)?;
        if !summary.terminated {
            writeln!(
                self.output,
                "WARNING: end of data token missing, {} lines read.",
                summary.lines_read
            )?;
        }
        Ok(())
    }

    fn step(&mut self, operation: &str, what: &str) -> Result<()> {
        log::info!("running {}", operation);
        writeln!(self.output, "Running {:<20} - {}...", operation, what)?;
        Ok(())
    }

    /// Print the gpx model
    fn print_input(&mut self) -> Result<()> {
        let model = self.model.clone();
        writeln!(self.output, "\nProblem name: {}", model.name)?;
        writeln!(
            self.output,
            "{} rows, {} columns, {} non-zero elements, {} objective coefficients{}",
            model.rows.len(),
            model.columns.len(),
            model.elements.len(),
            model.objective.len(),
            if model.is_mip() { ", mixed integer" } else { "" }
        )?;

        let mut listed = 0;
        if !model.objective.is_empty() {
            writeln!(self.output, "\nObjective:\n{:>8} {:>15}", "Column", "Coefficient")?;
            for coef in &model.objective {
                writeln!(self.output, "{:>8} {:>15}", coef.col, coef.value)?;
                if !self.pause(&mut listed)? {
                    return Ok(());
                }
            }
        }
        if !model.rows.is_empty() {
            writeln!(
                self.output,
                "\nRows:\n{:<16} {:>5} {:>15} {:>15}",
                "Name", "Sense", "Rhs", "Range"
            )?;
            for row in &model.rows {
                writeln!(
                    self.output,
                    "{:<16} {:>5} {:>15} {:>15}",
                    row.name, row.sense, row.rhs, row.range_value
                )?;
                if !self.pause(&mut listed)? {
                    return Ok(());
                }
            }
        }
        if !model.columns.is_empty() {
            writeln!(
                self.output,
                "\nColumns:\n{:<16} {:>4} {:>15} {:>15}",
                "Name", "Type", "Lower", "Upper"
            )?;
            for col in &model.columns {
                writeln!(
                    self.output,
                    "{:<16} {:>4} {:>15} {:>15}",
                    col.name, col.column_type, col.lower_bound, col.upper_bound
                )?;
                if !self.pause(&mut listed)? {
                    return Ok(());
                }
            }
        }
        if !model.elements.is_empty() {
            writeln!(
                self.output,
                "\nElements:\n{:>8} {:>8} {:>15}",
                "Row", "Column", "Value"
            )?;
            for elem in &model.elements {
                writeln!(self.output, "{:>8} {:>8} {:>15}", elem.row, elem.col, elem.value)?;
                if !self.pause(&mut listed)? {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Print the last solution; with `ask_details` the rows and columns are
    /// only listed if the user wants them
    fn print_solution(&mut self, ask_details: bool) -> Result<()> {
        let solution = match &self.solution {
            Some(solution) => solution.clone(),
            None => {
                writeln!(self.output, "\nNo solution available.")?;
                return Ok(());
            }
        };
        writeln!(self.output, "\nSolution status: {:?}", solution.status)?;
        writeln!(self.output, "Objective value: {}", solution.objective_value)?;
        if ask_details && !self.ask_yes_no("Display the values of rows and columns [Y|N]: ")? {
            return Ok(());
        }

        let mut listed = 0;
        writeln!(
            self.output,
            "\n{:<16} {:>15} {:>15}",
            "Column", "Value", "Reduced cost"
        )?;
        for col in &solution.columns {
            writeln!(
                self.output,
                "{:<16} {:>15} {:>15}",
                col.name, col.value, col.reduced_cost
            )?;
            if !self.pause(&mut listed)? {
                return Ok(());
            }
        }
        writeln!(self.output, "\n{:<16} {:>15} {:>15}", "Row", "Slack", "Dual")?;
        for row in &solution.rows {
            writeln!(self.output, "{:<16} {:>15} {:>15}", row.name, row.slack, row.dual)?;
            if !self.pause(&mut listed)? {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Count one listed item and wait for the user every `pause_after` items.
    /// Returns false if the listing should stop.
    fn pause(&mut self, listed: &mut usize) -> Result<bool> {
        *listed += 1;
        if self.config.pause_after == 0 || *listed % self.config.pause_after != 0 {
            return Ok(true);
        }
        match self.prompt("-- Press Enter to continue, q to stop: ")? {
            Some(answer) => Ok(!answer.eq_ignore_ascii_case("q")),
            None => Ok(false),
        }
    }

    /// Read one trimmed line, `None` at end of input
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, message: &str) -> Result<String> {
        Ok(self.prompt(message)?.unwrap_or_default())
    }

    fn ask_yes_no(&mut self, message: &str) -> Result<bool> {
        Ok(self.ask(message)?.eq_ignore_ascii_case("y"))
    }

    fn ask_echo(&mut self) -> Result<bool> {
        self.ask_yes_no("Should the solver display its output on the screen [Y|N]: ")
    }

    /// Ask for a file name, completed by the custom environment when it is on
    fn ask_path(&mut self, message: &str) -> Result<PathBuf> {
        let name = self.ask(message)?;
        if name.is_empty() {
            bail!("no file name entered");
        }
        if self.custom_env_on {
            Ok(self.config.custom_path(&name))
        } else {
            Ok(PathBuf::from(name))
        }
    }

    fn ask_file_type(&mut self, message: &str) -> Result<FileType> {
        let answer = self.ask(message)?;
        answer.parse().map_err(|e: String| anyhow!(e))
    }
}
