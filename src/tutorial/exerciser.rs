//! Function exerciser: one menu entry per session operation
use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};

use super::Tutorial;
use crate::lp_format::LpObjective;
use crate::solvers::{SolverBackend, SolverSession};

/// Menu option and operation name of every exerciser entry
pub(crate) const FUNCTIONS: &[(&str, &str)] = &[
    ("61", "change_coefficients"),
    ("62", "change_objective_sense"),
    ("63", "change_problem_name"),
    ("64", "close"),
    ("65", "create_prob"),
    ("66", "col_names"),
    ("67", "mip_solution"),
    ("68", "num_cols"),
    ("69", "num_rows"),
    ("70", "objective_value"),
    ("71", "row_names"),
    ("72", "slack"),
    ("73", "solution"),
    ("74", "x"),
    ("75", "lp_opt"),
    ("76", "mip_opt"),
    ("77", "new_cols"),
    ("78", "new_rows"),
    ("79", "output_to_screen"),
    ("80", "read_copy_prob"),
    ("81", "sol_write"),
    ("82", "write_prob"),
];

fn open<S>(session: &mut Option<S>) -> Result<&mut S> {
    session
        .as_mut()
        .ok_or_else(|| anyhow!("no solver session, run create_prob (65) first"))
}

impl<B: SolverBackend, I: BufRead, O: Write> Tutorial<B, I, O> {
    /// Run the exerciser entry for `option`, `None` if there is no such entry
    pub(super) fn run_exerciser(&mut self, option: &str) -> Option<Result<()>> {
        let (_, operation) = FUNCTIONS.iter().find(|(o, _)| *o == option)?;
        log::debug!("exercising {}", operation);
        Some(
            self.exercise(option)
                .with_context(|| format!("{} failed", operation)),
        )
    }

    fn exercise(&mut self, option: &str) -> Result<()> {
        match option {
            "61" => {
                open(&mut self.session)?.change_coefficients(&self.model.elements)?;
                writeln!(self.output, "{} coefficients set.", self.model.elements.len())?;
            }
            "62" => {
                let answer = self.ask("Enter the objective sense (1 = minimize, -1 = maximize): ")?;
                let sense = match answer.as_str() {
                    "1" => LpObjective::Minimize,
                    "-1" => LpObjective::Maximize,
                    other => bail!("unexpected objective sense '{}'", other),
                };
                open(&mut self.session)?.change_objective_sense(sense)?;
                writeln!(self.output, "Objective sense set to {:?}.", sense)?;
            }
            "63" => {
                let name = self.ask("Enter the new problem name: ")?;
                open(&mut self.session)?.change_problem_name(&name)?;
                writeln!(self.output, "Problem renamed.")?;
            }
            "64" => {
                open(&mut self.session)?.close()?;
                self.session = None;
                writeln!(self.output, "Solver session closed.")?;
            }
            "65" => {
                let session = self.backend.create_prob(&self.model.name)?;
                self.session = Some(session);
                writeln!(self.output, "Problem '{}' created.", self.model.name)?;
            }
            "66" => {
                let names = open(&mut self.session)?.col_names()?;
                self.print_list("Column", names.iter())?;
            }
            "67" => {
                let solution = open(&mut self.session)?.mip_solution()?;
                self.solution = Some(solution);
                self.print_solution(false)?;
            }
            "68" => {
                let count = open(&mut self.session)?.num_cols()?;
                writeln!(self.output, "Number of columns: {}", count)?;
            }
            "69" => {
                let count = open(&mut self.session)?.num_rows()?;
                writeln!(self.output, "Number of rows: {}", count)?;
            }
            "70" => {
                let value = open(&mut self.session)?.objective_value()?;
                writeln!(self.output, "Objective value: {}", value)?;
            }
            "71" => {
                let names = open(&mut self.session)?.row_names()?;
                self.print_list("Row", names.iter())?;
            }
            "72" => {
                let slacks = open(&mut self.session)?.slack()?;
                self.print_list("Slack", slacks.iter())?;
            }
            "73" => {
                let solution = open(&mut self.session)?.solution()?;
                self.solution = Some(solution);
                self.print_solution(false)?;
            }
            "74" => {
                let values = open(&mut self.session)?.x()?;
                self.print_list("Value", values.iter())?;
            }
            "75" => {
                open(&mut self.session)?.lp_opt()?;
                writeln!(self.output, "LP optimization done.")?;
            }
            "76" => {
                open(&mut self.session)?.mip_opt()?;
                writeln!(self.output, "MIP optimization done.")?;
            }
            "77" => {
                open(&mut self.session)?.new_cols(&self.model.objective, &self.model.columns)?;
                writeln!(self.output, "{} columns added.", self.model.columns.len())?;
            }
            "78" => {
                open(&mut self.session)?.new_rows(&self.model.rows)?;
                writeln!(self.output, "{} rows added.", self.model.rows.len())?;
            }
            "79" => {
                let echo = self.ask_echo()?;
                open(&mut self.session)?.output_to_screen(echo)?;
                writeln!(self.output, "Echo set to {}.", echo)?;
            }
            "80" => {
                let path = self.ask_path("Enter the name of the data file: ")?;
                let file_type = self.ask_file_type("Enter the file type (SAV, MPS, LP): ")?;
                open(&mut self.session)?.read_copy_prob(&path, file_type)?;
                writeln!(self.output, "Problem read from '{}'.", path.display())?;
            }
            "81" => {
                let path = self.ask_path("Enter the name of the solution file: ")?;
                open(&mut self.session)?.sol_write(&path)?;
                writeln!(self.output, "Solution written to '{}'.", path.display())?;
            }
            "82" => {
                let path = self.ask_path("Enter the name of the model file: ")?;
                let file_type =
                    self.ask_file_type("Enter the file type (SAV, MPS, LP, REW, ALP): ")?;
                open(&mut self.session)?.write_prob(&path, file_type)?;
                writeln!(self.output, "Model written to '{}'.", path.display())?;
            }
            _ => bail!("no exerciser entry {}", option),
        }
        Ok(())
    }

    /// Numbered listing, pausing like the other listings
    fn print_list<T: std::fmt::Display>(
        &mut self,
        header: &str,
        items: impl Iterator<Item = T>,
    ) -> Result<()> {
        writeln!(self.output, "\n{:>6} {:>16}", "Index", header)?;
        let mut listed = 0;
        for (index, item) in items.enumerate() {
            writeln!(self.output, "{:>6} {:>16}", index, item)?;
            if !self.pause(&mut listed)? {
                break;
            }
        }
        Ok(())
    }
}
