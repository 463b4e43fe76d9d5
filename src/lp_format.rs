//! Write a [Problem] in the CPLEX .lp file format
//!
use std::fmt;
use std::fmt::Formatter;
use std::io::prelude::*;

use tempfile::NamedTempFile;

use crate::error::SolverError;
use crate::model::{ColumnType, Sense};
use crate::problem::Problem;
use crate::util::is_valid_lp_name;

/// Bounds at or beyond this magnitude are infinite for the solver
pub const INFINITE_BOUND: f64 = 1.0e20;

/// Optimization sense
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum LpObjective {
    /// min
    Minimize,
    /// max
    Maximize,
}

/// Implemented by types that can be dumped in the .lp format
pub trait WriteToLpFileFormat {
    /// Write the object to the given formatter in the .lp format
    fn to_lp_file_format(&self, f: &mut fmt::Formatter) -> fmt::Result;

    /// Return an object whose [fmt::Display] implementation is the object in the .lp format
    fn display_lp(&self) -> DisplayedLp<'_, Self>
    where
        Self: Sized,
    {
        DisplayedLp(self)
    }
}

/// A problem whose `Display` implementation outputs valid .lp syntax
pub struct DisplayedLp<'a, P>(&'a P);

impl<'a, P: WriteToLpFileFormat> fmt::Display for DisplayedLp<'a, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.to_lp_file_format(f)
    }
}

impl WriteToLpFileFormat for Problem {
    fn to_lp_file_format(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "\\ {}\n\n", self.name)?;
        objective_lp_file_block(self, f)?;
        write_constraints_lp_file_block(self, f)?;
        write_bounds_lp_file_block(self, f)?;
        write!(f, "\nEnd\n")?;
        Ok(())
    }
}

impl Problem {
    /// Fail if a row or column name cannot be read back from an .lp file
    pub fn check_lp_names(&self) -> Result<(), SolverError> {
        let names = self
            .rows()
            .iter()
            .map(|r| &r.name)
            .chain(self.columns().iter().map(|c| &c.name));
        for name in names {
            if !is_valid_lp_name(name) {
                return Err(SolverError::InvalidName(name.clone()));
            }
        }
        Ok(())
    }

    /// Write the problem to a temporary .lp file, removed when the handle is dropped
    pub fn to_tmp_file(&self) -> Result<NamedTempFile, SolverError> {
        self.check_lp_names()?;
        let mut f = tempfile::Builder::new()
            .prefix("gpx_problem")
            .suffix(".lp")
            .tempfile()?;
        write!(f, "{}", self.display_lp())?;
        f.flush()?;
        Ok(f)
    }
}

fn write_terms(
    prob: &Problem,
    terms: impl Iterator<Item = (usize, f64)>,
    f: &mut Formatter,
) -> fmt::Result {
    let mut first = true;
    for (col, value) in terms {
        let name = &prob.columns()[col].name;
        match (first, value < 0.) {
            (true, false) => write!(f, "{} {}", value, name)?,
            (true, true) => write!(f, "- {} {}", -value, name)?,
            (false, false) => write!(f, " + {} {}", value, name)?,
            (false, true) => write!(f, " - {} {}", -value, name)?,
        }
        first = false;
    }
    // An expression needs at least one variable
    if first {
        if let Some(c) = prob.columns().first() {
            write!(f, "0 {}", c.name)?;
        }
    }
    Ok(())
}

fn objective_lp_file_block(prob: &Problem, f: &mut Formatter) -> fmt::Result {
    let obj_type = match prob.sense {
        LpObjective::Maximize => "Maximize\n  ",
        LpObjective::Minimize => "Minimize\n  ",
    };
    write!(f, "{}obj: ", obj_type)?;
    let terms = prob
        .objective()
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| *v != 0.);
    write_terms(prob, terms, f)
}

fn write_constraints_lp_file_block(prob: &Problem, f: &mut Formatter) -> fmt::Result {
    write!(f, "\n\nSubject To\n")?;
    for (idx, row) in prob.rows().iter().enumerate() {
        write!(f, "  {}: ", row.name)?;
        match row.sense {
            Sense::Range => {
                let (low, up) = if row.range_value < 0. {
                    (row.rhs + row.range_value, row.rhs)
                } else {
                    (row.rhs, row.rhs + row.range_value)
                };
                write!(f, "{} <= ", low)?;
                write_terms(prob, prob.row_terms(idx), f)?;
                write!(f, " <= {}", up)?;
            }
            sense => {
                write_terms(prob, prob.row_terms(idx), f)?;
                let op = match sense {
                    Sense::Less => "<=",
                    Sense::Greater => ">=",
                    _ => "=",
                };
                write!(f, " {} {}", op, row.rhs)?;
            }
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_bounds_lp_file_block(prob: &Problem, f: &mut Formatter) -> fmt::Result {
    let mut generals = vec![];
    let mut binaries = vec![];
    let mut semis = vec![];
    write!(f, "\nBounds\n")?;
    for column in prob.columns() {
        let low = column.lower_bound;
        let up = column.upper_bound;
        let low_infinite = low <= -INFINITE_BOUND;
        let up_infinite = up >= INFINITE_BOUND;
        let name = column.name.as_str();
        write!(f, "  ")?;
        if low_infinite && up_infinite {
            write!(f, "{} free", name)?;
        } else {
            if low_infinite {
                write!(f, "-inf <= ")?;
            } else {
                write!(f, "{} <= ", low)?;
            }
            write!(f, "{}", name)?;
            if !up_infinite {
                write!(f, " <= {}", up)?;
            }
        }
        writeln!(f)?;
        match column.column_type {
            ColumnType::Continuous => {}
            ColumnType::Binary => binaries.push(name),
            ColumnType::Integer => generals.push(name),
            ColumnType::SemiContinuous => semis.push(name),
            ColumnType::SemiInteger => {
                generals.push(name);
                semis.push(name);
            }
        }
    }
    for (header, names) in [
        ("Generals", &generals),
        ("Binaries", &binaries),
        ("Semi-continuous", &semis),
    ]
    .iter()
    {
        if !names.is_empty() {
            writeln!(f, "\n{}", header)?;
            for name in names.iter() {
                writeln!(f, "  {}", name)?;
            }
        }
    }
    Ok(())
}
