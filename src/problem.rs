//! In-memory image of the problem held by a solver session
use std::collections::BTreeMap;
use std::convert::TryFrom;

use crate::error::SolverError;
use crate::lp_format::LpObjective;
use crate::model::{Column, ColumnType, Element, ObjectiveCoef, Row};

/// A problem being built through [crate::solvers::SolverSession] calls.
///
/// Unlike [crate::model::Model], which stores whatever a file contained, a
/// `Problem` checks every index it receives, the way the native library does.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Problem name, written at the top of the .lp file
    pub name: String,
    /// Whether to minimize or maximize the objective
    pub sense: LpObjective,
    rows: Vec<Row>,
    columns: Vec<Column>,
    objective: Vec<f64>,
    coefficients: BTreeMap<(usize, usize), f64>,
}

impl Problem {
    /// An empty minimization problem
    pub fn new(name: &str) -> Problem {
        Problem {
            name: name.to_string(),
            sense: LpObjective::Minimize,
            rows: vec![],
            columns: vec![],
            objective: vec![],
            coefficients: BTreeMap::new(),
        }
    }

    /// Append rows after the existing ones
    pub fn new_rows(&mut self, rows: &[Row]) -> Result<(), SolverError> {
        if rows.is_empty() {
            return Err(SolverError::Empty {
                operation: "new_rows",
                item: "row",
            });
        }
        self.rows.extend_from_slice(rows);
        Ok(())
    }

    /// Append columns after the existing ones.
    ///
    /// Objective coefficient indices are relative to `cols`. Columns without a
    /// coefficient get 0.
    pub fn new_cols(&mut self, objective: &[ObjectiveCoef], cols: &[Column]) -> Result<(), SolverError> {
        if cols.is_empty() {
            return Err(SolverError::Empty {
                operation: "new_cols",
                item: "column",
            });
        }
        let mut obj = vec![0.; cols.len()];
        for coef in objective {
            let idx = checked_index("objective column", coef.col, cols.len())?;
            obj[idx] = coef.value;
        }
        self.columns.extend_from_slice(cols);
        self.objective.extend(obj);
        Ok(())
    }

    /// Set constraint matrix coefficients. A later element for the same cell wins.
    ///
    /// Nothing is changed if any index is out of range.
    pub fn change_coefficients(&mut self, elements: &[Element]) -> Result<(), SolverError> {
        if elements.is_empty() {
            return Err(SolverError::Empty {
                operation: "change_coefficients",
                item: "element",
            });
        }
        let mut cells = Vec::with_capacity(elements.len());
        for e in elements {
            let row = checked_index("row", e.row, self.rows.len())?;
            let col = checked_index("column", e.col, self.columns.len())?;
            cells.push(((row, col), e.value));
        }
        self.coefficients.extend(cells);
        Ok(())
    }

    /// Rows in index order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Columns in index order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Objective coefficient of every column
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Coefficient of a cell, 0 if never set
    pub fn coefficient(&self, row: usize, col: usize) -> f64 {
        self.coefficients.get(&(row, col)).copied().unwrap_or(0.)
    }

    /// Non-zero coefficients of a row, ordered by column
    pub fn row_terms(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.coefficients
            .range((row, 0)..(row + 1, 0))
            .filter(|(_, v)| **v != 0.)
            .map(|(&(_, col), &v)| (col, v))
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    /// True if a column is not continuous
    pub fn is_mip(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.column_type != ColumnType::Continuous)
    }
}

/// Position `index` in a list of `len` items, if there is one
fn checked_index(kind: &'static str, index: i64, len: usize) -> Result<usize, SolverError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or(SolverError::IndexOutOfRange { kind, index, len })
}
