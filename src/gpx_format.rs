//! Reader for the gpx text format.
//!
//! A gpx file is a sequence of keyword-delimited blocks:
//!
//! ```text
//! PROBLEM_NAME: <name>
//! OBJECTIVE_START
//! <col-index> <value>
//! ROWS_START
//! <name> <sense:L|E|G|R> <rhs> <range-value>
//! COLUMNS_START
//! <name> <type:C|B|I|S|N> <lower-bound> <upper-bound>
//! ELEMENTS_START
//! <row-index> <col-index> <value>
//! END_DATA
//! ```
//!
//! Keywords are case-insensitive and may appear in any order. Lines starting
//! with `#` are comments.
use std::io::BufRead;
use std::str::{FromStr, SplitWhitespace};

use crate::error::GpxError;
use crate::model::{Column, Element, Model, ObjectiveCoef, Row, DEFAULT_NAME};

/// First non-blank character of a comment line
pub const COMMENT_MARKER: char = '#';

/// Split a line into its whitespace separated fields
///
/// ```
/// use gpx::gpx_format::tokenize;
///
/// let fields: Vec<_> = tokenize("  c1\tL 10.0   0.0\n").collect();
/// assert_eq!(fields, ["c1", "L", "10.0", "0.0"]);
/// assert_eq!(tokenize("   \n").count(), 0);
/// ```
pub fn tokenize(line: &str) -> SplitWhitespace<'_> {
    line.split_whitespace()
}

/// Block of the file being read
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ReadState {
    /// No keyword seen yet
    Unset,
    /// After PROBLEM_NAME:, data lines are ignored
    NameSet,
    /// OBJECTIVE_START
    Objective,
    /// ROWS_START
    Rows,
    /// COLUMNS_START
    Columns,
    /// ELEMENTS_START
    Elements,
    /// END_DATA
    Done,
}

impl ReadState {
    fn from_keyword(field: &str) -> Option<ReadState> {
        match field.to_ascii_uppercase().as_str() {
            "PROBLEM_NAME:" => Some(ReadState::NameSet),
            "OBJECTIVE_START" => Some(ReadState::Objective),
            "ROWS_START" => Some(ReadState::Rows),
            "COLUMNS_START" => Some(ReadState::Columns),
            "ELEMENTS_START" => Some(ReadState::Elements),
            "END_DATA" => Some(ReadState::Done),
            _ => None,
        }
    }
}

/// What a successful read went through
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct ReadSummary {
    /// Number of lines consumed, END_DATA included
    pub lines_read: usize,
    /// Whether END_DATA was found
    pub terminated: bool,
}

/// Parses gpx text into a [Model]
#[derive(Debug, Clone, Default)]
pub struct GpxReader {
    strict: bool,
}

impl GpxReader {
    /// A lenient reader: numbers that fail to parse are read as 0
    pub fn new() -> GpxReader {
        GpxReader::default()
    }

    /// In strict mode, a number that fails to parse is an error
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Read gpx text into `model`.
    ///
    /// The model is cleared first, so nothing from a previous read survives.
    /// Reaching the end of input before END_DATA is not an error: a warning is
    /// logged and the data read so far is kept.
    pub fn read<R: BufRead>(&self, mut reader: R, model: &mut Model) -> Result<ReadSummary, GpxError> {
        model.clear();
        let mut state = ReadState::Unset;
        let mut line_num = 0;
        let mut buffer = String::new();

        loop {
            buffer.clear();
            let n = reader
                .read_line(&mut buffer)
                .map_err(|source| GpxError::LineRead {
                    line: line_num + 1,
                    source,
                })?;
            if n == 0 {
                break;
            }
            line_num += 1;

            if buffer.trim_start().starts_with(COMMENT_MARKER) {
                continue;
            }
            let fields: Vec<&str> = tokenize(&buffer).collect();
            if fields.is_empty() {
                continue;
            }

            if let Some(next) = ReadState::from_keyword(fields[0]) {
                state = next;
                match state {
                    ReadState::NameSet => {
                        model.name = fields.get(1).unwrap_or(&DEFAULT_NAME).to_string();
                    }
                    ReadState::Done => break,
                    _ => {}
                }
                continue;
            }

            self.read_data_line(state, &fields, line_num, model)?;
        }

        let terminated = state == ReadState::Done;
        if !terminated {
            log::warn!("End of data token missing, {} lines read", line_num);
        }
        Ok(ReadSummary {
            lines_read: line_num,
            terminated,
        })
    }

    fn read_data_line(
        &self,
        state: ReadState,
        fields: &[&str],
        line: usize,
        model: &mut Model,
    ) -> Result<(), GpxError> {
        let found = fields.len();
        match state {
            ReadState::Unset => return Err(GpxError::UnexpectedFormat { line }),
            ReadState::NameSet | ReadState::Done => {
                log::debug!("ignoring line {} outside of a data block", line);
            }
            ReadState::Objective => {
                if found != 2 {
                    return Err(GpxError::InvalidObjectiveLine { line, found });
                }
                model.objective.push(ObjectiveCoef {
                    col: self.number(fields[0], line)?,
                    value: self.number(fields[1], line)?,
                });
            }
            ReadState::Rows => {
                if found != 4 {
                    return Err(GpxError::InvalidRowLine { line, found });
                }
                let sense = fields[1]
                    .parse()
                    .map_err(|value| GpxError::UnknownSense { line, value })?;
                model.rows.push(Row {
                    name: fields[0].to_string(),
                    sense,
                    rhs: self.number(fields[2], line)?,
                    range_value: self.number(fields[3], line)?,
                });
            }
            ReadState::Columns => {
                if found != 4 {
                    return Err(GpxError::InvalidColumnLine { line, found });
                }
                let column_type = fields[1]
                    .parse()
                    .map_err(|value| GpxError::UnknownColumnType { line, value })?;
                model.columns.push(Column {
                    name: fields[0].to_string(),
                    column_type,
                    lower_bound: self.number(fields[2], line)?,
                    upper_bound: self.number(fields[3], line)?,
                });
            }
            ReadState::Elements => {
                if found != 3 {
                    return Err(GpxError::InvalidElementLine { line, found });
                }
                model.elements.push(Element {
                    row: self.number(fields[0], line)?,
                    col: self.number(fields[1], line)?,
                    value: self.number(fields[2], line)?,
                });
            }
        }
        Ok(())
    }

    fn number<T: FromStr + Default>(&self, field: &str, line: usize) -> Result<T, GpxError> {
        match field.parse() {
            Ok(n) => Ok(n),
            Err(_) if self.strict => Err(GpxError::InvalidNumber {
                line,
                value: field.to_string(),
            }),
            Err(_) => {
                log::debug!("line {}: '{}' is not a number, using 0", line, field);
                Ok(T::default())
            }
        }
    }
}
