//! Errors returned by the gpx reader and by solver sessions
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::solvers::Status;

/// Failure while reading a model in the gpx text format.
///
/// Every variant that comes from a line of input carries its 1-based line number.
#[derive(Error, Debug)]
pub enum GpxError {
    /// The gpx file could not be opened
    #[error("failed to open gpx file {}", path.display())]
    Open {
        /// file that was requested
        path: PathBuf,
        /// underlying error
        #[source]
        source: io::Error,
    },
    /// Reading failed for a reason other than end of input
    #[error("problem reading line {line}")]
    LineRead {
        /// line being read
        line: usize,
        /// underlying error
        #[source]
        source: io::Error,
    },
    /// A data line appeared before any block keyword
    #[error("unexpected format at line {line}")]
    UnexpectedFormat {
        /// offending line
        line: usize,
    },
    /// Objective lines need exactly 2 fields
    #[error("invalid OBJ items on line {line}: expected 2 fields, found {found}")]
    InvalidObjectiveLine {
        /// offending line
        line: usize,
        /// number of fields on the line
        found: usize,
    },
    /// Row lines need exactly 4 fields
    #[error("invalid ROW items on line {line}: expected 4 fields, found {found}")]
    InvalidRowLine {
        /// offending line
        line: usize,
        /// number of fields on the line
        found: usize,
    },
    /// Column lines need exactly 4 fields
    #[error("invalid COL items on line {line}: expected 4 fields, found {found}")]
    InvalidColumnLine {
        /// offending line
        line: usize,
        /// number of fields on the line
        found: usize,
    },
    /// Element lines need exactly 3 fields
    #[error("invalid ELEM items on line {line}: expected 3 fields, found {found}")]
    InvalidElementLine {
        /// offending line
        line: usize,
        /// number of fields on the line
        found: usize,
    },
    /// Row sense is not one of L, E, G, R (in either case).
    ///
    /// The letter is checked while reading rather than left to the solver, so
    /// this fails a read whose field count is correct.
    #[error("unknown row sense '{value}' on line {line}")]
    UnknownSense {
        /// offending line
        line: usize,
        /// the sense field as written
        value: String,
    },
    /// Column type is not one of C, B, I, S, N (in either case).
    ///
    /// Like [GpxError::UnknownSense], this is checked while reading.
    #[error("unknown column type '{value}' on line {line}")]
    UnknownColumnType {
        /// offending line
        line: usize,
        /// the type field as written
        value: String,
    },
    /// A numeric field could not be converted (strict mode only)
    #[error("invalid number '{value}' on line {line}")]
    InvalidNumber {
        /// offending line
        line: usize,
        /// the field as written
        value: String,
    },
}

impl GpxError {
    /// The input line the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            GpxError::Open { .. } => None,
            GpxError::LineRead { line, .. }
            | GpxError::UnexpectedFormat { line }
            | GpxError::InvalidObjectiveLine { line, .. }
            | GpxError::InvalidRowLine { line, .. }
            | GpxError::InvalidColumnLine { line, .. }
            | GpxError::InvalidElementLine { line, .. }
            | GpxError::UnknownSense { line, .. }
            | GpxError::UnknownColumnType { line, .. }
            | GpxError::InvalidNumber { line, .. } => Some(*line),
        }
    }
}

/// Failure reported by a solver session.
#[derive(Error, Debug)]
pub enum SolverError {
    /// An operation received an empty list
    #[error("{operation} expected at least one {item}")]
    Empty {
        /// operation that was called
        operation: &'static str,
        /// kind of item expected
        item: &'static str,
    },
    /// A row or column index does not refer to an existing row or column
    #[error("{kind} index {index} out of range, problem has {len}")]
    IndexOutOfRange {
        /// "row" or "column"
        kind: &'static str,
        /// index received, possibly negative
        index: i64,
        /// number of rows or columns available
        len: usize,
    },
    /// The name cannot be written in the .lp format
    #[error("'{0}' is not a valid name in the lp file format")]
    InvalidName(String),
    /// The file type is not accepted for this operation
    #[error("file type {0} is not supported for {1}")]
    UnsupportedFileType(String, &'static str),
    /// The problem contains non-continuous columns and cannot be solved as an LP
    #[error("operation not available for a mixed integer problem")]
    NotForMip,
    /// The session has no problem to solve yet
    #[error("no problem has been loaded")]
    NoProblem,
    /// Rows, columns and coefficients cannot be added to a problem read from a file
    #[error("the problem was read from {0} and cannot be modified")]
    ReadOnlyProblem(PathBuf),
    /// No solution is available
    #[error("no solution available (status {0:?})")]
    NoSolution(Status),
    /// The solver program could not be started
    #[error("unable to run {command}: {source}")]
    Launch {
        /// program name
        command: String,
        /// underlying error
        #[source]
        source: io::Error,
    },
    /// The solver program ran but reported a failure
    #[error("{command} failed: {status}")]
    ProgramFailed {
        /// program name
        command: String,
        /// exit status as reported by the system
        status: String,
    },
    /// The solution file could not be understood
    #[error("incorrect solution format: {0}")]
    SolutionFormat(String),
    /// The session was closed
    #[error("the solver session is closed")]
    Closed,
    /// File system error
    #[error(transparent)]
    Io(#[from] io::Error),
}
