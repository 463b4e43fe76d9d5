//! Model accumulator: the rows, columns and coefficients read from a gpx file
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::GpxError;
use crate::gpx_format::{GpxReader, ReadSummary};

/// Name given to a model whose file does not declare one
pub const DEFAULT_NAME: &str = "NoName";

/// Relation between a row and its right-hand side
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Sense {
    /// L: less than or equal
    Less,
    /// E: equal
    Equal,
    /// G: greater than or equal
    Greater,
    /// R: ranged, between rhs and rhs + range value
    Range,
}

impl Sense {
    /// Single letter code used in gpx files and by the solver
    pub fn code(self) -> char {
        match self {
            Sense::Less => 'L',
            Sense::Equal => 'E',
            Sense::Greater => 'G',
            Sense::Range => 'R',
        }
    }
}

impl FromStr for Sense {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(Sense::Less),
            "E" => Ok(Sense::Equal),
            "G" => Ok(Sense::Greater),
            "R" => Ok(Sense::Range),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Kind of values a column may take
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ColumnType {
    /// C: continuous
    Continuous,
    /// B: binary
    Binary,
    /// I: general integer
    Integer,
    /// S: semi-continuous
    SemiContinuous,
    /// N: semi-integer
    SemiInteger,
}

impl ColumnType {
    /// Single letter code used in gpx files and by the solver
    pub fn code(self) -> char {
        match self {
            ColumnType::Continuous => 'C',
            ColumnType::Binary => 'B',
            ColumnType::Integer => 'I',
            ColumnType::SemiContinuous => 'S',
            ColumnType::SemiInteger => 'N',
        }
    }

    /// True for types whose values must be integral
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ColumnType::Binary | ColumnType::Integer | ColumnType::SemiInteger
        )
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "C" => Ok(ColumnType::Continuous),
            "B" => Ok(ColumnType::Binary),
            "I" => Ok(ColumnType::Integer),
            "S" => Ok(ColumnType::SemiContinuous),
            "N" => Ok(ColumnType::SemiInteger),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A linear constraint
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Name of the row, unique in the problem
    pub name: String,
    /// Relation to the right-hand side
    pub sense: Sense,
    /// Right-hand side, or the lower end of a range
    pub rhs: f64,
    /// Only meaningful for ranged rows: the row lies between rhs and rhs + range_value
    pub range_value: f64,
}

/// A decision variable
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Name of the column, unique in the problem
    pub name: String,
    /// Continuous, binary, integer, semi-continuous or semi-integer
    pub column_type: ColumnType,
    /// Values at or below -1e20 mean no lower bound
    pub lower_bound: f64,
    /// Values at or above 1e20 mean no upper bound
    pub upper_bound: f64,
}

/// A non-zero coefficient of the constraint matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Element {
    /// Position of the row in [Model::rows], kept as written and checked by the solver session
    pub row: i64,
    /// Position of the column in [Model::columns]
    pub col: i64,
    /// Coefficient value
    pub value: f64,
}

/// A coefficient of the objective function
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectiveCoef {
    /// Position of the column in [Model::columns]
    pub col: i64,
    /// Coefficient value
    pub value: f64,
}

/// Everything a gpx file describes.
///
/// Rows and columns are indexed by their position. Elements and objective
/// coefficients refer to them by index and are not checked against them here;
/// the solver session does that when the model is loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    /// Problem name, "NoName" unless the file declares one
    pub name: String,
    /// Constraints in file order
    pub rows: Vec<Row>,
    /// Variables in file order
    pub columns: Vec<Column>,
    /// Non-zero coefficients in file order
    pub elements: Vec<Element>,
    /// Objective coefficients in file order
    pub objective: Vec<ObjectiveCoef>,
}

impl Default for Model {
    fn default() -> Self {
        Model {
            name: DEFAULT_NAME.to_string(),
            rows: vec![],
            columns: vec![],
            elements: vec![],
            objective: vec![],
        }
    }
}

impl Model {
    /// Forget everything, including the name
    pub fn clear(&mut self) {
        self.name = DEFAULT_NAME.to_string();
        self.rows.clear();
        self.columns.clear();
        self.elements.clear();
        self.objective.clear();
    }

    /// True if at least one column is not continuous
    pub fn is_mip(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.column_type != ColumnType::Continuous)
    }

    /// True if nothing has been read
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
            && self.columns.is_empty()
            && self.elements.is_empty()
            && self.objective.is_empty()
    }

    /// Read a model from gpx text using the default (lenient) reader
    pub fn from_gpx_reader<R: BufRead>(reader: R) -> Result<Model, GpxError> {
        let mut model = Model::default();
        GpxReader::default().read(reader, &mut model)?;
        Ok(model)
    }

    /// Read a gpx file into this model, replacing its content
    pub fn read_gpx_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ReadSummary, GpxError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GpxError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        GpxReader::default().read(BufReader::new(file), self)
    }

    /// Read a model from a gpx file
    pub fn from_gpx_file<P: AsRef<Path>>(path: P) -> Result<Model, GpxError> {
        let mut model = Model::default();
        model.read_gpx_file(path)?;
        Ok(model)
    }
}
